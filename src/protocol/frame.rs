//! Length-prefixed frame codec for the NIS wire protocol.
//!
//! Every frame on the wire is a 2-byte big-endian length followed by that
//! many payload bytes:
//!
//! ```text
//! ┌──────────────┬─────────────────────┐
//! │ Length       │ Payload             │
//! │ uint16 BE    │ `Length` bytes      │
//! └──────────────┴─────────────────────┘
//! ```
//!
//! A response is a sequence of frames closed by a zero-length frame or by
//! the peer closing the connection.

use std::io::{self, ErrorKind, Read};
use thiserror::Error;

/// Size of the length prefix in bytes.
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Largest payload a single frame can carry.
pub const MAX_FRAME_PAYLOAD: usize = u16::MAX as usize;

/// Errors that can occur while encoding a frame.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("command too long for one frame: {len} bytes (max {max})", max = MAX_FRAME_PAYLOAD)]
    CommandTooLong { len: usize },
}

/// Encodes a request command as a single length-prefixed frame.
pub fn encode_request(command: &[u8]) -> Result<Vec<u8>, FrameError> {
    let len = u16::try_from(command.len())
        .map_err(|_| FrameError::CommandTooLong { len: command.len() })?;

    let mut out = Vec::with_capacity(LENGTH_PREFIX_SIZE + command.len());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(command);
    Ok(out)
}

/// Why a [`FrameDecoder`] stopped producing chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// A zero-length frame was read.
    Terminator,
    /// The stream closed between or inside frames.
    Eof,
    /// A read failed; chunks collected so far are still valid.
    ReadError,
}

/// Reads successive frames from a byte stream.
///
/// The decoder never fails: read errors end the sequence and are recorded
/// in [`FrameDecoder::end`] so the caller can work with a partial response.
pub struct FrameDecoder<R> {
    reader: R,
    end: Option<StreamEnd>,
}

impl<R: Read> FrameDecoder<R> {
    /// Creates a decoder over the given reader.
    pub fn new(reader: R) -> Self {
        Self { reader, end: None }
    }

    /// Returns how the stream ended, or `None` while frames remain.
    pub fn end(&self) -> Option<StreamEnd> {
        self.end
    }

    /// Reads the next payload chunk.
    ///
    /// A payload cut short by EOF is returned as a final partial chunk.
    pub fn next_chunk(&mut self) -> Option<Vec<u8>> {
        if self.end.is_some() {
            return None;
        }

        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        if let Err(e) = self.reader.read_exact(&mut prefix) {
            self.finish_with(&e);
            return None;
        }

        let len = u16::from_be_bytes(prefix) as usize;
        if len == 0 {
            self.end = Some(StreamEnd::Terminator);
            return None;
        }

        let mut payload = Vec::with_capacity(len);
        let read = (&mut self.reader).take(len as u64).read_to_end(&mut payload);
        match read {
            Ok(n) if n < len => {
                tracing::debug!(expected = len, got = n, "frame truncated by end of stream");
                self.end = Some(StreamEnd::Eof);
            }
            Ok(n) => tracing::trace!(bytes = n, "received frame"),
            Err(e) => {
                self.finish_with(&e);
                if payload.is_empty() {
                    return None;
                }
            }
        }

        Some(payload)
    }

    fn finish_with(&mut self, err: &io::Error) {
        if err.kind() == ErrorKind::UnexpectedEof {
            self.end = Some(StreamEnd::Eof);
        } else {
            tracing::warn!(error = %err, "read error while receiving frames");
            self.end = Some(StreamEnd::ReadError);
        }
    }
}

impl<R: Read> Iterator for FrameDecoder<R> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk()
    }
}

/// Decodes every frame in `reader` until a terminator, EOF, or read error.
pub fn decode_frames<R: Read>(reader: R) -> Vec<Vec<u8>> {
    FrameDecoder::new(reader).collect()
}
