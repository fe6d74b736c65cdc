//! NIS wire protocol: frame codec and transport sessions.
//!
//! The apcupsd Network Information Server speaks a simple length-prefixed
//! request/response protocol over TCP. This module encodes requests,
//! reassembles framed responses, and hides connection handling behind the
//! [`ReportSource`] trait so the poller can be tested without a network.

mod frame;
mod session;

pub use frame::{
    decode_frames, encode_request, FrameDecoder, FrameError, StreamEnd, LENGTH_PREFIX_SIZE,
    MAX_FRAME_PAYLOAD,
};
pub use session::{NisClient, ReportSource, StaticSource, TransportError, STATUS_COMMAND};
