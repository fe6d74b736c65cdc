//! Request/response sessions against an apcupsd Network Information Server.
//!
//! Each session opens a fresh TCP connection, sends one request frame,
//! reads the framed response, and drops the connection on every exit path.

use super::frame::{decode_frames, encode_request, FrameError};
use std::io::Write;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use thiserror::Error;

/// Command that asks the NIS for its full status report.
pub const STATUS_COMMAND: &[u8] = b"status";

/// Errors that can occur while talking to the NIS.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not resolve {addr}: {source}")]
    Resolve {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no socket address found for {0}")]
    NoAddress(String),
    #[error("could not connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Anything that can produce the raw text of one status report.
///
/// An empty string means no data was obtained this cycle.
pub trait ReportSource {
    /// Fetches one report, returning an empty string on failure.
    fn fetch_report(&self) -> String;
}

/// TCP client for the apcupsd NIS.
#[derive(Debug, Clone)]
pub struct NisClient {
    address: String,
    timeout: Duration,
}

impl NisClient {
    /// Creates a client for `address` (`host:port`) with the given timeout.
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }

    /// Performs one `status` round trip and returns the report text.
    ///
    /// Read errors after the request was sent are not errors here: the
    /// frames received up to that point form the result.
    pub fn request_status(&self) -> Result<String, TransportError> {
        let mut stream = self.connect()?;

        stream.write_all(&encode_request(STATUS_COMMAND)?)?;
        stream.flush()?;

        let chunks = decode_frames(&mut stream);
        let payload = chunks.concat();
        tracing::debug!(frames = chunks.len(), bytes = payload.len(), "received NIS response");

        let text = String::from_utf8_lossy(&payload).into_owned();
        tracing::trace!(report = %text, "raw NIS response");
        Ok(text)
    }

    fn connect(&self) -> Result<TcpStream, TransportError> {
        let addrs: Vec<SocketAddr> = self
            .address
            .to_socket_addrs()
            .map_err(|source| TransportError::Resolve {
                addr: self.address.clone(),
                source,
            })?
            .collect();

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(self.timeout))?;
                    stream.set_write_timeout(Some(self.timeout))?;
                    return Ok(stream);
                }
                Err(e) => {
                    tracing::debug!(addr = %addr, error = %e, "connect attempt failed");
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(source) => Err(TransportError::Connect {
                addr: self.address.clone(),
                source,
            }),
            None => Err(TransportError::NoAddress(self.address.clone())),
        }
    }
}

impl ReportSource for NisClient {
    fn fetch_report(&self) -> String {
        match self.request_status() {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(addr = %self.address, error = %e, "could not query apcupsd NIS");
                String::new()
            }
        }
    }
}

/// In-memory report source that always returns the same text.
///
/// Useful for tests and for running the exporter without a UPS attached.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    report: String,
}

impl StaticSource {
    /// Creates a source returning `report` on every fetch.
    pub fn new(report: impl Into<String>) -> Self {
        Self {
            report: report.into(),
        }
    }

    /// Creates a source that behaves like an unreachable NIS.
    pub fn unreachable() -> Self {
        Self::default()
    }
}

impl ReportSource for StaticSource {
    fn fetch_report(&self) -> String {
        self.report.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    /// Serves one connection: checks the request, then writes `frames` raw.
    fn serve_once(frames: Vec<u8>) -> (String, thread::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let handle = thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut request = [0u8; 8];
            conn.read_exact(&mut request).unwrap();
            conn.write_all(&frames).unwrap();
            request.to_vec()
        });
        (addr, handle)
    }

    #[test]
    fn test_request_status_round_trip() {
        let mut frames = encode_request(b"STATUS   : ONLINE \n").unwrap();
        frames.extend(encode_request(b"LOADPCT  : 12.0 Percent\n").unwrap());
        frames.extend_from_slice(&[0, 0]);
        let (addr, server) = serve_once(frames);

        let client = NisClient::new(addr, Duration::from_secs(5));
        let text = client.fetch_report();

        assert_eq!(text, "STATUS   : ONLINE \nLOADPCT  : 12.0 Percent\n");
        assert_eq!(server.join().unwrap(), b"\x00\x06status");
    }

    #[test]
    fn test_connection_closed_without_terminator() {
        let frames = encode_request(b"BCHARGE  : 100.0 Percent\n").unwrap();
        let (addr, server) = serve_once(frames);

        let client = NisClient::new(addr, Duration::from_secs(5));
        assert_eq!(client.fetch_report(), "BCHARGE  : 100.0 Percent\n");
        server.join().unwrap();
    }

    #[test]
    fn test_unreachable_server_yields_empty_report() {
        // Bind then drop to get a port nothing listens on.
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .to_string();

        let client = NisClient::new(addr, Duration::from_millis(500));
        assert!(matches!(
            client.request_status(),
            Err(TransportError::Connect { .. })
        ));
        assert_eq!(client.fetch_report(), "");
    }

    #[test]
    fn test_unresolvable_address_is_an_error() {
        let client = NisClient::new("not-a-socket-address", Duration::from_millis(100));
        assert!(matches!(
            client.request_status(),
            Err(TransportError::Resolve { .. })
        ));
    }

    #[test]
    fn test_static_source() {
        assert_eq!(StaticSource::new("STATUS: ONLINE").fetch_report(), "STATUS: ONLINE");
        assert!(StaticSource::unreachable().fetch_report().is_empty());
    }
}
