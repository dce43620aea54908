//! Connection error types.

use std::io;
use thiserror::Error;

/// Socket-level failures.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Host name resolution failed
    #[error("Failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    /// Resolution returned no addresses
    #[error("No address found for {0}")]
    NoAddress(String),

    /// Every resolved address refused or timed out
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Writing the request failed, also after reconnecting
    #[error("Failed to send request: {0}")]
    Send(#[source] io::Error),

    /// No open socket
    #[error("Not connected")]
    NotConnected,

    /// Read failure
    #[error("Connection I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Malformed or unexpected response framing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Status line does not start with `HTTP/1.1 200 OK`
    #[error("Unexpected response status: {0:?}")]
    UnexpectedStatus(String),

    /// Header plus length prefix do not fit the read buffer
    #[error("Response header exceeds {capacity} bytes")]
    HeaderTooLarge { capacity: usize },

    /// Stream ended before the header and length prefix were complete
    #[error("Connection closed after {received} header bytes")]
    Truncated { received: usize },
}

/// Any failure of a [`TileConnection`](super::TileConnection) operation.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
