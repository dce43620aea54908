//! Fetch error type.

use crate::cache::CacheError;
use crate::connection::{ConnectionError, NetworkError, ProtocolError};
use crate::wire::FormatError;
use thiserror::Error;

/// Why a query failed. Keeps the layer-specific cause.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Body could not be decoded
    #[error("Tile format error: {0}")]
    Format(#[from] FormatError),

    /// Response framing was wrong
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Socket failure
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// The cache directory could not be prepared
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl FetchError {
    /// Classifies a failed decode of a socket body. Read faults are
    /// connection failures, everything else is a format error.
    pub(crate) fn from_socket_decode(err: FormatError) -> Self {
        match err {
            FormatError::Read(e) => FetchError::Network(NetworkError::Io(e)),
            other => FetchError::Format(other),
        }
    }
}

impl From<ConnectionError> for FetchError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::Network(e) => FetchError::Network(e),
            ConnectionError::Protocol(e) => FetchError::Protocol(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_keeps_layer() {
        let err: FetchError = ConnectionError::from(ProtocolError::Truncated { received: 3 }).into();
        assert!(matches!(err, FetchError::Protocol(ProtocolError::Truncated { received: 3 })));

        let err: FetchError = ConnectionError::from(NetworkError::NotConnected).into();
        assert!(matches!(err, FetchError::Network(NetworkError::NotConnected)));
    }

    #[test]
    fn test_socket_read_failure_is_network_error() {
        let timeout = std::io::Error::new(std::io::ErrorKind::WouldBlock, "timed out");
        let err = FetchError::from_socket_decode(FormatError::Read(timeout));
        assert!(matches!(err, FetchError::Network(NetworkError::Io(_))));

        let err = FetchError::from_socket_decode(FormatError::MalformedVarint { offset: 3 });
        assert!(matches!(err, FetchError::Format(FormatError::MalformedVarint { offset: 3 })));
    }

    #[test]
    fn test_display_includes_cause() {
        let err = FetchError::from(FormatError::MalformedVarint { offset: 12 });
        assert!(err.to_string().starts_with("Tile format error:"));
        assert!(err.to_string().contains("12"));
    }
}
