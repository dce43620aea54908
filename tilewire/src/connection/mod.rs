//! Minimal keep-alive client for the tile server.
//!
//! Requests are plain `GET` lines. A response is a status line, header lines
//! that are skipped, a blank line, a 4-byte big-endian body length and the
//! body itself. Nothing else of HTTP is supported: no redirects, no chunked
//! transfer and no TLS.

mod client;
mod config;
mod error;
mod request;
mod response;

pub use client::TileConnection;
pub use config::ConnectionConfig;
pub use error::{ConnectionError, NetworkError, ProtocolError};
pub use request::RequestBuilder;
pub use response::{parse_head, ResponseHead, LENGTH_PREFIX_LEN, STATUS_OK};
