//! Persistent socket client.

use super::config::ConnectionConfig;
use super::error::{ConnectionError, NetworkError, ProtocolError};
use super::request::RequestBuilder;
use super::response::parse_head;
use crate::coord::TileCoord;
use crate::wire::ReadBuffer;
use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Instant;
use tracing::{debug, warn};

/// Keep-alive connection to the tile server.
///
/// Speaks just enough of HTTP/1.1 to send a tile `GET` and locate the body.
/// The socket is reused for up to `max_requests` requests and replaced once
/// it has been idle for longer than `idle_timeout`.
#[derive(Debug)]
pub struct TileConnection {
    config: ConnectionConfig,
    request: RequestBuilder,
    stream: Option<TcpStream>,
    /// Requests left on the current socket
    remaining: u32,
    last_request: Option<Instant>,
    connects: u64,
}

impl TileConnection {
    pub fn new(config: ConnectionConfig) -> Self {
        let request = RequestBuilder::new(config.host(), config.url_prefix());
        Self {
            config,
            request,
            stream: None,
            remaining: 0,
            last_request: None,
            connects: 0,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Number of sockets opened so far.
    pub fn connect_count(&self) -> u64 {
        self.connects
    }

    /// Sends the request for `tile`, connecting or reconnecting as needed.
    ///
    /// A failed write is retried once on a fresh connection.
    pub fn send_request(&mut self, tile: &TileCoord) -> Result<(), NetworkError> {
        if self.stream.is_some() {
            if let Some(reason) = self.expiry_reason() {
                debug!(reason, "Replacing connection");
                self.close();
            } else if !self.drain_stale() {
                debug!("Server closed connection, reconnecting");
                self.close();
            }
        }

        if self.stream.is_none() {
            self.connect()?;
        }

        write_with_retry(
            self,
            |conn| conn.write_request(tile),
            |conn| {
                conn.close();
                conn.connect()
            },
        )?;

        self.remaining = self.remaining.saturating_sub(1);
        Ok(())
    }

    /// Reads the response header into `buffer` and starts its content phase.
    ///
    /// Returns the body length. Body bytes received together with the header
    /// stay in `buffer`.
    pub fn read_header(&mut self, buffer: &mut ReadBuffer) -> Result<usize, ConnectionError> {
        let stream = self.stream.as_mut().ok_or(NetworkError::NotConnected)?;
        buffer.reset();

        loop {
            if let Some(head) = parse_head(buffer.unread_bytes())? {
                buffer.advance(head.content_start);
                buffer.begin_content(head.content_length);
                return Ok(head.content_length);
            }
            if buffer.is_full() {
                return Err(ProtocolError::HeaderTooLarge {
                    capacity: buffer.capacity(),
                }
                .into());
            }
            let n = buffer.fill_from(stream).map_err(NetworkError::Io)?;
            if n == 0 {
                return Err(ProtocolError::Truncated {
                    received: buffer.unread_bytes().len(),
                }
                .into());
            }
        }
    }

    /// Socket the body is read from.
    pub fn stream_mut(&mut self) -> Option<&mut TcpStream> {
        self.stream.as_mut()
    }

    /// Records the end of a request; the idle timeout counts from here.
    pub fn mark_idle(&mut self) {
        self.last_request = Some(Instant::now());
    }

    /// Closes the socket. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            // The peer may already be gone
            let _ = stream.shutdown(Shutdown::Both);
            debug!(server = %self.config.address(), "Connection closed");
        }
        self.remaining = 0;
    }

    fn expiry_reason(&self) -> Option<&'static str> {
        if self.remaining == 0 {
            return Some("request limit reached");
        }
        match self.last_request {
            Some(at) if at.elapsed() > self.config.idle_timeout() => Some("idle timeout"),
            _ => None,
        }
    }

    fn connect(&mut self) -> Result<(), NetworkError> {
        let host = self.config.host();
        let port = self.config.port();
        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|source| NetworkError::Resolve {
                host: self.config.address(),
                source,
            })?;

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.config.connect_timeout()) {
                Ok(stream) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!(error = %e, "Failed to set TCP_NODELAY");
                    }
                    stream.set_read_timeout(self.config.read_timeout())?;

                    self.stream = Some(stream);
                    self.remaining = self.config.max_requests();
                    self.connects += 1;
                    debug!(server = %addr, connects = self.connects, "Connected");
                    return Ok(());
                }
                Err(e) => {
                    debug!(server = %addr, error = %e, "Connect attempt failed");
                    last_err = Some((addr, e));
                }
            }
        }

        match last_err {
            Some((addr, source)) => Err(NetworkError::Connect {
                addr: addr.to_string(),
                source,
            }),
            None => Err(NetworkError::NoAddress(self.config.address())),
        }
    }

    fn write_request(&mut self, tile: &TileCoord) -> io::Result<()> {
        let request = self.request.build(tile);
        match self.stream.as_mut() {
            Some(stream) => {
                stream.write_all(request)?;
                stream.flush()
            }
            None => Err(io::Error::new(ErrorKind::NotConnected, "no socket")),
        }
    }

    /// Discards bytes left from an earlier response without blocking.
    ///
    /// Returns false if the peer closed the socket or it failed.
    fn drain_stale(&mut self) -> bool {
        let Some(stream) = self.stream.as_mut() else {
            return false;
        };
        if stream.set_nonblocking(true).is_err() {
            return false;
        }

        let mut scratch = [0u8; 4096];
        let mut stale = 0usize;
        let alive = loop {
            match stream.read(&mut scratch) {
                Ok(0) => break false,
                Ok(n) => stale += n,
                Err(e) if e.kind() == ErrorKind::WouldBlock => break true,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break false,
            }
        };

        if stale > 0 {
            debug!(bytes = stale, "Discarded left-over response bytes");
        }
        alive && stream.set_nonblocking(false).is_ok()
    }
}

/// Writes once; on failure reconnects and writes one more time.
///
/// A second write failure is reported as [`NetworkError::Send`].
fn write_with_retry<T>(
    target: &mut T,
    mut write: impl FnMut(&mut T) -> io::Result<()>,
    reconnect: impl FnOnce(&mut T) -> Result<(), NetworkError>,
) -> Result<(), NetworkError> {
    let Err(e) = write(target) else {
        return Ok(());
    };
    warn!(error = %e, "Sending request failed, retrying on new connection");
    reconnect(target)?;
    write(target).map_err(NetworkError::Send)
}

impl Drop for TileConnection {
    fn drop(&mut self) {
        self.close();
    }
}
