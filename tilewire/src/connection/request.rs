//! Tile request encoding.

use crate::coord::TileCoord;

/// Reusable buffer for `GET` requests.
///
/// The method and path prefix are written once; each call to
/// [`build`](Self::build) only rewrites the tile address and suffix.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    buf: Vec<u8>,
    prefix_len: usize,
    suffix: Vec<u8>,
}

impl RequestBuilder {
    pub fn new(host: &str, url_prefix: &str) -> Self {
        let mut buf = Vec::with_capacity(256);
        buf.extend_from_slice(b"GET ");
        buf.extend_from_slice(url_prefix.as_bytes());
        let prefix_len = buf.len();

        let suffix =
            format!(".osmtile HTTP/1.1\r\nHost: {host}\r\nConnection: Keep-Alive\r\n\r\n")
                .into_bytes();

        Self {
            buf,
            prefix_len,
            suffix,
        }
    }

    /// Returns the request bytes for `tile`.
    pub fn build(&mut self, tile: &TileCoord) -> &[u8] {
        self.buf.truncate(self.prefix_len);
        push_decimal(&mut self.buf, u32::from(tile.zoom));
        self.buf.push(b'/');
        push_decimal(&mut self.buf, tile.x);
        self.buf.push(b'/');
        push_decimal(&mut self.buf, tile.y);
        self.buf.extend_from_slice(&self.suffix);
        &self.buf
    }
}

fn push_decimal(buf: &mut Vec<u8>, mut value: u32) {
    let mut digits = [0u8; 10];
    let mut i = digits.len();
    loop {
        i -= 1;
        digits[i] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    buf.extend_from_slice(&digits[i..]);
}
