//! Response header parsing.

use super::error::ProtocolError;

/// Only successful responses carry a tile.
pub const STATUS_OK: &[u8] = b"HTTP/1.1 200 OK";

/// Size of the big-endian body length that follows the header.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Location of the body inside the received bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHead {
    /// Offset of the first body byte
    pub content_start: usize,
    /// Body length from the length prefix
    pub content_length: usize,
}

/// Scans `bytes` for a complete response head.
///
/// Only the status line is inspected; other header lines are skipped up to
/// the first empty line (`\n` or `\r\n`). Returns `Ok(None)` when more bytes
/// are needed.
pub fn parse_head(bytes: &[u8]) -> Result<Option<ResponseHead>, ProtocolError> {
    let status_end = match bytes.iter().position(|&b| b == b'\n') {
        Some(end) => end,
        None => {
            // Reject early once enough of the status line is visible
            let visible = bytes.len().min(STATUS_OK.len());
            if bytes[..visible] != STATUS_OK[..visible] {
                return Err(unexpected_status(bytes));
            }
            return Ok(None);
        }
    };

    if !bytes[..status_end].starts_with(STATUS_OK) {
        return Err(unexpected_status(&bytes[..status_end]));
    }

    let mut line_start = status_end + 1;
    let header_end = loop {
        let Some(len) = bytes[line_start..].iter().position(|&b| b == b'\n') else {
            return Ok(None);
        };
        let line = &bytes[line_start..line_start + len];
        line_start += len + 1;
        if line.is_empty() || line == b"\r" {
            break line_start;
        }
    };

    let Some(prefix) = bytes.get(header_end..header_end + LENGTH_PREFIX_LEN) else {
        return Ok(None);
    };
    let content_length = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);

    Ok(Some(ResponseHead {
        content_start: header_end + LENGTH_PREFIX_LEN,
        content_length: content_length as usize,
    }))
}

fn unexpected_status(line: &[u8]) -> ProtocolError {
    ProtocolError::UnexpectedStatus(String::from_utf8_lossy(line).trim_end().to_string())
}
