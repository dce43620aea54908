//! Base-128 varint and zigzag primitives.

use thiserror::Error;

/// Longest varint accepted before the encoding is declared malformed.
///
/// A 32-bit value needs at most 5 bytes, but some encoders sign-extend to
/// 64 bits; up to 10 bytes are tolerated and bits above 31 are discarded.
pub const MAX_VARINT_LEN: usize = 10;

/// Varint decoding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VarintError {
    /// Continuation bit still set on the last permitted byte
    #[error("malformed varint: more than {MAX_VARINT_LEN} bytes")]
    Malformed,
    /// Input ended while the continuation bit was set
    #[error("varint truncated after {0} bytes")]
    Truncated(usize),
}

/// Decodes one varint from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
#[inline]
pub fn decode_varint32(bytes: &[u8]) -> Result<(u32, usize), VarintError> {
    // Fast path: single byte
    if let Some(&b) = bytes.first() {
        if b & 0x80 == 0 {
            return Ok((u32::from(b), 1));
        }
    }

    let mut result: u32 = 0;
    for (i, &b) in bytes.iter().take(MAX_VARINT_LEN).enumerate() {
        if i < 5 {
            // shift by 28 keeps only the low 4 payload bits of byte 5
            result |= u32::from(b & 0x7f) << (7 * i);
        }
        if b & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }

    if bytes.len() >= MAX_VARINT_LEN {
        Err(VarintError::Malformed)
    } else {
        Err(VarintError::Truncated(bytes.len()))
    }
}

/// Appends the varint encoding of `value` to `out`.
#[inline]
pub fn encode_varint32(mut value: u32, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Number of bytes [`encode_varint32`] writes for `value`.
#[inline]
pub fn varint_len(value: u32) -> usize {
    match value {
        0..=0x7f => 1,
        0x80..=0x3fff => 2,
        0x4000..=0x1f_ffff => 3,
        0x20_0000..=0x0fff_ffff => 4,
        _ => 5,
    }
}

/// Maps a signed value to an unsigned one so small magnitudes stay short.
#[inline]
pub fn zigzag_encode(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Inverse of [`zigzag_encode`].
#[inline]
pub fn zigzag_decode(v: u32) -> i32 {
    ((v >> 1) as i32) ^ -((v & 1) as i32)
}
