//! Sliding read buffer over one tile's content stream.
//!
//! The buffer is filled in two phases. First the connection reads raw response
//! bytes into it with [`ReadBuffer::fill_from`] until the header is complete.
//! Then [`ReadBuffer::begin_content`] marks where the body starts and how long
//! it is, and the decoder pulls fields through [`ReadBuffer::ensure`], which
//! never reads past the declared content length.
//!
//! Every content byte taken from the stream is also handed to the stream's
//! mirror (the cache writer, when one is active).

use super::error::FormatError;
use super::varint::{decode_varint32, MAX_VARINT_LEN};
use std::io::{self, ErrorKind, Read, Write};
use tracing::{trace, warn};

/// Capacity of the read buffer. No single field may be larger.
pub const BUFFER_SIZE: usize = 65536;

/// Content source for one decode: a reader plus an optional byte mirror.
pub struct ByteStream<'a> {
    reader: &'a mut dyn Read,
    mirror: Option<&'a mut dyn Write>,
    mirror_failed: bool,
}

impl<'a> ByteStream<'a> {
    /// Wraps a reader without a mirror.
    pub fn new(reader: &'a mut dyn Read) -> Self {
        Self {
            reader,
            mirror: None,
            mirror_failed: false,
        }
    }

    /// Copies every content byte read from now on into `mirror`.
    pub fn with_mirror(mut self, mirror: &'a mut dyn Write) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// True if a mirror write failed and the mirror was abandoned.
    pub fn mirror_failed(&self) -> bool {
        self.mirror_failed
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.reader.read(buf) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }

    fn mirror(&mut self, bytes: &[u8]) {
        if let Some(mirror) = self.mirror.as_mut() {
            if let Err(e) = mirror.write_all(bytes) {
                warn!(error = %e, "Cache mirror write failed, abandoning cache for this tile");
                self.mirror = None;
                self.mirror_failed = true;
            }
        }
    }
}

/// Fixed-capacity sliding buffer.
pub struct ReadBuffer {
    buf: Box<[u8]>,
    /// Next unread byte
    pos: usize,
    /// End of valid data
    filled: usize,
    /// Buffered content bytes at `pos..mirrored_to` already sent to a mirror
    mirrored_to: usize,
    /// Declared body length
    content_length: usize,
    /// Content bytes still in the stream
    unread: usize,
    /// Content bytes handed to the decoder
    consumed: usize,
}

impl Default for ReadBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadBuffer {
    /// Creates an empty buffer of [`BUFFER_SIZE`] bytes.
    pub fn new() -> Self {
        Self::with_capacity(BUFFER_SIZE)
    }

    /// Creates an empty buffer with a custom capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            pos: 0,
            filled: 0,
            mirrored_to: 0,
            content_length: 0,
            unread: 0,
            consumed: 0,
        }
    }

    /// Buffer capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Drops all buffered data and content bookkeeping.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.filled = 0;
        self.mirrored_to = 0;
        self.content_length = 0;
        self.unread = 0;
        self.consumed = 0;
    }

    // ---- raw phase (response header) -------------------------------------

    /// Reads whatever the stream has into the free tail of the buffer.
    ///
    /// Returns the number of bytes read; `0` means end of stream or a full
    /// buffer (check [`is_full`](Self::is_full)).
    pub fn fill_from(&mut self, reader: &mut dyn Read) -> io::Result<usize> {
        if self.is_full() {
            return Ok(0);
        }
        loop {
            match reader.read(&mut self.buf[self.filled..]) {
                Ok(n) => {
                    self.filled += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// True if no free space is left after the valid data.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.filled == self.buf.len()
    }

    /// Bytes between the read position and the end of valid data.
    #[inline]
    pub fn unread_bytes(&self) -> &[u8] {
        &self.buf[self.pos..self.filled]
    }

    /// Skips `n` raw bytes, e.g. a parsed response header.
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.filled);
    }

    // ---- content phase ---------------------------------------------------

    /// Starts a body of `content_length` bytes at the current read position.
    ///
    /// Bytes already buffered count towards the body. Any buffered bytes past
    /// the declared end are discarded.
    pub fn begin_content(&mut self, content_length: usize) {
        let buffered = self.filled - self.pos;
        if buffered > content_length {
            trace!(
                extra = buffered - content_length,
                "Discarding bytes buffered past end of content"
            );
            self.filled = self.pos + content_length;
        }
        self.content_length = content_length;
        self.unread = content_length - (self.filled - self.pos);
        self.consumed = 0;
        self.mirrored_to = self.pos;
    }

    /// Declared body length.
    #[inline]
    pub fn content_length(&self) -> usize {
        self.content_length
    }

    /// Content bytes consumed by the decoder so far.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Content bytes not yet consumed, buffered or not.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.content_length - self.consumed
    }

    #[inline]
    fn available(&self) -> usize {
        self.filled - self.pos
    }

    /// Sends buffered content that has not been mirrored yet to the mirror.
    ///
    /// Covers body bytes that arrived together with the response header.
    pub fn mirror_buffered(&mut self, stream: &mut ByteStream<'_>) {
        if self.mirrored_to < self.filled {
            stream.mirror(&self.buf[self.mirrored_to..self.filled]);
            self.mirrored_to = self.filled;
        }
    }

    /// Makes at least `n` content bytes available at the read position.
    pub fn ensure(&mut self, stream: &mut ByteStream<'_>, n: usize) -> Result<(), FormatError> {
        if self.available() >= n {
            return Ok(());
        }
        if n > self.buf.len() {
            return Err(FormatError::SpanTooLarge {
                requested: n,
                capacity: self.buf.len(),
            });
        }
        // Buffered bytes must reach the mirror before compaction drops them
        self.mirror_buffered(stream);

        if self.pos + n > self.buf.len() {
            // Slide unread bytes to the front to make room
            trace!(kept = self.available(), "Compacting read buffer");
            self.buf.copy_within(self.pos..self.filled, 0);
            self.filled -= self.pos;
            self.pos = 0;
            self.mirrored_to = self.filled;
        }

        while self.available() < n {
            if self.unread == 0 {
                return Err(self.truncated(n));
            }
            let max = (self.buf.len() - self.filled).min(self.unread);
            let start = self.filled;
            let len = stream.read(&mut self.buf[start..start + max])?;
            if len == 0 {
                return Err(self.truncated(n));
            }
            stream.mirror(&self.buf[start..start + len]);
            self.filled += len;
            self.mirrored_to = self.filled;
            self.unread -= len;
        }
        Ok(())
    }

    fn truncated(&self, needed: usize) -> FormatError {
        FormatError::Truncated {
            offset: self.consumed,
            needed,
            available: self.available(),
        }
    }

    #[inline]
    fn consume(&mut self, n: usize) {
        self.pos += n;
        self.consumed += n;
    }

    /// Reads one varint.
    pub fn read_varint(&mut self, stream: &mut ByteStream<'_>) -> Result<u32, FormatError> {
        let want = MAX_VARINT_LEN.min(self.remaining());
        self.ensure(stream, want)?;

        let bytes = &self.buf[self.pos..self.filled];
        let (value, len) = decode_varint32(bytes)
            .map_err(|e| FormatError::from_varint(e, self.consumed, bytes.len()))?;
        self.consume(len);
        Ok(value)
    }

    /// Reads a length prefix and then a whole length-delimited span of
    /// varints, passing each value to `f`. Returns the number of values.
    pub fn read_packed(
        &mut self,
        stream: &mut ByteStream<'_>,
        mut f: impl FnMut(u32),
    ) -> Result<usize, FormatError> {
        let len = self.read_varint(stream)? as usize;
        self.ensure(stream, len)?;

        let span = &self.buf[self.pos..self.pos + len];
        let mut offset = 0;
        let mut count = 0;
        while offset < len {
            let (value, n) = decode_varint32(&span[offset..]).map_err(|e| {
                FormatError::from_varint(e, self.consumed + offset, len - offset)
            })?;
            offset += n;
            count += 1;
            f(value);
        }

        self.consume(len);
        Ok(count)
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_string(&mut self, stream: &mut ByteStream<'_>) -> Result<&str, FormatError> {
        let len = self.read_varint(stream)? as usize;
        self.ensure(stream, len)?;

        let start = self.pos;
        let offset = self.consumed;
        self.consume(len);
        std::str::from_utf8(&self.buf[start..start + len])
            .map_err(|_| FormatError::InvalidUtf8 { offset })
    }

    /// Skips `len` content bytes. The span may exceed the buffer capacity.
    pub fn skip(&mut self, stream: &mut ByteStream<'_>, mut len: usize) -> Result<(), FormatError> {
        while len > 0 {
            let chunk = len.min(self.buf.len());
            self.ensure(stream, chunk)?;
            self.consume(chunk);
            len -= chunk;
        }
        Ok(())
    }

    /// Reads (and mirrors) the rest of the content without decoding it, so
    /// the stream is positioned after the body.
    pub fn finish(&mut self, stream: &mut ByteStream<'_>) -> Result<(), FormatError> {
        self.skip(stream, self.remaining())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::varint::encode_varint32;
    use std::io::Cursor;

    /// Reader that hands out at most `chunk` bytes per call.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    /// Writer that fails on every call.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn content_buffer(len: usize, capacity: usize) -> ReadBuffer {
        let mut buffer = ReadBuffer::with_capacity(capacity);
        buffer.begin_content(len);
        buffer
    }

    #[test]
    fn test_reads_varints_across_refills() {
        let mut data = Vec::new();
        for v in [1u32, 300, 70_000, u32::MAX, 0] {
            encode_varint32(v, &mut data);
        }
        let len = data.len();
        let mut reader = Trickle { data, pos: 0, chunk: 3 };
        let mut stream = ByteStream::new(&mut reader);
        let mut buffer = content_buffer(len, 16);

        let mut values = Vec::new();
        while buffer.remaining() > 0 {
            values.push(buffer.read_varint(&mut stream).unwrap());
        }

        assert_eq!(values, vec![1, 300, 70_000, u32::MAX, 0]);
        assert_eq!(buffer.consumed(), len);
    }

    #[test]
    fn test_span_larger_than_capacity_is_fatal() {
        let mut reader = Cursor::new(vec![0u8; 64]);
        let mut stream = ByteStream::new(&mut reader);
        let mut buffer = content_buffer(64, 16);

        let err = buffer.ensure(&mut stream, 17).unwrap_err();
        assert!(matches!(
            err,
            FormatError::SpanTooLarge {
                requested: 17,
                capacity: 16
            }
        ));
    }

    #[test]
    fn test_compacts_when_span_would_overrun_end() {
        let data: Vec<u8> = (0u8..32).collect();
        let mut reader = Cursor::new(data);
        let mut stream = ByteStream::new(&mut reader);
        let mut buffer = content_buffer(32, 16);

        buffer.skip(&mut stream, 12).unwrap();
        buffer.ensure(&mut stream, 10).unwrap();

        assert_eq!(buffer.unread_bytes()[0], 12);
        assert!(buffer.unread_bytes().len() >= 10);
    }

    #[test]
    fn test_never_reads_past_content_length() {
        let mut reader = Cursor::new(vec![7u8; 100]);
        let mut stream = ByteStream::new(&mut reader);
        let mut buffer = content_buffer(10, 64);

        buffer.finish(&mut stream).unwrap();

        assert_eq!(reader.position(), 10);
    }

    #[test]
    fn test_truncated_stream_is_reported() {
        let mut reader = Cursor::new(vec![1u8; 4]);
        let mut stream = ByteStream::new(&mut reader);
        let mut buffer = content_buffer(10, 64);

        let err = buffer.skip(&mut stream, 8).unwrap_err();
        assert!(matches!(err, FormatError::Truncated { .. }));
    }

    #[test]
    fn test_skip_spans_larger_than_capacity() {
        let mut reader = Cursor::new(vec![3u8; 100]);
        let mut stream = ByteStream::new(&mut reader);
        let mut buffer = content_buffer(100, 16);

        buffer.skip(&mut stream, 90).unwrap();

        assert_eq!(buffer.consumed(), 90);
        assert_eq!(buffer.remaining(), 10);
    }

    #[test]
    fn test_read_string() {
        let mut data = vec![5];
        data.extend_from_slice(b"Weser");
        let len = data.len();
        let mut reader = Cursor::new(data);
        let mut stream = ByteStream::new(&mut reader);
        let mut buffer = content_buffer(len, 64);

        assert_eq!(buffer.read_string(&mut stream).unwrap(), "Weser");
        assert_eq!(buffer.remaining(), 0);
    }

    #[test]
    fn test_invalid_utf8_string() {
        let data = vec![2, 0xc3, 0x28];
        let mut reader = Cursor::new(data);
        let mut stream = ByteStream::new(&mut reader);
        let mut buffer = content_buffer(3, 64);

        let err = buffer.read_string(&mut stream).unwrap_err();
        assert!(matches!(err, FormatError::InvalidUtf8 { offset: 1 }));
    }

    #[test]
    fn test_read_packed_counts_values() {
        let mut span = Vec::new();
        for v in [3u32, 200, 5] {
            encode_varint32(v, &mut span);
        }
        let mut data = vec![span.len() as u8];
        data.extend(span);
        let len = data.len();
        let mut reader = Cursor::new(data);
        let mut stream = ByteStream::new(&mut reader);
        let mut buffer = content_buffer(len, 64);

        let mut values = Vec::new();
        let count = buffer.read_packed(&mut stream, |v| values.push(v)).unwrap();

        assert_eq!(count, 3);
        assert_eq!(values, vec![3, 200, 5]);
    }

    #[test]
    fn test_packed_span_ending_mid_varint_is_truncated() {
        let data = vec![2, 0x01, 0x80];
        let mut reader = Cursor::new(data);
        let mut stream = ByteStream::new(&mut reader);
        let mut buffer = content_buffer(3, 64);

        let err = buffer.read_packed(&mut stream, |_| {}).unwrap_err();
        assert!(matches!(err, FormatError::Truncated { .. }));
    }

    #[test]
    fn test_mirror_receives_prebuffered_and_streamed_bytes() {
        let body: Vec<u8> = (0u8..40).collect();
        let mut header = b"HEADER".to_vec();
        header.extend_from_slice(&body[..8]);

        // Header plus the first 8 body bytes arrive in the raw phase
        let mut buffer = ReadBuffer::with_capacity(32);
        buffer.fill_from(&mut Cursor::new(header)).unwrap();
        buffer.advance(6);
        buffer.begin_content(body.len());

        let mut rest = Cursor::new(body[8..].to_vec());
        let mut copy = Vec::new();
        let mut stream = ByteStream::new(&mut rest).with_mirror(&mut copy);
        buffer.mirror_buffered(&mut stream);
        buffer.finish(&mut stream).unwrap();
        drop(stream);

        assert_eq!(copy, body);
    }

    #[test]
    fn test_mirror_failure_does_not_stop_reading() {
        let mut reader = Cursor::new(vec![1u8; 20]);
        let mut broken = Broken;
        let mut stream = ByteStream::new(&mut reader).with_mirror(&mut broken);
        let mut buffer = content_buffer(20, 64);

        buffer.finish(&mut stream).unwrap();

        assert!(stream.mirror_failed());
        assert_eq!(buffer.remaining(), 0);
    }

    #[test]
    fn test_begin_content_discards_bytes_past_end() {
        let mut buffer = ReadBuffer::with_capacity(32);
        buffer.fill_from(&mut Cursor::new(vec![9u8; 20])).unwrap();
        buffer.begin_content(5);

        assert_eq!(buffer.unread_bytes().len(), 5);
        assert_eq!(buffer.remaining(), 5);
    }
}
