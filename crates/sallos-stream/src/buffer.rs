//! Byte window between an I/O endpoint and the codec.

use std::io::{self, Read, Write};

use crate::DEFAULT_BUFFER_SIZE;

/// A reusable buffer of pending bytes.
///
/// Bytes are appended at the write position and taken from the read
/// position. The codec sees [`readable`](StreamBuffer::readable) as its
/// input or [`writable`](StreamBuffer::writable) as its output.
#[derive(Debug)]
pub struct StreamBuffer {
    data: Box<[u8]>,
    read_pos: usize,
    write_pos: usize,
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            read_pos: 0,
            write_pos: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes waiting to be taken.
    #[inline]
    pub fn available(&self) -> usize {
        self.write_pos - self.read_pos
    }

    /// Free space after the write position.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.write_pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read_pos == self.write_pos
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.write_pos == self.data.len()
    }

    #[inline]
    pub fn readable(&self) -> &[u8] {
        &self.data[self.read_pos..self.write_pos]
    }

    #[inline]
    pub fn writable(&mut self) -> &mut [u8] {
        &mut self.data[self.write_pos..]
    }

    /// Mark `n` readable bytes as taken.
    #[inline]
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.available());
        self.read_pos += n;
        if self.read_pos == self.write_pos {
            self.clear();
        }
    }

    /// Mark `n` writable bytes as filled.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.remaining());
        self.write_pos += n;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
    }

    /// Move unread bytes to the front.
    pub fn compact(&mut self) {
        if self.read_pos > 0 {
            let available = self.available();
            self.data.copy_within(self.read_pos..self.write_pos, 0);
            self.read_pos = 0;
            self.write_pos = available;
        }
    }

    /// Copy bytes out, returning how many were taken.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.available());
        buf[..n].copy_from_slice(&self.data[self.read_pos..self.read_pos + n]);
        self.consume(n);
        n
    }

    /// Read once from `reader` into the free space, compacting first.
    ///
    /// Returns the byte count from the reader; `0` means end of input, or no
    /// space left when the buffer [`is_full`](StreamBuffer::is_full).
    pub fn fill_from<R: Read>(&mut self, reader: &mut R) -> io::Result<usize> {
        self.compact();
        if self.is_full() {
            return Ok(0);
        }
        loop {
            match reader.read(self.writable()) {
                Ok(n) => {
                    self.advance(n);
                    return Ok(n);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    /// Write every readable byte to `writer`.
    pub fn write_to<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if !self.is_empty() {
            writer.write_all(self.readable())?;
            self.clear();
        }
        Ok(())
    }
}

impl Default for StreamBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buf = StreamBuffer::new();
        assert_eq!(buf.capacity(), DEFAULT_BUFFER_SIZE);
        assert!(buf.is_empty());
        assert!(!buf.is_full());
    }

    #[test]
    fn test_fill_and_read() {
        let mut buf = StreamBuffer::with_capacity(8);
        let mut source = io::Cursor::new(b"compressed bytes".to_vec());
        assert_eq!(buf.fill_from(&mut source).unwrap(), 8);
        assert!(buf.is_full());
        assert_eq!(buf.fill_from(&mut source).unwrap(), 0);

        let mut out = [0u8; 3];
        assert_eq!(buf.read(&mut out), 3);
        assert_eq!(&out, b"com");

        // Compaction makes room for the rest of the source.
        assert_eq!(buf.fill_from(&mut source).unwrap(), 3);
        assert_eq!(buf.readable(), b"pressed ");
    }

    #[test]
    fn test_consume_all_resets_positions() {
        let mut buf = StreamBuffer::with_capacity(16);
        buf.writable()[..5].copy_from_slice(b"hello");
        buf.advance(5);
        buf.consume(5);
        assert!(buf.is_empty());
        assert_eq!(buf.remaining(), 16);
    }

    #[test]
    fn test_write_to() {
        let mut buf = StreamBuffer::with_capacity(16);
        buf.writable()[..4].copy_from_slice(b"data");
        buf.advance(4);
        let mut sink = Vec::new();
        buf.write_to(&mut sink).unwrap();
        assert_eq!(sink, b"data");
        assert!(buf.is_empty());
    }
}
