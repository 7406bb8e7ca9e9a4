//! Bounded memory cursors and output staging.
//!
//! A cursor wraps a caller-owned slice and a position. Engines advance it in
//! place; the caller reads `position()` afterwards to learn how much was
//! consumed or produced. Cursors are never retained across calls.

/// Read side: bytes presented to an engine for consumption.
#[derive(Debug)]
pub struct InputCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> InputCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes still available.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unconsumed bytes.
    #[inline]
    pub fn as_slice(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    /// Mark `n` bytes consumed.
    ///
    /// # Panics
    /// If `n` exceeds [`remaining`](Self::remaining).
    #[inline]
    pub fn advance(&mut self, n: usize) {
        assert!(n <= self.remaining(), "input cursor advanced past its end");
        self.position += n;
    }

    /// Consume and return the next `n` bytes.
    ///
    /// # Panics
    /// If `n` exceeds [`remaining`](Self::remaining).
    #[inline]
    pub fn take(&mut self, n: usize) -> &'a [u8] {
        let slice = &self.as_slice()[..n];
        self.position += n;
        slice
    }

    /// Consume the next `N` bytes into an array, or nothing if fewer remain.
    #[inline]
    pub fn take_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes: [u8; N] = self.as_slice().get(..N)?.try_into().ok()?;
        self.position += N;
        Some(bytes)
    }
}

/// Write side: capacity presented to an engine for production.
#[derive(Debug)]
pub struct OutputCursor<'a> {
    data: &'a mut [u8],
    position: usize,
}

impl<'a> OutputCursor<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Bytes produced so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Capacity still available.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    /// Unwritten capacity, for engines that encode in place and then `advance`.
    #[inline]
    pub fn unfilled_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.position..]
    }

    /// Bytes written so far.
    #[inline]
    pub fn written(&self) -> &[u8] {
        &self.data[..self.position]
    }

    /// Mark `n` bytes produced.
    ///
    /// # Panics
    /// If `n` exceeds [`remaining`](Self::remaining).
    #[inline]
    pub fn advance(&mut self, n: usize) {
        assert!(n <= self.remaining(), "output cursor advanced past its end");
        self.position += n;
    }

    /// Copy as much of `bytes` as fits. Returns the number copied.
    #[inline]
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.remaining());
        self.data[self.position..self.position + n].copy_from_slice(&bytes[..n]);
        self.position += n;
        n
    }

    /// Copy all of `bytes` if it fits, otherwise nothing.
    #[inline]
    pub fn write_all(&mut self, bytes: &[u8]) -> bool {
        if bytes.len() > self.remaining() {
            return false;
        }
        self.write(bytes);
        true
    }
}

/// Staging area for output that did not fit the caller's buffer.
///
/// Engines produce fixed-size structures atomically. When the output cursor
/// is too small the structure is staged here and drained over later calls,
/// so progress never depends on the caller's buffer size.
#[derive(Debug, Clone)]
pub struct Spill {
    buf: Box<[u8]>,
    start: usize,
    end: usize,
}

impl Spill {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            start: 0,
            end: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes staged and not yet drained.
    #[inline]
    pub fn pending(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whole staging buffer for in-place encoding. Only valid while empty.
    #[inline]
    pub fn stage_mut(&mut self) -> &mut [u8] {
        debug_assert!(self.is_empty());
        self.start = 0;
        self.end = 0;
        &mut self.buf
    }

    /// Commit `n` bytes written through [`stage_mut`](Self::stage_mut).
    #[inline]
    pub fn commit(&mut self, n: usize) {
        debug_assert!(n <= self.buf.len());
        self.start = 0;
        self.end = n;
    }

    /// Stage a copy of `bytes`. Only valid while empty.
    pub fn stage(&mut self, bytes: &[u8]) {
        self.stage_mut()[..bytes.len()].copy_from_slice(bytes);
        self.commit(bytes.len());
    }

    /// Move staged bytes into `out`. Returns `true` once nothing is pending.
    #[inline]
    pub fn drain(&mut self, out: &mut OutputCursor<'_>) -> bool {
        if !self.is_empty() {
            let n = out.write(&self.buf[self.start..self.end]);
            self.start += n;
        }
        self.is_empty()
    }

    /// Write `bytes` directly if they fit, otherwise stage them.
    ///
    /// Must only be called when nothing is pending.
    pub fn emit(&mut self, bytes: &[u8], out: &mut OutputCursor<'_>) {
        if !out.write_all(bytes) {
            self.stage(bytes);
            self.drain(out);
        }
    }

    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
    }
}
