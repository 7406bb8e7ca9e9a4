//! Compressing writer.

use std::io::{self, Write};

use tracing::debug;

use sallos::{Encoder, EncoderConfig};
use sallos_core::{CompressionStats, InputCursor, OutputCursor, Status};

use crate::{clamp_buffer_size, StreamBuffer, DEFAULT_BUFFER_SIZE};

/// A writer that compresses everything written to it into `inner`.
///
/// The encoder holds back at most one partial group between calls, so
/// [`flush`](Write::flush) writes out every complete group but not the tail.
/// Call [`finish`](CompressWriter::finish) to end the stream; dropping the
/// writer finishes it on a best-effort basis and discards any error.
pub struct CompressWriter<W: Write> {
    inner: Option<W>,
    encoder: Encoder,
    buffer: StreamBuffer,
    stats: Option<CompressionStats>,
}

impl<W: Write> CompressWriter<W> {
    pub fn new(inner: W, config: EncoderConfig) -> sallos::Result<Self> {
        Self::with_buffer_size(inner, config, DEFAULT_BUFFER_SIZE)
    }

    /// Create a writer whose compressed output is staged in `buffer_size` bytes.
    pub fn with_buffer_size(
        inner: W,
        config: EncoderConfig,
        buffer_size: usize,
    ) -> sallos::Result<Self> {
        Ok(Self {
            inner: Some(inner),
            encoder: Encoder::new(config)?,
            buffer: StreamBuffer::with_capacity(clamp_buffer_size(buffer_size)),
            stats: None,
        })
    }

    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut W> {
        self.inner.as_mut()
    }

    /// Uncompressed bytes accepted so far.
    pub fn total_in(&self) -> u64 {
        self.encoder.total_in()
    }

    /// End the stream and return the inner writer.
    pub fn finish(self) -> io::Result<W> {
        self.finish_with_stats().map(|(inner, _)| inner)
    }

    /// End the stream and return the inner writer with the stream summary.
    pub fn finish_with_stats(mut self) -> io::Result<(W, CompressionStats)> {
        let stats = self.do_finish()?;
        let inner = self
            .inner
            .take()
            .ok_or_else(|| io::Error::other("writer already finished"))?;
        Ok((inner, stats))
    }

    fn do_finish(&mut self) -> io::Result<CompressionStats> {
        if let Some(stats) = &self.stats {
            return Ok(stats.clone());
        }
        self.pump(&[], true)?;
        let stats = self.encoder.finish()?;
        self.write_buffer()?;
        if let Some(inner) = self.inner.as_mut() {
            inner.flush()?;
        }
        debug!(
            original = stats.original_size,
            compressed = stats.compressed_size,
            "compress writer finished"
        );
        self.stats = Some(stats.clone());
        Ok(stats)
    }

    /// Run the encoder over `data`, writing out staged output as it fills.
    fn pump(&mut self, data: &[u8], flush: bool) -> io::Result<()> {
        let mut input = InputCursor::new(data);
        loop {
            let mut output = OutputCursor::new(self.buffer.writable());
            let status = self.encoder.process(&mut input, &mut output, flush)?;
            let produced = output.position();
            self.buffer.advance(produced);

            match status {
                Status::Ready => return Ok(()),
                Status::StallOnInput => return Ok(()),
                Status::StallOnOutput => self.write_buffer()?,
            }
        }
    }

    fn write_buffer(&mut self) -> io::Result<()> {
        let inner = self
            .inner
            .as_mut()
            .ok_or_else(|| io::Error::other("writer already finished"))?;
        self.buffer.write_to(inner)
    }
}

impl<W: Write> Write for CompressWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.stats.is_some() {
            return Err(io::Error::other("writer already finished"));
        }
        self.pump(buf, false)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.write_buffer()?;
        match self.inner.as_mut() {
            Some(inner) => inner.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for CompressWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() && self.stats.is_none() {
            let _ = self.do_finish();
        }
    }
}
