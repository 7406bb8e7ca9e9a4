//! Decompressing reader.

use std::io::{self, Read};

use tracing::debug;

use sallos::{Decoder, DecoderConfig};
use sallos_core::{CompressionStats, InputCursor, OutputCursor, Status};

use crate::{clamp_buffer_size, StreamBuffer, DEFAULT_BUFFER_SIZE};

/// A reader that decompresses a Sallos stream read from `inner`.
///
/// Reading stops at the end of the stream. Bytes the decoder has not yet
/// consumed (at most a trailer's worth) stay in the input buffer and are
/// presented again together with the next read from `inner`.
pub struct DecompressReader<R: Read> {
    inner: R,
    decoder: Decoder,
    input: StreamBuffer,
    output: StreamBuffer,
    needs_input: bool,
    eof: bool,
    stats: Option<CompressionStats>,
}

impl<R: Read> DecompressReader<R> {
    pub fn new(inner: R, config: DecoderConfig) -> sallos::Result<Self> {
        Self::with_buffer_size(inner, config, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(
        inner: R,
        config: DecoderConfig,
        buffer_size: usize,
    ) -> sallos::Result<Self> {
        let size = clamp_buffer_size(buffer_size);
        Ok(Self {
            inner,
            decoder: Decoder::new(config)?,
            input: StreamBuffer::with_capacity(size),
            output: StreamBuffer::with_capacity(size),
            needs_input: true,
            eof: false,
            stats: None,
        })
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Stream summary, once the end of the stream has been read.
    pub fn stats(&self) -> Option<&CompressionStats> {
        self.stats.as_ref()
    }

    /// Decode until output is staged or the stream ends.
    fn decode_more(&mut self) -> io::Result<()> {
        while self.output.is_empty() && self.stats.is_none() {
            if self.needs_input && !self.eof {
                if self.input.fill_from(&mut self.inner)? == 0 {
                    if self.input.is_full() {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidData,
                            "decoder stalled with a full input buffer",
                        ));
                    }
                    self.eof = true;
                }
            }

            let mut src = InputCursor::new(self.input.readable());
            let mut dst = OutputCursor::new(self.output.writable());
            let status = self.decoder.process(&mut src, &mut dst, self.eof)?;
            let (consumed, produced) = (src.position(), dst.position());
            self.input.consume(consumed);
            self.output.advance(produced);

            match status {
                Status::Ready => {
                    let stats = self.decoder.finish()?;
                    debug!(
                        original = stats.original_size,
                        compressed = stats.compressed_size,
                        "decompress reader reached end of stream"
                    );
                    self.stats = Some(stats);
                }
                Status::StallOnInput if self.eof => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "compressed stream ended early",
                    ));
                }
                Status::StallOnInput => self.needs_input = true,
                Status::StallOnOutput => self.needs_input = false,
            }
        }
        Ok(())
    }
}

impl<R: Read> Read for DecompressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.decode_more()?;
        Ok(self.output.read(buf))
    }
}
