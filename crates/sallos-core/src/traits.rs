//! One-shot traits over whole buffers.
//!
//! The incremental engines live in the `sallos` crate; these traits are the
//! convenience surface for callers that hold the entire input in memory.

use crate::error::Result;
use crate::stats::CompressionStats;
use crate::types::{CompressionMode, CompressionRatio};

/// One-shot compression operations.
pub trait Compressor {
    /// Get the configured compression mode.
    fn mode(&self) -> CompressionMode;

    /// Compress data in one shot.
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Compress data into an existing buffer.
    ///
    /// Returns the number of bytes written. Fails with
    /// [`Error::BufferTooSmall`](crate::Error::BufferTooSmall) rather than
    /// truncating.
    fn compress_to(&self, input: &[u8], output: &mut [u8]) -> Result<usize>;

    /// Calculate maximum compressed size for input length.
    /// Useful for pre-allocating output buffers.
    fn max_compressed_size(&self, input_len: usize) -> usize;

    /// Get compression statistics after operation.
    fn stats(&self) -> Option<CompressionStats> {
        None
    }
}

/// One-shot decompression operations.
pub trait Decompressor {
    /// Decompress data in one shot.
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Decompress data into an existing buffer.
    ///
    /// Returns the number of bytes written.
    fn decompress_to(&self, input: &[u8], output: &mut [u8]) -> Result<usize>;

    /// Decompress with known output size.
    fn decompress_with_size(&self, input: &[u8], output_size: usize) -> Result<Vec<u8>> {
        let mut output = vec![0u8; output_size];
        let written = self.decompress_to(input, &mut output)?;
        output.truncate(written);
        Ok(output)
    }
}

/// Combined compress and decompress capability.
pub trait Codec: Compressor + Decompressor {
    /// Create a codec with default settings.
    fn new() -> Self
    where
        Self: Sized;

    /// Create a codec for a specific mode.
    fn with_mode(mode: CompressionMode) -> Self
    where
        Self: Sized;

    /// Verify that `input` survives a round trip.
    fn verify_roundtrip(&self, input: &[u8]) -> Result<bool> {
        let compressed = self.compress(input)?;
        let decompressed = self.decompress(&compressed)?;
        Ok(decompressed == input)
    }

    /// Measure the ratio achieved on `input`.
    fn measure_ratio(&self, input: &[u8]) -> Result<CompressionRatio> {
        let compressed = self.compress(input)?;
        Ok(CompressionRatio::new(
            input.len() as u64,
            compressed.len() as u64,
        ))
    }
}
