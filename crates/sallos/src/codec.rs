//! [`Codec`] implementation over the one-shot buffer API.

use sallos_core::{Codec, CompressionMode, Compressor, Decompressor, Result};

use crate::buffers;
use crate::config::{DecoderConfig, EncoderConfig};

/// Sallos codec with a fixed encoder configuration.
///
/// Decoding reads the mode from the container header, so any stream written
/// with a header and footer decodes regardless of the configured mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct SallosCodec {
    config: EncoderConfig,
}

impl SallosCodec {
    pub fn with_config(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig::from(&self.config)
    }
}

impl Compressor for SallosCodec {
    fn mode(&self) -> CompressionMode {
        self.config.mode
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        buffers::compress(input, &self.config)
    }

    fn compress_to(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        buffers::compress_to(input, output, &self.config)
    }

    fn max_compressed_size(&self, input_len: usize) -> usize {
        buffers::max_compressed_length(input_len, self.config.mode)
    }
}

impl Decompressor for SallosCodec {
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        buffers::decompress(input, &self.decoder_config())
    }

    fn decompress_to(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        buffers::decompress_to(input, output, &self.decoder_config())
    }
}

impl Codec for SallosCodec {
    fn new() -> Self {
        Self::default()
    }

    fn with_mode(mode: CompressionMode) -> Self {
        Self::with_config(EncoderConfig::new(mode))
    }
}
