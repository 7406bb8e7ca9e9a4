//! Encoder and decoder configuration.

use sallos_core::{BlockType, CompressionMode, OutputShape, Parameters};

/// Encoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Kernel used for the stream (default: Mandala).
    pub mode: CompressionMode,

    /// Container header/footer presence (default: both).
    pub output_shape: OutputShape,

    /// Block footer integrity (default: XXH3-128 per block).
    pub block_type: BlockType,

    /// Dictionary reset cadence: `0` never resets, `n` resets every `2^n`
    /// kernel blocks (default: 0).
    pub reset_cycle_shift: u8,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            mode: CompressionMode::Mandala,
            output_shape: OutputShape::Default,
            block_type: BlockType::Default,
            reset_cycle_shift: 0,
        }
    }
}

impl EncoderConfig {
    pub fn new(mode: CompressionMode) -> Self {
        EncoderConfig {
            mode,
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: CompressionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_output_shape(mut self, output_shape: OutputShape) -> Self {
        self.output_shape = output_shape;
        self
    }

    pub fn with_block_type(mut self, block_type: BlockType) -> Self {
        self.block_type = block_type;
        self
    }

    pub fn with_reset_cycle_shift(mut self, shift: u8) -> Self {
        self.reset_cycle_shift = shift;
        self
    }

    /// Parameter block recorded in the container header.
    pub fn parameters(&self) -> Parameters {
        Parameters::default().with_reset_cycle_shift(self.reset_cycle_shift)
    }

    /// What a decoder needs to know when the header is suppressed.
    pub fn frame(&self) -> FrameDescription {
        FrameDescription {
            mode: self.mode,
            block_type: self.block_type,
            parameters: self.parameters(),
        }
    }
}

/// Stream properties normally carried by the container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameDescription {
    pub mode: CompressionMode,
    pub block_type: BlockType,
    pub parameters: Parameters,
}

/// Decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderConfig {
    /// Must match the shape the stream was written with.
    pub output_shape: OutputShape,

    /// Used when the stream has no container header. Ignored otherwise.
    pub fallback: Option<FrameDescription>,
}

impl DecoderConfig {
    pub fn with_output_shape(mut self, output_shape: OutputShape) -> Self {
        self.output_shape = output_shape;
        self
    }

    pub fn with_fallback(mut self, frame: FrameDescription) -> Self {
        self.fallback = Some(frame);
        self
    }
}

impl From<&EncoderConfig> for DecoderConfig {
    /// Decoder settings that read back what `config` writes.
    fn from(config: &EncoderConfig) -> Self {
        DecoderConfig {
            output_shape: config.output_shape,
            fallback: Some(config.frame()),
        }
    }
}
