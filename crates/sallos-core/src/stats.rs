//! Statistics for encode and decode streams.

use crate::types::{CompressionMode, CompressionRatio};

/// Summary returned by `finish` on an encoder or decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressionStats {
    /// Mode the stream was configured with.
    pub mode: Option<CompressionMode>,

    /// Original (uncompressed) size in bytes.
    pub original_size: u64,

    /// Compressed size in bytes, including container sections.
    pub compressed_size: u64,

    /// Blocks whose payload went through a kernel.
    pub kernel_blocks: u64,

    /// Blocks carried verbatim.
    pub copy_blocks: u64,

    /// Whether the stream fell back to copy mode after net expansion.
    pub downgraded: bool,
}

impl CompressionStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total blocks in the stream.
    pub fn blocks(&self) -> u64 {
        self.kernel_blocks + self.copy_blocks
    }

    /// Get compression ratio.
    pub fn ratio(&self) -> CompressionRatio {
        CompressionRatio::new(self.original_size, self.compressed_size)
    }

    /// Get space savings as percentage.
    pub fn savings_percent(&self) -> f64 {
        self.ratio().savings_percent()
    }

    /// Merge stats from multiple streams.
    pub fn merge(&mut self, other: &CompressionStats) {
        self.original_size += other.original_size;
        self.compressed_size += other.compressed_size;
        self.kernel_blocks += other.kernel_blocks;
        self.copy_blocks += other.copy_blocks;
        self.downgraded |= other.downgraded;
        if self.mode != other.mode {
            self.mode = None;
        }
    }
}
