//! Core type definitions shared by the framing engine and the kernels.

use crate::error::{Error, Result};

/// Compression mode recorded in the container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionMode {
    /// Verbatim copy blocks only (framing without compression).
    Copy,
    /// Single-level hash dictionary, one flag bit per chunk.
    Chameleon,
    /// Two-level hash dictionary with a sequential predictor.
    #[default]
    Mandala,
}

impl CompressionMode {
    /// All modes, in selector order.
    pub const ALL: [CompressionMode; 3] = [
        CompressionMode::Copy,
        CompressionMode::Chameleon,
        CompressionMode::Mandala,
    ];

    /// Get mode name as string.
    pub fn name(self) -> &'static str {
        match self {
            CompressionMode::Copy => "copy",
            CompressionMode::Chameleon => "chameleon",
            CompressionMode::Mandala => "mandala",
        }
    }

    /// Header selector byte.
    pub fn selector(self) -> u8 {
        match self {
            CompressionMode::Copy => 0,
            CompressionMode::Chameleon => 1,
            CompressionMode::Mandala => 2,
        }
    }

    /// Parse a header selector byte.
    pub fn from_selector(selector: u8) -> Result<Self> {
        match selector {
            0 => Ok(CompressionMode::Copy),
            1 => Ok(CompressionMode::Chameleon),
            2 => Ok(CompressionMode::Mandala),
            other => Err(Error::Unsupported(format!(
                "compression mode selector {other}"
            ))),
        }
    }

    /// Whether this mode runs a dictionary kernel.
    pub fn uses_kernel(self) -> bool {
        !matches!(self, CompressionMode::Copy)
    }
}

/// Block type: whether each block carries an integrity footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockType {
    /// Every block ends with a 128-bit checksum footer.
    #[default]
    Default,
    /// Block footers are omitted entirely.
    NoIntegrityCheck,
}

impl BlockType {
    /// Header selector byte.
    pub fn selector(self) -> u8 {
        match self {
            BlockType::Default => 0,
            BlockType::NoIntegrityCheck => 1,
        }
    }

    /// Parse a header selector byte.
    pub fn from_selector(selector: u8) -> Result<Self> {
        match selector {
            0 => Ok(BlockType::Default),
            1 => Ok(BlockType::NoIntegrityCheck),
            other => Err(Error::Unsupported(format!("block type selector {other}"))),
        }
    }

    /// Whether blocks carry a checksum footer.
    pub fn has_integrity_check(self) -> bool {
        matches!(self, BlockType::Default)
    }
}

/// Which one-time container sections are written (or expected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputShape {
    /// Container header and footer.
    #[default]
    Default,
    /// Container footer only.
    WithoutHeader,
    /// Container header only.
    WithoutFooter,
    /// Bare block stream.
    WithoutHeaderNorFooter,
}

impl OutputShape {
    /// Whether the container header is present.
    pub fn has_header(self) -> bool {
        matches!(self, OutputShape::Default | OutputShape::WithoutFooter)
    }

    /// Whether the container footer is present.
    pub fn has_footer(self) -> bool {
        matches!(self, OutputShape::Default | OutputShape::WithoutHeader)
    }
}

/// Mode marker byte written at the start of a block and at efficiency checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockMode {
    /// Raw bytes follow.
    Copy,
    /// Kernel groups follow.
    Kernel,
}

impl BlockMode {
    /// Marker byte.
    pub fn marker(self) -> u8 {
        match self {
            BlockMode::Copy => 0,
            BlockMode::Kernel => 1,
        }
    }

    /// Parse a marker byte.
    pub fn from_marker(marker: u8) -> Result<Self> {
        match marker {
            0 => Ok(BlockMode::Copy),
            1 => Ok(BlockMode::Kernel),
            other => Err(Error::corrupted(format!("unknown block mode marker {other}"))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockMode::Copy => "copy",
            BlockMode::Kernel => "kernel",
        }
    }
}

/// The 8-byte algorithm parameter block carried in the container header.
///
/// Byte 0 holds the dictionary reset cycle shift: `0` never resets, `n`
/// resets the dictionary every `2^n` kernel blocks. Other bytes are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Parameters([u8; 8]);

impl Parameters {
    /// Largest accepted reset cycle shift.
    pub const MAX_RESET_CYCLE_SHIFT: u8 = 32;

    /// Create parameters from raw bytes.
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Parameters(bytes)
    }

    /// Raw bytes.
    pub fn to_bytes(self) -> [u8; 8] {
        self.0
    }

    /// Set the dictionary reset cycle shift.
    pub fn with_reset_cycle_shift(mut self, shift: u8) -> Self {
        self.0[0] = shift;
        self
    }

    /// Dictionary reset cycle shift.
    pub fn reset_cycle_shift(self) -> u8 {
        self.0[0]
    }

    /// Reject values the kernels cannot honor.
    pub fn validate(self) -> Result<()> {
        if self.reset_cycle_shift() > Self::MAX_RESET_CYCLE_SHIFT {
            return Err(Error::Unsupported(format!(
                "dictionary reset cycle shift {}",
                self.reset_cycle_shift()
            )));
        }
        Ok(())
    }
}

/// Container format version: major, minor, revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatVersion {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
}

impl FormatVersion {
    pub const fn new(major: u8, minor: u8, revision: u8) -> Self {
        FormatVersion {
            major,
            minor,
            revision,
        }
    }

    /// Whether a stream written with `other` can be read by this version.
    pub fn can_read(self, other: FormatVersion) -> bool {
        self.major == other.major
    }
}

impl core::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

/// Compression ratio metrics.
#[derive(Debug, Clone, Copy)]
pub struct CompressionRatio {
    /// Original uncompressed size in bytes.
    pub original_size: u64,
    /// Compressed size in bytes.
    pub compressed_size: u64,
}

impl CompressionRatio {
    /// Create new ratio from sizes.
    pub fn new(original: u64, compressed: u64) -> Self {
        CompressionRatio {
            original_size: original,
            compressed_size: compressed,
        }
    }

    /// Calculate ratio (original / compressed).
    /// Higher is better (more compression).
    pub fn ratio(&self) -> f64 {
        if self.compressed_size == 0 {
            return 0.0;
        }
        self.original_size as f64 / self.compressed_size as f64
    }

    /// Calculate space savings as percentage (0-100).
    pub fn savings_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - (self.compressed_size as f64 / self.original_size as f64)) * 100.0
    }

    /// Check if compression was effective (saved space).
    pub fn is_effective(&self) -> bool {
        self.compressed_size < self.original_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selector_roundtrip() {
        for mode in CompressionMode::ALL {
            assert_eq!(CompressionMode::from_selector(mode.selector()).unwrap(), mode);
        }
        assert!(matches!(
            CompressionMode::from_selector(9),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_output_shape_sections() {
        assert!(OutputShape::Default.has_header());
        assert!(OutputShape::Default.has_footer());
        assert!(!OutputShape::WithoutHeader.has_header());
        assert!(OutputShape::WithoutHeader.has_footer());
        assert!(OutputShape::WithoutFooter.has_header());
        assert!(!OutputShape::WithoutFooter.has_footer());
        assert!(!OutputShape::WithoutHeaderNorFooter.has_header());
        assert!(!OutputShape::WithoutHeaderNorFooter.has_footer());
    }

    #[test]
    fn test_block_mode_marker() {
        assert_eq!(BlockMode::from_marker(0).unwrap(), BlockMode::Copy);
        assert_eq!(BlockMode::from_marker(1).unwrap(), BlockMode::Kernel);
        assert!(BlockMode::from_marker(7).is_err());
    }

    #[test]
    fn test_parameters_reset_shift() {
        let params = Parameters::default().with_reset_cycle_shift(6);
        assert_eq!(params.reset_cycle_shift(), 6);
        assert_eq!(params.to_bytes(), [6, 0, 0, 0, 0, 0, 0, 0]);
        assert!(params.validate().is_ok());
        assert!(Parameters::default()
            .with_reset_cycle_shift(200)
            .validate()
            .is_err());
    }

    #[test]
    fn test_version_compat() {
        let current = FormatVersion::new(0, 1, 0);
        assert!(current.can_read(FormatVersion::new(0, 3, 2)));
        assert!(!current.can_read(FormatVersion::new(1, 0, 0)));
        assert_eq!(current.to_string(), "0.1.0");
    }

    #[test]
    fn test_ratio() {
        let ratio = CompressionRatio::new(1000, 250);
        assert!((ratio.ratio() - 4.0).abs() < f64::EPSILON);
        assert!((ratio.savings_percent() - 75.0).abs() < 1e-9);
        assert!(ratio.is_effective());
        assert_eq!(CompressionRatio::new(10, 0).ratio(), 0.0);
    }
}
