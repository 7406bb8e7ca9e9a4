//! Container header.
//!
//! ```text
//! Byte 0-2:  format version (major, minor, revision)
//! Byte 3:    compression mode selector
//! Byte 4:    block type selector
//! Byte 5-7:  reserved (written as zero, ignored on read)
//! Byte 8-15: algorithm parameters
//! ```

use sallos_core::{BlockType, CompressionMode, Error, FormatVersion, Parameters, Result};

use super::{CONTAINER_HEADER_SIZE, FORMAT_VERSION};

/// Parsed container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Version the stream was written with.
    pub version: FormatVersion,
    pub mode: CompressionMode,
    pub block_type: BlockType,
    pub parameters: Parameters,
}

impl ContainerHeader {
    /// Header for a new stream at the current format version.
    pub fn new(mode: CompressionMode, block_type: BlockType, parameters: Parameters) -> Self {
        Self {
            version: FORMAT_VERSION,
            mode,
            block_type,
            parameters,
        }
    }

    pub fn to_bytes(&self) -> [u8; CONTAINER_HEADER_SIZE] {
        let mut bytes = [0u8; CONTAINER_HEADER_SIZE];
        bytes[0] = self.version.major;
        bytes[1] = self.version.minor;
        bytes[2] = self.version.revision;
        bytes[3] = self.mode.selector();
        bytes[4] = self.block_type.selector();
        bytes[8..].copy_from_slice(&self.parameters.to_bytes());
        bytes
    }

    /// Parse and validate a header.
    pub fn parse(bytes: &[u8; CONTAINER_HEADER_SIZE]) -> Result<Self> {
        let version = FormatVersion::new(bytes[0], bytes[1], bytes[2]);
        if !FORMAT_VERSION.can_read(version) {
            return Err(Error::Unsupported(format!(
                "format version {version} (reader is {FORMAT_VERSION})"
            )));
        }

        let mode = CompressionMode::from_selector(bytes[3])?;
        let block_type = BlockType::from_selector(bytes[4])?;

        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[8..]);
        let parameters = Parameters::from_bytes(raw);
        parameters.validate()?;

        Ok(Self {
            version,
            mode,
            block_type,
            parameters,
        })
    }
}
