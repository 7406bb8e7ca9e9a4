//! Container footer: the total uncompressed length.

use sallos_core::{Error, Result};

use super::CONTAINER_FOOTER_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerFooter {
    pub total_uncompressed: u64,
}

impl ContainerFooter {
    pub fn new(total_uncompressed: u64) -> Self {
        Self { total_uncompressed }
    }

    pub fn to_bytes(self) -> [u8; CONTAINER_FOOTER_SIZE] {
        self.total_uncompressed.to_le_bytes()
    }

    pub fn from_bytes(bytes: [u8; CONTAINER_FOOTER_SIZE]) -> Self {
        Self::new(u64::from_le_bytes(bytes))
    }

    /// Read the footer from the end of a complete stream.
    pub fn from_stream_end(stream: &[u8]) -> Option<Self> {
        let start = stream.len().checked_sub(CONTAINER_FOOTER_SIZE)?;
        let mut bytes = [0u8; CONTAINER_FOOTER_SIZE];
        bytes.copy_from_slice(&stream[start..]);
        Some(Self::from_bytes(bytes))
    }

    /// Check the recorded length against the bytes actually decoded.
    pub fn verify(self, decoded: u64) -> Result<()> {
        if self.total_uncompressed != decoded {
            return Err(Error::corrupted(format!(
                "container footer records {} bytes, decoded {}",
                self.total_uncompressed, decoded
            )));
        }
        Ok(())
    }
}
