//! Block integrity footer: XXH3-128 over the block's uncompressed bytes.

use xxhash_rust::xxh3::Xxh3;

use super::BLOCK_FOOTER_SIZE;

/// Incremental hasher over one block's uncompressed payload.
pub struct BlockHasher {
    inner: Xxh3,
}

impl BlockHasher {
    pub fn new() -> Self {
        Self { inner: Xxh3::new() }
    }

    #[inline]
    pub fn update(&mut self, bytes: &[u8]) {
        if !bytes.is_empty() {
            self.inner.update(bytes);
        }
    }

    /// Footer for everything hashed since the last reset.
    pub fn footer(&self) -> BlockFooter {
        BlockFooter::from_digest(self.inner.digest128())
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl Default for BlockHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for BlockHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockHasher").finish_non_exhaustive()
    }
}

/// Two 64-bit integrity values: low then high half of the 128-bit digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFooter {
    pub low: u64,
    pub high: u64,
}

impl BlockFooter {
    pub fn from_digest(digest: u128) -> Self {
        Self {
            low: digest as u64,
            high: (digest >> 64) as u64,
        }
    }

    pub fn digest(self) -> u128 {
        (u128::from(self.high) << 64) | u128::from(self.low)
    }

    pub fn to_bytes(self) -> [u8; BLOCK_FOOTER_SIZE] {
        let mut bytes = [0u8; BLOCK_FOOTER_SIZE];
        bytes[..8].copy_from_slice(&self.low.to_le_bytes());
        bytes[8..].copy_from_slice(&self.high.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: [u8; BLOCK_FOOTER_SIZE]) -> Self {
        let mut low = [0u8; 8];
        let mut high = [0u8; 8];
        low.copy_from_slice(&bytes[..8]);
        high.copy_from_slice(&bytes[8..]);
        Self {
            low: u64::from_le_bytes(low),
            high: u64::from_le_bytes(high),
        }
    }
}
