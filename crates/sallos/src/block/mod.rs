//! Block framing.
//!
//! ```text
//! +--------+------+------------------------------+---------+
//! | header | mode | payload                      | footer  |
//! | 1 byte | 1    | raw bytes or kernel groups   | 16 or 0 |
//! +--------+------+------------------------------+---------+
//! ```
//!
//! The header is the low byte of the block's sequence number. Kernel blocks
//! carry a second mode marker at the efficiency checkpoint when more data
//! follows it. A COPY marker there closes the block and downgrades the rest
//! of the stream to copy blocks.

mod checksum;
mod decode;
mod encode;

pub use checksum::{BlockFooter, BlockHasher};
pub use decode::BlockDecoder;
pub use encode::BlockEncoder;

use sallos_core::{BlockType, Error, Result};

/// Size of the per-block header.
pub const BLOCK_HEADER_SIZE: usize = 1;

/// Size of a mode marker.
pub const MODE_MARKER_SIZE: usize = 1;

/// Size of a block footer when integrity checking is enabled.
pub const BLOCK_FOOTER_SIZE: usize = 16;

/// Raw bytes carried by every copy block except the last one of a stream.
pub const PREFERRED_COPY_BLOCK_SIZE: usize = 64 * 1024;

/// Footer size for a block type.
pub fn footer_size(block_type: BlockType) -> usize {
    if block_type.has_integrity_check() {
        BLOCK_FOOTER_SIZE
    } else {
        0
    }
}

/// Header byte for the block with sequence number `index`.
#[inline]
pub(crate) fn header_byte(index: u64) -> u8 {
    (index & 0xff) as u8
}

/// Bytes of `remaining` that may be read as block data when `overhead`
/// trailer bytes end the stream.
pub(crate) fn data_region(remaining: usize, overhead: usize, flush: bool) -> Result<usize> {
    if flush {
        remaining
            .checked_sub(overhead)
            .ok_or_else(|| Error::corrupted("stream ends inside its trailer"))
    } else {
        Ok(remaining.saturating_sub(overhead))
    }
}
