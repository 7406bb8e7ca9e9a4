//! # Sallos
//!
//! Streaming single-pass lossless codec.
//!
//! Input is split into blocks. Each block is either copied verbatim or run
//! through a hash-dictionary kernel from `sallos-kernel`, and optionally
//! closed with an XXH3-128 integrity footer. A container header and footer
//! wrap the block stream.
//!
//! ## Features
//!
//! - **Resumable**: [`Encoder`] and [`Decoder`] stop at any byte boundary and
//!   report which resource they need next
//! - **Chunking-independent**: the same input always yields the same bytes
//! - **Expansion guard**: a stream that grows at a block's efficiency
//!   checkpoint falls back to copy blocks for the rest of its length
//! - **One-shot helpers**: [`buffers`] and [`SallosCodec`]
//!
//! ## Example
//!
//! ```
//! use sallos::{buffers, DecoderConfig, EncoderConfig};
//!
//! let data = b"abcdabcdabcdabcdabcdabcdabcdabcd".repeat(64);
//! let compressed = buffers::compress(&data, &EncoderConfig::default())?;
//! let restored = buffers::decompress(&compressed, &DecoderConfig::default())?;
//! assert_eq!(restored, data);
//! # Ok::<(), sallos::Error>(())
//! ```

pub mod block;
pub mod buffers;
pub mod codec;
pub mod config;
pub mod container;
pub mod decode;
pub mod encode;

// Re-export main types
pub use codec::SallosCodec;
pub use config::{DecoderConfig, EncoderConfig, FrameDescription};
pub use container::{ContainerFooter, ContainerHeader, FORMAT_VERSION};
pub use decode::Decoder;
pub use encode::Encoder;

pub use sallos_core::{
    BlockType, CompressionMode, CompressionStats, Error, InputCursor, OutputCursor, OutputShape,
    Result, Status,
};

/// Library version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
        assert_eq!(FORMAT_VERSION.major, 0);
    }
}
