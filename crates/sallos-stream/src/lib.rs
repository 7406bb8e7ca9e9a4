//! # Sallos Stream
//!
//! `std::io` integration for the Sallos codec.
//!
//! The incremental [`Encoder`](sallos::Encoder) and
//! [`Decoder`](sallos::Decoder) never touch I/O themselves. The adapters here
//! pump bytes between them and a [`Write`](std::io::Write) or
//! [`Read`](std::io::Read) endpoint through reusable [`StreamBuffer`]s.
//!
//! ## Example
//!
//! ```
//! use std::io::{Read, Write};
//! use sallos::{DecoderConfig, EncoderConfig};
//! use sallos_stream::{CompressWriter, DecompressReader};
//!
//! let mut writer = CompressWriter::new(Vec::new(), EncoderConfig::default())?;
//! writer.write_all(b"Hello, compression! Hello, compression!")?;
//! let compressed = writer.finish()?;
//!
//! let mut reader = DecompressReader::new(&compressed[..], DecoderConfig::default())?;
//! let mut restored = Vec::new();
//! reader.read_to_end(&mut restored)?;
//! assert_eq!(restored, b"Hello, compression! Hello, compression!");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod buffer;
mod reader;
mod writer;

pub use buffer::StreamBuffer;
pub use reader::DecompressReader;
pub use writer::CompressWriter;

/// Default buffer size for streaming operations (64 KB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Minimum buffer size allowed.
pub const MIN_BUFFER_SIZE: usize = 4 * 1024;

/// Maximum buffer size allowed (1 MB).
pub const MAX_BUFFER_SIZE: usize = 1024 * 1024;

/// Clamp buffer size to valid range.
#[inline]
pub fn clamp_buffer_size(size: usize) -> usize {
    size.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE)
}
