//! # Sallos Core
//!
//! Core types, errors, cursors and traits for the Sallos streaming codec.
//!
//! Sallos is named after the 19th demon of the Ars Goetia, a duke who
//! reconciles what was estranged - just as a decoder reunites a stream with
//! the bytes it came from.
//!
//! ## Contents
//!
//! - [`InputCursor`] / [`OutputCursor`] - bounded slices advanced in place
//! - [`Spill`] - staging for output that did not fit the caller's buffer
//! - [`Status`] / [`StreamState`] - call outcome and lifecycle
//! - [`CompressionMode`], [`BlockType`], [`OutputShape`], [`Parameters`] - format selectors
//! - [`Compressor`] / [`Decompressor`] / [`Codec`] - one-shot traits

pub mod cursor;
pub mod error;
pub mod stats;
pub mod stream;
pub mod traits;
pub mod types;

pub use cursor::{InputCursor, OutputCursor, Spill};
pub use error::{Error, Result};
pub use stats::CompressionStats;
pub use stream::{Status, StreamState};
pub use traits::{Codec, Compressor, Decompressor};
pub use types::{
    BlockMode, BlockType, CompressionMode, CompressionRatio, FormatVersion, OutputShape,
    Parameters,
};
