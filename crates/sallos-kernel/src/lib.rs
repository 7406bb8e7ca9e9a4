//! # Sallos Kernel
//!
//! Hash-dictionary compression kernels for the Sallos codec.
//!
//! Data is processed as 32-bit chunks in groups. Each group is written as a
//! 64-bit signature of per-chunk flags followed by the chunk payloads. The
//! decoder replays every dictionary update the encoder made, so both sides
//! hold identical tables after every chunk.
//!
//! ## Algorithms
//!
//! - [`Chameleon`] - single-level dictionary, 1 flag bit per chunk
//! - [`Mandala`] - dictionary plus sequential predictor, 2 flag bits per chunk
//!
//! ## Example
//!
//! ```ignore
//! use sallos_kernel::{EncodeKernel, KernelEncoder, KernelStatus};
//! use sallos_core::{CompressionMode, InputCursor, OutputCursor, Parameters};
//!
//! let mut kernel = EncodeKernel::for_mode(CompressionMode::Mandala, Parameters::default())?
//!     .expect("mandala runs a kernel");
//! let status = kernel.process(&mut input, &mut output, true)?;
//! ```

pub mod algorithm;
pub mod chameleon;
pub mod decode;
pub mod dictionary;
pub mod encode;
pub mod hash;
pub mod kernel;
pub mod mandala;
pub mod signature;

pub use algorithm::Algorithm;
pub use chameleon::{Chameleon, ChameleonState};
pub use decode::GroupDecoder;
pub use dictionary::{DictionaryEntry, HashDictionary, PredictionTable, ResetCycle};
pub use encode::GroupEncoder;
pub use kernel::{DecodeKernel, EncodeKernel, KernelDecoder, KernelEncoder, KernelStatus};
pub use mandala::{Mandala, MandalaState};
pub use signature::SIGNATURE_SIZE;

use sallos_core::CompressionMode;

/// Groups in a full kernel block for `mode`, or `None` for copy streams.
pub fn block_signatures(mode: CompressionMode) -> Option<u32> {
    match mode {
        CompressionMode::Copy => None,
        CompressionMode::Chameleon => Some(Chameleon::BLOCK_SIGNATURES),
        CompressionMode::Mandala => Some(Mandala::BLOCK_SIGNATURES),
    }
}

/// Input bytes per group for `mode`, or `None` for copy streams.
pub fn group_input_size(mode: CompressionMode) -> Option<usize> {
    match mode {
        CompressionMode::Copy => None,
        CompressionMode::Chameleon => Some(Chameleon::GROUP_INPUT_SIZE),
        CompressionMode::Mandala => Some(Mandala::GROUP_INPUT_SIZE),
    }
}

/// Groups before the efficiency checkpoint for `mode`, or `None` for copy streams.
pub fn efficiency_check_signatures(mode: CompressionMode) -> Option<u32> {
    match mode {
        CompressionMode::Copy => None,
        CompressionMode::Chameleon => Some(Chameleon::EFFICIENCY_CHECK_SIGNATURES),
        CompressionMode::Mandala => Some(Mandala::EFFICIENCY_CHECK_SIGNATURES),
    }
}
