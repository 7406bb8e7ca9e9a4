//! Per-chunk algorithm contract.
//!
//! The group engine in [`encode`](crate::encode) and [`decode`](crate::decode)
//! handles signatures, batching, partial values and quotas. An algorithm only
//! decides how one chunk is represented and how its dictionary evolves.

use core::fmt::Debug;

use crate::hash::CHUNK_SIZE;
use crate::signature::SIGNATURE_SIZE;

/// A dictionary algorithm plugged into the group engine.
pub trait Algorithm: 'static {
    /// Name used in logs.
    const NAME: &'static str;

    /// Flag width in bits.
    const FLAG_BITS: u32;

    /// Flag for a verbatim chunk. Also marks the ragged tail of the final group.
    const LITERAL_FLAG: u8;

    /// Groups in a full kernel block.
    const BLOCK_SIGNATURES: u32;

    /// Groups after which the framing engine checks for net expansion.
    const EFFICIENCY_CHECK_SIGNATURES: u32;

    /// Chunks described by one signature.
    const CHUNKS_PER_GROUP: usize = 64 / Self::FLAG_BITS as usize;

    /// Input bytes consumed by one full group.
    const GROUP_INPUT_SIZE: usize = Self::CHUNKS_PER_GROUP * CHUNK_SIZE;

    /// Worst-case encoded size of one group.
    const MAX_GROUP_OUTPUT: usize = SIGNATURE_SIZE + Self::GROUP_INPUT_SIZE;

    /// Dictionary and any per-chunk context.
    type State: Default + Clone + PartialEq + Debug;

    /// Clear the dictionary back to its initial contents.
    fn reset(state: &mut Self::State);

    /// Encode one chunk into `dst`, returning its flag and payload length.
    fn encode_chunk(state: &mut Self::State, chunk: u32, dst: &mut [u8]) -> (u8, usize);

    /// Payload bytes that follow a flag.
    fn payload_size(flag: u8) -> usize;

    /// Reconstruct one chunk from its flag and payload, replaying the
    /// encoder's dictionary updates.
    fn decode_chunk(state: &mut Self::State, flag: u8, payload: &[u8]) -> u32;
}
