//! Chameleon: single-level hash dictionary, one flag bit per chunk.
//!
//! A chunk is either found as the primary chunk of its hash bucket (a 2-byte
//! hash reference) or written verbatim and recorded in the bucket.

use crate::algorithm::Algorithm;
use crate::dictionary::HashDictionary;
use crate::hash::hash_chunk;

/// Chunk found in the dictionary; payload is the 16-bit hash.
pub const FLAG_MAP: u8 = 0;
/// Chunk written verbatim; payload is the 32-bit chunk.
pub const FLAG_LITERAL: u8 = 1;

/// Chameleon algorithm marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chameleon;

/// Chameleon dictionary state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChameleonState {
    pub dictionary: HashDictionary,
}

impl Algorithm for Chameleon {
    const NAME: &'static str = "chameleon";
    const FLAG_BITS: u32 = 1;
    const LITERAL_FLAG: u8 = FLAG_LITERAL;
    const BLOCK_SIGNATURES: u32 = 1024;
    const EFFICIENCY_CHECK_SIGNATURES: u32 = 64;

    type State = ChameleonState;

    fn reset(state: &mut ChameleonState) {
        state.dictionary.reset();
    }

    #[inline(always)]
    fn encode_chunk(state: &mut ChameleonState, chunk: u32, dst: &mut [u8]) -> (u8, usize) {
        let hash = hash_chunk(chunk);
        let entry = state.dictionary.entry_mut(hash);
        if entry.chunk_a == chunk {
            dst[..2].copy_from_slice(&hash.to_le_bytes());
            (FLAG_MAP, 2)
        } else {
            entry.promote(chunk);
            dst[..4].copy_from_slice(&chunk.to_le_bytes());
            (FLAG_LITERAL, 4)
        }
    }

    #[inline(always)]
    fn payload_size(flag: u8) -> usize {
        if flag == FLAG_LITERAL {
            4
        } else {
            2
        }
    }

    #[inline(always)]
    fn decode_chunk(state: &mut ChameleonState, flag: u8, payload: &[u8]) -> u32 {
        if flag == FLAG_LITERAL {
            let chunk = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
            state.dictionary.entry_mut(hash_chunk(chunk)).promote(chunk);
            chunk
        } else {
            let hash = u16::from_le_bytes([payload[0], payload[1]]);
            state.dictionary.entry(hash).chunk_a
        }
    }
}
