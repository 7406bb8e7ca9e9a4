//! Mandala: two-level hash dictionary with a sequential predictor.
//!
//! Each chunk is tried, in order, against the prediction for the previous
//! chunk's hash, the primary slot of its own bucket, and the secondary slot.
//! Misses are written verbatim. Two flag bits per chunk.

use crate::algorithm::Algorithm;
use crate::dictionary::{HashDictionary, PredictionTable};
use crate::hash::hash_chunk;

/// Primary slot hit; payload is the 16-bit hash. Zero so unused slots stay clear.
pub const FLAG_MAP_A: u8 = 0;
/// Chunk equals the prediction; no payload.
pub const FLAG_PREDICTED: u8 = 1;
/// Secondary slot hit; payload is the 16-bit hash. The slots swap.
pub const FLAG_MAP_B: u8 = 2;
/// Chunk written verbatim; payload is the 32-bit chunk.
pub const FLAG_LITERAL: u8 = 3;

const PAYLOAD_SIZES: [usize; 4] = [2, 0, 2, 4];

/// Mandala algorithm marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mandala;

/// Mandala dictionary state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MandalaState {
    pub dictionary: HashDictionary,
    pub predictions: PredictionTable,
    /// Hash of the previously processed chunk.
    pub last_hash: u16,
}

impl MandalaState {
    #[inline(always)]
    fn advance(&mut self, chunk: u32, hash: u16) {
        self.predictions.record(self.last_hash, chunk);
        self.last_hash = hash;
    }
}

impl Algorithm for Mandala {
    const NAME: &'static str = "mandala";
    const FLAG_BITS: u32 = 2;
    const LITERAL_FLAG: u8 = FLAG_LITERAL;
    const BLOCK_SIGNATURES: u32 = 2048;
    const EFFICIENCY_CHECK_SIGNATURES: u32 = 128;

    type State = MandalaState;

    fn reset(state: &mut MandalaState) {
        state.dictionary.reset();
        state.predictions.reset();
        state.last_hash = 0;
    }

    #[inline(always)]
    fn encode_chunk(state: &mut MandalaState, chunk: u32, dst: &mut [u8]) -> (u8, usize) {
        let hash = hash_chunk(chunk);
        let result = if state.predictions.predict(state.last_hash) == chunk {
            (FLAG_PREDICTED, 0)
        } else {
            let entry = state.dictionary.entry_mut(hash);
            if entry.chunk_a == chunk {
                dst[..2].copy_from_slice(&hash.to_le_bytes());
                (FLAG_MAP_A, 2)
            } else if entry.chunk_b == chunk {
                entry.swap();
                dst[..2].copy_from_slice(&hash.to_le_bytes());
                (FLAG_MAP_B, 2)
            } else {
                entry.promote(chunk);
                dst[..4].copy_from_slice(&chunk.to_le_bytes());
                (FLAG_LITERAL, 4)
            }
        };
        state.advance(chunk, hash);
        result
    }

    #[inline(always)]
    fn payload_size(flag: u8) -> usize {
        PAYLOAD_SIZES[(flag & 0b11) as usize]
    }

    #[inline(always)]
    fn decode_chunk(state: &mut MandalaState, flag: u8, payload: &[u8]) -> u32 {
        let (chunk, hash) = match flag {
            FLAG_PREDICTED => {
                let chunk = state.predictions.predict(state.last_hash);
                (chunk, hash_chunk(chunk))
            }
            FLAG_MAP_A => {
                let hash = u16::from_le_bytes([payload[0], payload[1]]);
                (state.dictionary.entry(hash).chunk_a, hash)
            }
            FLAG_MAP_B => {
                let hash = u16::from_le_bytes([payload[0], payload[1]]);
                let entry = state.dictionary.entry_mut(hash);
                entry.swap();
                (entry.chunk_a, hash)
            }
            _ => {
                let chunk = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
                let hash = hash_chunk(chunk);
                state.dictionary.entry_mut(hash).promote(chunk);
                (chunk, hash)
            }
        };
        state.advance(chunk, hash);
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(state: &mut MandalaState, chunk: u32) -> (u8, Vec<u8>) {
        let mut buf = [0u8; 4];
        let (flag, len) = Mandala::encode_chunk(state, chunk, &mut buf);
        (flag, buf[..len].to_vec())
    }

    #[test]
    fn test_zero_chunk_is_predicted_from_cold_start() {
        let mut state = MandalaState::default();
        let (flag, payload) = encode(&mut state, 0);
        assert_eq!(flag, FLAG_PREDICTED);
        assert!(payload.is_empty());
    }

    #[test]
    fn test_decision_order() {
        let mut state = MandalaState::default();
        let a = 0x1111_1111;
        let b = 0x2222_2222;

        let c = 0x3333_3333;

        assert_eq!(encode(&mut state, a).0, FLAG_LITERAL);
        assert_eq!(encode(&mut state, c).0, FLAG_LITERAL);
        // Nothing has followed c yet, so a comes from its bucket.
        let (flag, payload) = encode(&mut state, a);
        assert_eq!(flag, FLAG_MAP_A);
        assert_eq!(payload, hash_chunk(a).to_le_bytes());
        // c followed a and a followed c: both predicted now.
        assert_eq!(encode(&mut state, c).0, FLAG_PREDICTED);
        assert_eq!(encode(&mut state, a).0, FLAG_PREDICTED);

        // Force a and b into the same bucket by hand to exercise the secondary slot.
        let hash = hash_chunk(b);
        state.dictionary.entry_mut(hash).chunk_a = 0x4444_4444;
        state.dictionary.entry_mut(hash).chunk_b = b;
        let (flag, payload) = encode(&mut state, b);
        assert_eq!(flag, FLAG_MAP_B);
        assert_eq!(payload, hash.to_le_bytes());
        assert_eq!(state.dictionary.entry(hash).chunk_a, b);
    }

    #[test]
    fn test_decode_replays_dictionary() {
        let mut encoder = MandalaState::default();
        let mut decoder = MandalaState::default();
        let chunks = [5u32, 6, 5, 6, 5, 6, 7, 0, 0, 7, 8, 5, 6];

        for chunk in chunks {
            let (flag, payload) = encode(&mut encoder, chunk);
            assert_eq!(payload.len(), Mandala::payload_size(flag));
            assert_eq!(Mandala::decode_chunk(&mut decoder, flag, &payload), chunk);
            assert_eq!(encoder, decoder);
        }
    }

    #[test]
    fn test_reset_clears_context() {
        let mut state = MandalaState::default();
        encode(&mut state, 99);
        Mandala::reset(&mut state);
        assert_eq!(state, MandalaState::default());
    }
}
