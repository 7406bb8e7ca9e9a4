//! Chunk hashing.

/// Bytes per chunk, the unit the dictionary kernels work on.
pub const CHUNK_SIZE: usize = 4;

/// Hash width in bits; also the width of a dictionary reference on the wire.
pub const HASH_BITS: u32 = 16;

/// Number of slots in every dictionary table.
pub const DICTIONARY_SLOTS: usize = 1 << HASH_BITS;

/// Knuth's multiplicative constant (golden ratio * 2^32).
const HASH_MULTIPLIER: u32 = 0x9E37_79B1;

/// Hash a chunk to a dictionary slot index.
#[inline(always)]
pub fn hash_chunk(chunk: u32) -> u16 {
    (chunk.wrapping_mul(HASH_MULTIPLIER) >> (32 - HASH_BITS)) as u16
}

/// Read a little-endian chunk from the first four bytes of `bytes`.
#[inline(always)]
pub fn read_chunk(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
