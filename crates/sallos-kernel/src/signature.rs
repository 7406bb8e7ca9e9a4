//! Bit-packed per-group flag vectors.
//!
//! Flag `i` of a group occupies bits `i * flag_bits .. (i + 1) * flag_bits`
//! of a little-endian `u64` written ahead of the group's payload.

/// Bytes occupied by a signature on the wire.
pub const SIGNATURE_SIZE: usize = 8;

/// Builds a signature one flag at a time during encode.
#[derive(Debug, Clone, Copy)]
pub struct SignatureBuilder {
    value: u64,
    shift: u32,
    flag_bits: u32,
}

impl SignatureBuilder {
    pub fn new(flag_bits: u32) -> Self {
        Self {
            value: 0,
            shift: 0,
            flag_bits,
        }
    }

    #[inline(always)]
    pub fn push(&mut self, flag: u8) {
        debug_assert!(self.shift < 64, "signature overflow");
        self.value |= u64::from(flag) << self.shift;
        self.shift += self.flag_bits;
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

/// Consumes a signature one flag at a time during decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureReader {
    value: u64,
    flag_bits: u32,
    remaining: usize,
}

impl SignatureReader {
    pub fn new(value: u64, flag_bits: u32, flags: usize) -> Self {
        Self {
            value,
            flag_bits,
            remaining: flags,
        }
    }

    /// Flag for the next chunk.
    #[inline(always)]
    pub fn peek(&self) -> u8 {
        (self.value & ((1u64 << self.flag_bits) - 1)) as u8
    }

    #[inline(always)]
    pub fn advance(&mut self) {
        self.value >>= self.flag_bits;
        self.remaining -= 1;
    }

    #[inline(always)]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_bit_packing() {
        let mut builder = SignatureBuilder::new(2);
        for flag in [1, 3, 0, 2] {
            builder.push(flag);
        }
        assert_eq!(builder.value(), 0b10_00_11_01);

        let mut reader = SignatureReader::new(builder.value(), 2, 4);
        let mut flags = Vec::new();
        while !reader.is_exhausted() {
            flags.push(reader.peek());
            reader.advance();
        }
        assert_eq!(flags, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_full_one_bit_signature() {
        let mut builder = SignatureBuilder::new(1);
        for i in 0..64 {
            builder.push((i % 2) as u8);
        }
        assert_eq!(builder.value(), 0xAAAA_AAAA_AAAA_AAAA);

        let mut reader = SignatureReader::new(builder.value(), 1, 64);
        for i in 0..64 {
            assert_eq!(reader.peek(), (i % 2) as u8);
            reader.advance();
        }
        assert!(reader.is_exhausted());
    }
}
