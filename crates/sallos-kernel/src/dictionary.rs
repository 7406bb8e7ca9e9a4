//! Dictionary store shared by both kernels.
//!
//! Tables are mutated only by the kernel that owns them. Encoder and decoder
//! apply the same mutations in the same order, so their tables stay equal
//! after every chunk.

use tracing::debug;

use crate::hash::DICTIONARY_SLOTS;

/// One hash bucket: the two most recently seen chunks for that hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DictionaryEntry {
    /// Most recently seen.
    pub chunk_a: u32,
    /// Second most recently seen.
    pub chunk_b: u32,
}

impl DictionaryEntry {
    /// Record a new chunk, demoting the current primary.
    #[inline(always)]
    pub fn promote(&mut self, chunk: u32) {
        self.chunk_b = self.chunk_a;
        self.chunk_a = chunk;
    }

    /// Move the secondary to the front.
    #[inline(always)]
    pub fn swap(&mut self) {
        core::mem::swap(&mut self.chunk_a, &mut self.chunk_b);
    }
}

/// Hash-indexed table of [`DictionaryEntry`] slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashDictionary {
    entries: Box<[DictionaryEntry]>,
}

impl HashDictionary {
    pub fn new() -> Self {
        Self {
            entries: vec![DictionaryEntry::default(); DICTIONARY_SLOTS].into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub fn entry(&self, hash: u16) -> &DictionaryEntry {
        &self.entries[hash as usize]
    }

    #[inline(always)]
    pub fn entry_mut(&mut self, hash: u16) -> &mut DictionaryEntry {
        &mut self.entries[hash as usize]
    }

    pub fn reset(&mut self) {
        self.entries.fill(DictionaryEntry::default());
    }
}

impl Default for HashDictionary {
    fn default() -> Self {
        Self::new()
    }
}

/// First-order predictor: for the hash of a chunk, the chunk that followed it last time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionTable {
    next: Box<[u32]>,
}

impl PredictionTable {
    pub fn new() -> Self {
        Self {
            next: vec![0u32; DICTIONARY_SLOTS].into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub fn predict(&self, previous_hash: u16) -> u32 {
        self.next[previous_hash as usize]
    }

    #[inline(always)]
    pub fn record(&mut self, previous_hash: u16, chunk: u32) {
        self.next[previous_hash as usize] = chunk;
    }

    pub fn reset(&mut self) {
        self.next.fill(0);
    }
}

impl Default for PredictionTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts kernel blocks and signals when the dictionary must be cleared.
///
/// A shift of `0` never resets. A shift of `n` resets after every `2^n`
/// completed blocks, which makes each run of `2^n` blocks decodable on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResetCycle {
    shift: u8,
    completed: u64,
}

impl ResetCycle {
    pub fn new(shift: u8) -> Self {
        Self { shift, completed: 0 }
    }

    pub fn shift(&self) -> u8 {
        self.shift
    }

    /// Record a completed block. Returns `true` when the dictionary must reset.
    pub fn tick(&mut self) -> bool {
        if self.shift == 0 {
            return false;
        }
        self.completed += 1;
        if self.completed >> self.shift != 0 {
            debug!(shift = self.shift, "dictionary reset cycle elapsed");
            self.completed = 0;
            return true;
        }
        false
    }
}
