//! Group engine, encoding side.
//!
//! Input is processed in groups of `A::CHUNKS_PER_GROUP` chunks. A group is
//! encoded straight from the caller's input when it is available in one
//! piece, otherwise accumulated in scratch. On flush, a remainder shorter than
//! a group becomes the final group: its whole chunks, then the ragged tail
//! under the literal flag.
//!
//! Block quotas are checked at group boundaries, before any input of the next
//! group is consumed and only when more input exists. Output of a call
//! therefore always belongs to a single block, and the checkpoints fall at the
//! same stream positions no matter how the caller splits its buffers.

use tracing::debug;

use sallos_core::{Error, InputCursor, OutputCursor, Parameters, Result, Spill};

use crate::algorithm::Algorithm;
use crate::dictionary::ResetCycle;
use crate::hash::{read_chunk, CHUNK_SIZE};
use crate::kernel::{KernelEncoder, KernelStatus};
use crate::signature::{SignatureBuilder, SIGNATURE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Between groups: quotas are checked here.
    Boundary,
    /// Collecting the bytes of the next group.
    Gather,
    /// Final group written.
    Done,
}

/// Encode one group of at most `A::GROUP_INPUT_SIZE` bytes into `dst`.
///
/// `dst` must hold at least `A::MAX_GROUP_OUTPUT` bytes. Returns bytes written.
pub fn encode_group<A: Algorithm>(state: &mut A::State, group: &[u8], dst: &mut [u8]) -> usize {
    debug_assert!(group.len() <= A::GROUP_INPUT_SIZE);

    let mut signature = SignatureBuilder::new(A::FLAG_BITS);
    let mut written = SIGNATURE_SIZE;

    let mut chunks = group.chunks_exact(CHUNK_SIZE);
    for bytes in &mut chunks {
        let (flag, len) = A::encode_chunk(state, read_chunk(bytes), &mut dst[written..]);
        signature.push(flag);
        written += len;
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        signature.push(A::LITERAL_FLAG);
        dst[written..written + tail.len()].copy_from_slice(tail);
        written += tail.len();
    }

    dst[..SIGNATURE_SIZE].copy_from_slice(&signature.value().to_le_bytes());
    written
}

/// Resumable group encoder for algorithm `A`.
#[derive(Debug)]
pub struct GroupEncoder<A: Algorithm> {
    state: A::State,
    phase: Phase,
    scratch: Box<[u8]>,
    scratch_len: usize,
    spill: Spill,
    /// Groups started in the current block.
    signatures: u32,
    efficiency_checked: bool,
    reset_cycle: ResetCycle,
}

impl<A: Algorithm> GroupEncoder<A> {
    pub fn new(parameters: Parameters) -> Self {
        Self {
            state: A::State::default(),
            phase: Phase::Boundary,
            scratch: vec![0u8; A::GROUP_INPUT_SIZE].into_boxed_slice(),
            scratch_len: 0,
            spill: Spill::with_capacity(A::MAX_GROUP_OUTPUT),
            signatures: 0,
            efficiency_checked: false,
            reset_cycle: ResetCycle::new(parameters.reset_cycle_shift()),
        }
    }

    /// Dictionary state after everything encoded so far.
    pub fn state(&self) -> &A::State {
        &self.state
    }

    /// Groups started in the current block.
    pub fn signatures(&self) -> u32 {
        self.signatures
    }

    fn emit_group(
        state: &mut A::State,
        spill: &mut Spill,
        group: &[u8],
        output: &mut OutputCursor<'_>,
    ) {
        if output.remaining() >= A::MAX_GROUP_OUTPUT {
            let written = encode_group::<A>(state, group, output.unfilled_mut());
            output.advance(written);
        } else {
            let written = encode_group::<A>(state, group, spill.stage_mut());
            spill.commit(written);
            spill.drain(output);
        }
    }

    fn open_block(&mut self) {
        self.signatures = 0;
        self.efficiency_checked = false;
        if self.reset_cycle.tick() {
            debug!(kernel = A::NAME, "resetting encoder dictionary");
            A::reset(&mut self.state);
        }
    }
}

impl<A: Algorithm> KernelEncoder for GroupEncoder<A> {
    fn init(&mut self, parameters: Parameters) -> Result<()> {
        parameters.validate()?;
        *self = Self::new(parameters);
        Ok(())
    }

    fn process(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Result<KernelStatus> {
        loop {
            if !self.spill.drain(output) {
                return Ok(KernelStatus::StallOnOutput);
            }

            match self.phase {
                Phase::Boundary => {
                    if input.is_empty() {
                        if !flush {
                            return Ok(KernelStatus::StallOnInput);
                        }
                        self.phase = Phase::Done;
                        continue;
                    }
                    if self.signatures == A::EFFICIENCY_CHECK_SIGNATURES
                        && !self.efficiency_checked
                    {
                        self.efficiency_checked = true;
                        return Ok(KernelStatus::EfficiencyCheck);
                    }
                    if self.signatures == A::BLOCK_SIGNATURES {
                        self.open_block();
                        return Ok(KernelStatus::NewBlock);
                    }
                    self.signatures += 1;
                    self.phase = Phase::Gather;
                }
                Phase::Gather => {
                    if self.scratch_len == 0 && input.remaining() >= A::GROUP_INPUT_SIZE {
                        let group = input.take(A::GROUP_INPUT_SIZE);
                        Self::emit_group(&mut self.state, &mut self.spill, group, output);
                        self.phase = Phase::Boundary;
                        continue;
                    }

                    let wanted = A::GROUP_INPUT_SIZE - self.scratch_len;
                    let taken = wanted.min(input.remaining());
                    self.scratch[self.scratch_len..self.scratch_len + taken]
                        .copy_from_slice(input.take(taken));
                    self.scratch_len += taken;

                    if self.scratch_len == A::GROUP_INPUT_SIZE {
                        self.phase = Phase::Boundary;
                    } else if flush {
                        self.phase = Phase::Done;
                    } else {
                        return Ok(KernelStatus::StallOnInput);
                    }

                    let group = &self.scratch[..self.scratch_len];
                    Self::emit_group(&mut self.state, &mut self.spill, group, output);
                    self.scratch_len = 0;
                }
                Phase::Done => return Ok(KernelStatus::Finished),
            }
        }
    }

    fn finish(&mut self) -> Result<()> {
        if self.phase != Phase::Done || !self.spill.is_empty() {
            return Err(Error::invalid_state("finished", "active"));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        A::NAME
    }
}
