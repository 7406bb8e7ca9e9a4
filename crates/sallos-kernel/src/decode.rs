//! Group engine, decoding side.
//!
//! Mirrors [`GroupEncoder`](crate::encode::GroupEncoder): read a signature,
//! then one payload per flag. Values split across input buffers are collected
//! in a small partial buffer; chunks that do not fit the output are staged.
//!
//! The end of the kernel data is found from `flush` and the trailer size
//! given to [`init`](KernelDecoder::init). When the data runs out at a flag:
//! a literal flag with bytes left is the ragged tail, any other flag with no
//! bytes left is an unused slot, and anything else is truncation.

use tracing::debug;

use sallos_core::{Error, InputCursor, OutputCursor, Parameters, Result, Spill};

use crate::algorithm::Algorithm;
use crate::dictionary::ResetCycle;
use crate::hash::CHUNK_SIZE;
use crate::kernel::{KernelDecoder, KernelStatus};
use crate::signature::{SignatureReader, SIGNATURE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Between groups: quotas are checked here.
    Boundary,
    /// Reading the next signature.
    Signature,
    /// Decoding the payloads described by the current signature.
    Items,
    /// End of kernel data reached.
    Done,
}

/// Resumable group decoder for algorithm `A`.
#[derive(Debug)]
pub struct GroupDecoder<A: Algorithm> {
    state: A::State,
    phase: Phase,
    reader: SignatureReader,
    partial: [u8; SIGNATURE_SIZE],
    partial_len: usize,
    spill: Spill,
    signatures: u32,
    efficiency_checked: bool,
    reset_cycle: ResetCycle,
    end_data_overhead: usize,
}

impl<A: Algorithm> GroupDecoder<A> {
    pub fn new(parameters: Parameters, end_data_overhead: usize) -> Self {
        Self {
            state: A::State::default(),
            phase: Phase::Boundary,
            reader: SignatureReader::default(),
            partial: [0u8; SIGNATURE_SIZE],
            partial_len: 0,
            spill: Spill::with_capacity(CHUNK_SIZE),
            signatures: 0,
            efficiency_checked: false,
            reset_cycle: ResetCycle::new(parameters.reset_cycle_shift()),
            end_data_overhead,
        }
    }

    /// Dictionary state after everything decoded so far.
    pub fn state(&self) -> &A::State {
        &self.state
    }

    /// Bytes of `input` that may be read as kernel data.
    fn data_len(&self, input: &InputCursor<'_>, flush: bool) -> Result<usize> {
        let remaining = input.remaining();
        if flush {
            remaining
                .checked_sub(self.end_data_overhead)
                .ok_or_else(|| Error::corrupted("stream ends inside its trailer"))
        } else {
            Ok(remaining.saturating_sub(self.end_data_overhead))
        }
    }

    /// Keep `available` bytes for the next call.
    fn absorb(&mut self, input: &mut InputCursor<'_>, available: usize) {
        let bytes = input.take(available);
        self.partial[self.partial_len..self.partial_len + available].copy_from_slice(bytes);
        self.partial_len += available;
    }

    /// Assemble `need` bytes from the partial buffer and `input`.
    ///
    /// Caller guarantees `partial_len + available >= need`.
    fn assemble(&mut self, input: &mut InputCursor<'_>, need: usize) -> [u8; SIGNATURE_SIZE] {
        let mut bytes = [0u8; SIGNATURE_SIZE];
        let held = self.partial_len;
        bytes[..held].copy_from_slice(&self.partial[..held]);
        bytes[held..need].copy_from_slice(input.take(need - held));
        self.partial_len = 0;
        bytes
    }

    fn open_block(&mut self) {
        self.signatures = 0;
        self.efficiency_checked = false;
        if self.reset_cycle.tick() {
            debug!(kernel = A::NAME, "resetting decoder dictionary");
            A::reset(&mut self.state);
        }
    }

    /// Data ran out at `flag` with `available` bytes left and flush set.
    fn end_of_data(
        &mut self,
        flag: u8,
        input: &mut InputCursor<'_>,
        available: usize,
        output: &mut OutputCursor<'_>,
    ) -> Result<()> {
        let have = self.partial_len + available;
        if flag == A::LITERAL_FLAG && have > 0 {
            let tail = self.assemble(input, have);
            self.spill.emit(&tail[..have], output);
        } else if have > 0 || flag == A::LITERAL_FLAG {
            return Err(Error::corrupted(format!(
                "{} payload truncated at end of stream",
                A::NAME
            )));
        }
        self.phase = Phase::Done;
        Ok(())
    }
}

impl<A: Algorithm> KernelDecoder for GroupDecoder<A> {
    fn init(&mut self, parameters: Parameters, end_data_overhead: usize) -> Result<()> {
        parameters.validate()?;
        *self = Self::new(parameters, end_data_overhead);
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
                    if self.data_len(input, flush)? == 0 {
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
                    self.phase = Phase::Signature;
                }
                Phase::Signature => {
                    let available = self.data_len(input, flush)?;
                    if self.partial_len + available < SIGNATURE_SIZE {
                        if flush {
                            return Err(Error::corrupted(format!(
                                "{} signature truncated at end of stream",
                                A::NAME
                            )));
                        }
                        self.absorb(input, available);
                        return Ok(KernelStatus::StallOnInput);
                    }
                    let bytes = self.assemble(input, SIGNATURE_SIZE);
                    self.reader = SignatureReader::new(
                        u64::from_le_bytes(bytes),
                        A::FLAG_BITS,
                        A::CHUNKS_PER_GROUP,
                    );
                    self.phase = Phase::Items;
                }
                Phase::Items => {
                    if self.reader.is_exhausted() {
                        self.phase = Phase::Boundary;
                        continue;
                    }
                    let flag = self.reader.peek();
                    let need = A::payload_size(flag);
                    let available = self.data_len(input, flush)?;
                    if self.partial_len + available < need {
                        if !flush {
                            self.absorb(input, available);
                            return Ok(KernelStatus::StallOnInput);
                        }
                        self.end_of_data(flag, input, available, output)?;
                        continue;
                    }

                    let payload = self.assemble(input, need);
                    let chunk = A::decode_chunk(&mut self.state, flag, &payload[..need]);
                    self.reader.advance();
                    self.spill.emit(&chunk.to_le_bytes(), output);
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
