//! Block encoding state machine.

use tracing::{debug, info};

use sallos_core::{
    BlockMode, BlockType, CompressionMode, Error, InputCursor, OutputCursor, Parameters, Result,
    Spill, Status,
};
use sallos_kernel::{EncodeKernel, KernelEncoder, KernelStatus};

use super::{footer_size, header_byte, BlockHasher, BLOCK_FOOTER_SIZE, PREFERRED_COPY_BLOCK_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    WriteBlockHeader,
    /// `checkpoint` is set for the efficiency marker inside a kernel block.
    WriteModeMarker { checkpoint: bool },
    WriteData,
    WriteBlockFooter,
    WriteLastBlockFooter,
    Finished,
}

/// Sequences blocks: header, mode marker, payload, footer.
///
/// Payload bytes come from the kernel, or are copied verbatim once the stream
/// has downgraded (or when the stream was configured for copy mode).
#[derive(Debug)]
pub struct BlockEncoder {
    state: State,
    kernel: Option<EncodeKernel>,
    /// Mode of the block being written and of every block after it.
    target: BlockMode,
    block_type: BlockType,
    spill: Spill,
    hasher: BlockHasher,
    block_index: u64,
    copy_remaining: usize,
    total_read: u64,
    total_written: u64,
    kernel_blocks: u64,
    copy_blocks: u64,
    downgraded: bool,
}

impl BlockEncoder {
    pub fn new(mode: CompressionMode, block_type: BlockType, parameters: Parameters) -> Result<Self> {
        let kernel = EncodeKernel::for_mode(mode, parameters)?;
        let target = if kernel.is_some() {
            BlockMode::Kernel
        } else {
            BlockMode::Copy
        };
        Ok(Self {
            state: State::WriteBlockHeader,
            kernel,
            target,
            block_type,
            spill: Spill::with_capacity(BLOCK_FOOTER_SIZE),
            hasher: BlockHasher::new(),
            block_index: 0,
            copy_remaining: 0,
            total_read: 0,
            total_written: 0,
            kernel_blocks: 0,
            copy_blocks: 0,
            downgraded: false,
        })
    }

    /// Consume input and produce blocks.
    ///
    /// Returns [`Status::Ready`] once the terminal footer has been written.
    pub fn process(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Result<Status> {
        loop {
            let (read_before, written_before) = (input.position(), output.position());
            let step = self.step(input, output, flush);
            self.total_read += (input.position() - read_before) as u64;
            self.total_written += (output.position() - written_before) as u64;

            if let Some(status) = step? {
                return Ok(status);
            }
        }
    }

    /// Validate that the stream is complete and release the kernel.
    pub fn finish(&mut self) -> Result<()> {
        if self.state != State::Finished {
            return Err(Error::invalid_state("finished", "active"));
        }
        if let Some(kernel) = self.kernel.as_mut() {
            if !self.downgraded {
                kernel.finish()?;
            }
        }
        Ok(())
    }

    pub fn total_read(&self) -> u64 {
        self.total_read
    }

    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    pub fn kernel_blocks(&self) -> u64 {
        self.kernel_blocks
    }

    pub fn copy_blocks(&self) -> u64 {
        self.copy_blocks
    }

    /// Whether the stream fell back to copy blocks after net expansion.
    pub fn is_downgraded(&self) -> bool {
        self.downgraded
    }

    /// One state transition. `None` means keep going.
    fn step(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Result<Option<Status>> {
        if !self.spill.drain(output) {
            return Ok(Some(Status::StallOnOutput));
        }

        match self.state {
            State::WriteBlockHeader => {
                self.spill.emit(&[header_byte(self.block_index)], output);
                self.hasher.reset();
                self.state = State::WriteModeMarker { checkpoint: false };
                debug!(block = self.block_index, mode = self.target.name(), "opening block");
            }
            State::WriteModeMarker { checkpoint: false } => {
                self.spill.emit(&[self.target.marker()], output);
                match self.target {
                    BlockMode::Kernel => self.kernel_blocks += 1,
                    BlockMode::Copy => {
                        self.copy_blocks += 1;
                        self.copy_remaining = PREFERRED_COPY_BLOCK_SIZE;
                    }
                }
                self.state = State::WriteData;
            }
            State::WriteModeMarker { checkpoint: true } => {
                if self.total_written > self.total_read {
                    info!(
                        block = self.block_index,
                        read = self.total_read,
                        written = self.total_written,
                        "net expansion, switching to copy blocks"
                    );
                    self.target = BlockMode::Copy;
                    self.downgraded = true;
                }
                self.spill.emit(&[self.target.marker()], output);
                self.state = match self.target {
                    BlockMode::Kernel => State::WriteData,
                    BlockMode::Copy => State::WriteBlockFooter,
                };
            }
            State::WriteData => {
                return match self.target {
                    BlockMode::Copy => Ok(self.copy_data(input, output, flush)),
                    BlockMode::Kernel => self.kernel_data(input, output, flush),
                };
            }
            State::WriteBlockFooter => {
                self.write_footer(output);
                self.state = State::WriteBlockHeader;
            }
            State::WriteLastBlockFooter => {
                self.write_footer(output);
                self.state = State::Finished;
            }
            State::Finished => return Ok(Some(Status::Ready)),
        }
        Ok(None)
    }

    fn copy_data(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Option<Status> {
        // Block boundaries are decided only once it is known whether more
        // input follows, so the layout does not depend on call chunking.
        if self.copy_remaining == 0 || input.is_empty() {
            if !input.is_empty() {
                self.state = State::WriteBlockFooter;
            } else if flush {
                self.state = State::WriteLastBlockFooter;
            } else {
                return Some(Status::StallOnInput);
            }
            return None;
        }

        let n = self
            .copy_remaining
            .min(input.remaining())
            .min(output.remaining());
        if n == 0 {
            return Some(Status::StallOnOutput);
        }
        let bytes = input.take(n);
        output.write(bytes);
        self.hasher.update(bytes);
        self.copy_remaining -= n;
        None
    }

    fn kernel_data(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Result<Option<Status>> {
        let kernel = self
            .kernel
            .as_mut()
            .ok_or_else(|| Error::invalid_state("kernel stream", "copy stream"))?;

        let pending = input.as_slice();
        let start = input.position();
        let status = kernel.process(input, output, flush)?;
        self.hasher.update(&pending[..input.position() - start]);

        Ok(match status {
            KernelStatus::StallOnInput => Some(Status::StallOnInput),
            KernelStatus::StallOnOutput => Some(Status::StallOnOutput),
            KernelStatus::NewBlock => {
                self.state = State::WriteBlockFooter;
                None
            }
            KernelStatus::EfficiencyCheck => {
                self.state = State::WriteModeMarker { checkpoint: true };
                None
            }
            KernelStatus::Finished => {
                self.state = State::WriteLastBlockFooter;
                None
            }
        })
    }

    fn write_footer(&mut self, output: &mut OutputCursor<'_>) {
        if footer_size(self.block_type) > 0 {
            let footer = self.hasher.footer();
            self.spill.emit(&footer.to_bytes(), output);
        }
        debug!(block = self.block_index, "closing block");
        self.block_index += 1;
    }
}
