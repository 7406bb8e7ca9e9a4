//! Block decoding state machine.

use tracing::{debug, info, warn};

use sallos_core::{
    BlockMode, BlockType, CompressionMode, Error, InputCursor, OutputCursor, Parameters, Result,
    Status,
};
use sallos_kernel::{DecodeKernel, KernelDecoder, KernelStatus};

use super::{
    data_region, footer_size, header_byte, BlockFooter, BlockHasher, BLOCK_FOOTER_SIZE,
    PREFERRED_COPY_BLOCK_SIZE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadBlockHeader,
    ReadModeMarker { checkpoint: bool },
    ReadData,
    ReadBlockFooter { last: bool },
    Finished,
}

/// Mirror of [`BlockEncoder`](super::BlockEncoder).
///
/// Headers, markers and footers are read whole or not at all: when one is
/// split across calls the decoder stalls without consuming it, and the
/// caller presents those bytes again with more input appended.
#[derive(Debug)]
pub struct BlockDecoder {
    state: State,
    kernel: Option<DecodeKernel>,
    mode: BlockMode,
    block_type: BlockType,
    /// Trailer bytes after the last block's data.
    end_data_overhead: usize,
    hasher: BlockHasher,
    block_index: u64,
    copy_remaining: usize,
    total_read: u64,
    total_written: u64,
    kernel_blocks: u64,
    copy_blocks: u64,
    downgraded: bool,
}

impl BlockDecoder {
    /// `trailer_size` counts bytes following the last block footer, such as
    /// a container footer.
    pub fn new(
        mode: CompressionMode,
        block_type: BlockType,
        parameters: Parameters,
        trailer_size: usize,
    ) -> Result<Self> {
        let end_data_overhead = footer_size(block_type) + trailer_size;
        let kernel = DecodeKernel::for_mode(mode, parameters, end_data_overhead)?;
        let mode = if kernel.is_some() {
            BlockMode::Kernel
        } else {
            BlockMode::Copy
        };
        Ok(Self {
            state: State::ReadBlockHeader,
            kernel,
            mode,
            block_type,
            end_data_overhead,
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

    /// Consume blocks and reproduce the original bytes.
    ///
    /// Returns [`Status::Ready`] once the terminal block footer was verified.
    /// With `flush` set, input ending in the middle of a block is corrupt.
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

    pub fn finish(&mut self) -> Result<()> {
        if self.state != State::Finished {
            return Err(Error::invalid_state("finished", "active"));
        }
        if let Some(kernel) = self.kernel.as_mut() {
            if self.kernel_blocks > 0 && !self.downgraded {
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

    pub fn is_downgraded(&self) -> bool {
        self.downgraded
    }

    /// Read a fixed-size framing field, or report why it is not there yet.
    fn read_field<const N: usize>(
        input: &mut InputCursor<'_>,
        flush: bool,
        what: &str,
    ) -> Result<std::result::Result<[u8; N], Status>> {
        match input.take_array::<N>() {
            Some(bytes) => Ok(Ok(bytes)),
            None if flush => Err(Error::corrupted(format!("stream truncated in {what}"))),
            None => Ok(Err(Status::StallOnInput)),
        }
    }

    fn step(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Result<Option<Status>> {
        match self.state {
            State::ReadBlockHeader => {
                let [byte] = match Self::read_field::<1>(input, flush, "block header")? {
                    Ok(bytes) => bytes,
                    Err(status) => return Ok(Some(status)),
                };
                let expected = header_byte(self.block_index);
                if byte != expected {
                    return Err(Error::corrupted_at(
                        format!("block header {byte:#04x}, expected {expected:#04x}"),
                        self.total_read,
                    ));
                }
                self.hasher.reset();
                self.state = State::ReadModeMarker { checkpoint: false };
            }
            State::ReadModeMarker { checkpoint } => {
                let [marker] = match Self::read_field::<1>(input, flush, "mode marker")? {
                    Ok(bytes) => bytes,
                    Err(status) => return Ok(Some(status)),
                };
                let mode = BlockMode::from_marker(marker)?;
                if checkpoint {
                    self.checkpoint(mode);
                } else {
                    self.open_block(mode)?;
                }
            }
            State::ReadData => {
                return match self.mode {
                    BlockMode::Copy => self.copy_data(input, output, flush),
                    BlockMode::Kernel => self.kernel_data(input, output, flush),
                };
            }
            State::ReadBlockFooter { last } => {
                if footer_size(self.block_type) > 0 {
                    let bytes = match Self::read_field::<BLOCK_FOOTER_SIZE>(
                        input,
                        flush,
                        "block footer",
                    )? {
                        Ok(bytes) => bytes,
                        Err(status) => return Ok(Some(status)),
                    };
                    self.verify_footer(BlockFooter::from_bytes(bytes))?;
                }
                debug!(block = self.block_index, last, "block verified");
                self.block_index += 1;
                self.state = if last {
                    State::Finished
                } else {
                    State::ReadBlockHeader
                };
            }
            State::Finished => return Ok(Some(Status::Ready)),
        }
        Ok(None)
    }

    /// Marker at the start of a block.
    fn open_block(&mut self, mode: BlockMode) -> Result<()> {
        match mode {
            BlockMode::Kernel => {
                if self.kernel.is_none() {
                    return Err(Error::corrupted("kernel block in a copy stream"));
                }
                if self.downgraded {
                    return Err(Error::corrupted("kernel block after downgrade to copy"));
                }
                self.kernel_blocks += 1;
            }
            BlockMode::Copy => {
                if self.mode == BlockMode::Kernel {
                    info!(block = self.block_index, "stream continues in copy blocks");
                    self.downgraded = true;
                }
                self.copy_blocks += 1;
                self.copy_remaining = PREFERRED_COPY_BLOCK_SIZE;
            }
        }
        self.mode = mode;
        debug!(block = self.block_index, mode = mode.name(), "reading block");
        self.state = State::ReadData;
        Ok(())
    }

    /// Marker at the efficiency checkpoint of a kernel block.
    fn checkpoint(&mut self, mode: BlockMode) {
        match mode {
            BlockMode::Kernel => self.state = State::ReadData,
            BlockMode::Copy => {
                info!(block = self.block_index, "encoder downgraded to copy blocks");
                self.mode = BlockMode::Copy;
                self.downgraded = true;
                self.state = State::ReadBlockFooter { last: false };
            }
        }
    }

    fn verify_footer(&self, footer: BlockFooter) -> Result<()> {
        let expected = footer.digest();
        let actual = self.hasher.footer().digest();
        if expected != actual {
            warn!(block = self.block_index, "block checksum mismatch");
            return Err(Error::checksum_mismatch(self.block_index, expected, actual));
        }
        Ok(())
    }

    fn copy_data(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Result<Option<Status>> {
        let available = data_region(input.remaining(), self.end_data_overhead, flush)?;
        if self.copy_remaining == 0 || available == 0 {
            if available > 0 {
                self.state = State::ReadBlockFooter { last: false };
            } else if flush {
                self.state = State::ReadBlockFooter { last: true };
            } else {
                return Ok(Some(Status::StallOnInput));
            }
            return Ok(None);
        }

        let n = self.copy_remaining.min(available).min(output.remaining());
        if n == 0 {
            return Ok(Some(Status::StallOnOutput));
        }
        let bytes = input.take(n);
        output.write(bytes);
        self.hasher.update(bytes);
        self.copy_remaining -= n;
        Ok(None)
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

        let start = output.position();
        let status = kernel.process(input, output, flush)?;
        self.hasher.update(&output.written()[start..]);

        Ok(match status {
            KernelStatus::StallOnInput => Some(Status::StallOnInput),
            KernelStatus::StallOnOutput => Some(Status::StallOnOutput),
            KernelStatus::NewBlock => {
                self.state = State::ReadBlockFooter { last: false };
                None
            }
            KernelStatus::EfficiencyCheck => {
                self.state = State::ReadModeMarker { checkpoint: true };
                None
            }
            KernelStatus::Finished => {
                self.state = State::ReadBlockFooter { last: true };
                None
            }
        })
    }
}
