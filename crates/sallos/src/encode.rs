//! Container encoder.

use tracing::{debug, warn};

use sallos_core::{
    CompressionStats, Error, InputCursor, OutputCursor, Result, Spill, Status, StreamState,
};

use crate::block::BlockEncoder;
use crate::config::EncoderConfig;
use crate::container::{ContainerFooter, ContainerHeader, CONTAINER_HEADER_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Header,
    Blocks,
    Footer,
    Done,
}

/// Incremental encoder for one stream.
///
/// Call [`process`](Encoder::process) until it returns [`Status::Ready`],
/// supplying more input on [`Status::StallOnInput`] and more output space on
/// [`Status::StallOnOutput`]. Set `flush` once the last input byte has been
/// presented. Output does not depend on how input and output are chunked.
///
/// # Example
///
/// ```
/// use sallos::{Encoder, EncoderConfig};
/// use sallos_core::{InputCursor, OutputCursor, Status};
///
/// let mut encoder = Encoder::new(EncoderConfig::default())?;
/// let mut out = vec![0u8; 1024];
/// let mut input = InputCursor::new(b"hello hello hello hello");
/// let mut output = OutputCursor::new(&mut out);
/// assert_eq!(encoder.process(&mut input, &mut output, true)?, Status::Ready);
/// let stats = encoder.finish()?;
/// assert_eq!(stats.original_size, 23);
/// # Ok::<(), sallos_core::Error>(())
/// ```
#[derive(Debug)]
pub struct Encoder {
    config: EncoderConfig,
    phase: Phase,
    state: StreamState,
    blocks: BlockEncoder,
    spill: Spill,
    total_out: u64,
}

impl Encoder {
    pub fn new(config: EncoderConfig) -> Result<Self> {
        let blocks = BlockEncoder::new(config.mode, config.block_type, config.parameters())?;
        Ok(Self {
            config,
            phase: Phase::Header,
            state: StreamState::Initial,
            blocks,
            spill: Spill::with_capacity(CONTAINER_HEADER_SIZE),
            total_out: 0,
        })
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Input bytes consumed so far.
    pub fn total_in(&self) -> u64 {
        self.blocks.total_read()
    }

    /// Output bytes produced so far.
    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    /// Consume input and produce compressed output.
    ///
    /// After an error the encoder is unusable; later calls return
    /// [`Error::InvalidState`].
    pub fn process(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Result<Status> {
        if !self.state.can_process() {
            return Err(Error::invalid_state("active", self.state.name()));
        }

        let written_before = output.position();
        let result = self.run(input, output, flush);
        self.total_out += (output.position() - written_before) as u64;

        match result {
            Ok(Status::Ready) => {
                self.state = StreamState::Finished;
                Ok(Status::Ready)
            }
            Ok(status) => {
                self.state = StreamState::Active;
                Ok(status)
            }
            Err(err) => {
                warn!(error = %err, "encoder failed");
                self.state = StreamState::Error;
                Err(err)
            }
        }
    }

    /// Close the stream and return its summary.
    ///
    /// Valid only after [`process`](Encoder::process) returned
    /// [`Status::Ready`].
    pub fn finish(&mut self) -> Result<CompressionStats> {
        if self.state != StreamState::Finished {
            let actual = self.state.name();
            self.state = StreamState::Error;
            return Err(Error::invalid_state("finished", actual));
        }
        if let Err(err) = self.blocks.finish() {
            self.state = StreamState::Error;
            return Err(err);
        }
        self.state = StreamState::Closed;

        let stats = CompressionStats {
            mode: Some(self.config.mode),
            original_size: self.blocks.total_read(),
            compressed_size: self.total_out,
            kernel_blocks: self.blocks.kernel_blocks(),
            copy_blocks: self.blocks.copy_blocks(),
            downgraded: self.blocks.is_downgraded(),
        };
        debug!(
            mode = self.config.mode.name(),
            original = stats.original_size,
            compressed = stats.compressed_size,
            blocks = stats.blocks(),
            "stream encoded"
        );
        Ok(stats)
    }

    fn run(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Result<Status> {
        loop {
            if !self.spill.drain(output) {
                return Ok(Status::StallOnOutput);
            }

            match self.phase {
                Phase::Header => {
                    if self.config.output_shape.has_header() {
                        let header = ContainerHeader::new(
                            self.config.mode,
                            self.config.block_type,
                            self.config.parameters(),
                        );
                        self.spill.emit(&header.to_bytes(), output);
                    }
                    self.phase = Phase::Blocks;
                }
                Phase::Blocks => match self.blocks.process(input, output, flush)? {
                    Status::Ready => self.phase = Phase::Footer,
                    stall => return Ok(stall),
                },
                Phase::Footer => {
                    if self.config.output_shape.has_footer() {
                        let footer = ContainerFooter::new(self.blocks.total_read());
                        self.spill.emit(&footer.to_bytes(), output);
                    }
                    self.phase = Phase::Done;
                }
                Phase::Done => return Ok(Status::Ready),
            }
        }
    }
}
