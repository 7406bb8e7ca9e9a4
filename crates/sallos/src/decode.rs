//! Container decoder.

use tracing::{debug, warn};

use sallos_core::{
    CompressionStats, Error, InputCursor, OutputCursor, Result, Status, StreamState,
};

use crate::block::BlockDecoder;
use crate::config::{DecoderConfig, FrameDescription};
use crate::container::{
    ContainerFooter, ContainerHeader, CONTAINER_FOOTER_SIZE, CONTAINER_HEADER_SIZE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Header,
    Blocks,
    Footer,
    Done,
}

/// Incremental decoder for one stream.
///
/// The end of the stream is recognised from `flush`: pass `true` once the
/// last compressed byte has been presented. On [`Status::StallOnInput`] the
/// decoder may leave trailing bytes of `input` unconsumed (a container or
/// block trailer it cannot yet tell apart from data); present them again,
/// followed by more input, on the next call.
#[derive(Debug)]
pub struct Decoder {
    config: DecoderConfig,
    phase: Phase,
    state: StreamState,
    header: Option<ContainerHeader>,
    frame: Option<FrameDescription>,
    blocks: Option<BlockDecoder>,
    total_in: u64,
}

impl Decoder {
    /// Create a decoder.
    ///
    /// A stream without a container header can only be read when
    /// `config.fallback` describes it.
    pub fn new(config: DecoderConfig) -> Result<Self> {
        let mut decoder = Self {
            config,
            phase: Phase::Header,
            state: StreamState::Initial,
            header: None,
            frame: None,
            blocks: None,
            total_in: 0,
        };
        if !config.output_shape.has_header() {
            let frame = config.fallback.ok_or_else(|| {
                Error::Unsupported("headerless stream needs a frame description".into())
            })?;
            decoder.start_blocks(frame)?;
        }
        Ok(decoder)
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Container header, once it has been read.
    pub fn header(&self) -> Option<&ContainerHeader> {
        self.header.as_ref()
    }

    /// Stream properties in effect, from the header or the fallback.
    pub fn frame(&self) -> Option<FrameDescription> {
        self.frame
    }

    /// Compressed bytes consumed so far.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Decompressed bytes produced so far.
    pub fn total_out(&self) -> u64 {
        self.blocks.as_ref().map_or(0, BlockDecoder::total_written)
    }

    /// Consume compressed input and produce the original bytes.
    pub fn process(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Result<Status> {
        if !self.state.can_process() {
            return Err(Error::invalid_state("active", self.state.name()));
        }

        let read_before = input.position();
        let result = self.run(input, output, flush);
        self.total_in += (input.position() - read_before) as u64;

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
                warn!(error = %err, offset = self.total_in, "decoder failed");
                self.state = StreamState::Error;
                Err(err)
            }
        }
    }

    /// Close the stream and return its summary.
    pub fn finish(&mut self) -> Result<CompressionStats> {
        if self.state != StreamState::Finished {
            let actual = self.state.name();
            self.state = StreamState::Error;
            return Err(Error::invalid_state("finished", actual));
        }
        let blocks = self
            .blocks
            .as_mut()
            .ok_or_else(|| Error::invalid_state("finished", "initial"))?;
        if let Err(err) = blocks.finish() {
            self.state = StreamState::Error;
            return Err(err);
        }
        self.state = StreamState::Closed;

        Ok(CompressionStats {
            mode: self.frame.map(|frame| frame.mode),
            original_size: blocks.total_written(),
            compressed_size: self.total_in,
            kernel_blocks: blocks.kernel_blocks(),
            copy_blocks: blocks.copy_blocks(),
            downgraded: blocks.is_downgraded(),
        })
    }

    fn start_blocks(&mut self, frame: FrameDescription) -> Result<()> {
        let trailer = if self.config.output_shape.has_footer() {
            CONTAINER_FOOTER_SIZE
        } else {
            0
        };
        self.blocks = Some(BlockDecoder::new(
            frame.mode,
            frame.block_type,
            frame.parameters,
            trailer,
        )?);
        self.frame = Some(frame);
        self.phase = Phase::Blocks;
        Ok(())
    }

    fn run(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Result<Status> {
        loop {
            match self.phase {
                Phase::Header => {
                    let Some(bytes) = input.take_array::<CONTAINER_HEADER_SIZE>() else {
                        if flush {
                            return Err(Error::corrupted("stream truncated in container header"));
                        }
                        return Ok(Status::StallOnInput);
                    };
                    let header = ContainerHeader::parse(&bytes)?;
                    debug!(
                        version = %header.version,
                        mode = header.mode.name(),
                        "container header"
                    );
                    self.header = Some(header);
                    self.start_blocks(FrameDescription {
                        mode: header.mode,
                        block_type: header.block_type,
                        parameters: header.parameters,
                    })?;
                }
                Phase::Blocks => {
                    let blocks = self
                        .blocks
                        .as_mut()
                        .ok_or_else(|| Error::invalid_state("blocks", "header"))?;
                    match blocks.process(input, output, flush)? {
                        Status::Ready => self.phase = Phase::Footer,
                        stall => return Ok(stall),
                    }
                }
                Phase::Footer => {
                    if self.config.output_shape.has_footer() {
                        let Some(bytes) = input.take_array::<CONTAINER_FOOTER_SIZE>() else {
                            if flush {
                                return Err(Error::corrupted(
                                    "stream truncated in container footer",
                                ));
                            }
                            return Ok(Status::StallOnInput);
                        };
                        ContainerFooter::from_bytes(bytes).verify(self.total_out())?;
                    }
                    self.phase = Phase::Done;
                }
                Phase::Done => return Ok(Status::Ready),
            }
        }
    }
}
