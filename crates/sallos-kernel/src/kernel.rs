//! Kernel contract and the closed set of kernels.
//!
//! The framing engine drives a kernel through [`KernelEncoder`] or
//! [`KernelDecoder`]. The kernel is chosen once per stream from the
//! [`CompressionMode`]; each variant is a monomorphized group engine.

use sallos_core::{CompressionMode, InputCursor, OutputCursor, Parameters, Result};

use crate::chameleon::Chameleon;
use crate::decode::GroupDecoder;
use crate::encode::GroupEncoder;
use crate::mandala::Mandala;

/// What a kernel `process` call stopped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelStatus {
    /// More input is needed.
    StallOnInput,
    /// More output capacity is needed.
    StallOnOutput,
    /// The per-block signature quota was reached and more data follows.
    /// The framing engine closes the block and opens the next one.
    NewBlock,
    /// The efficiency checkpoint of the current block was reached and more
    /// data follows. The framing engine writes (or reads) a mode marker.
    EfficiencyCheck,
    /// All data has been processed.
    Finished,
}

/// Encoding side of a kernel.
pub trait KernelEncoder {
    /// Reset dictionary and counters.
    fn init(&mut self, parameters: Parameters) -> Result<()>;

    /// Consume input and produce groups until a stall or a framing event.
    fn process(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Result<KernelStatus>;

    /// Validate that the kernel reached [`KernelStatus::Finished`].
    fn finish(&mut self) -> Result<()>;

    fn name(&self) -> &'static str;
}

/// Decoding side of a kernel.
pub trait KernelDecoder {
    /// Reset dictionary and counters.
    ///
    /// `end_data_overhead` is the number of trailer bytes that follow the
    /// kernel data at the end of the stream. They are never consumed as data.
    fn init(&mut self, parameters: Parameters, end_data_overhead: usize) -> Result<()>;

    /// Consume groups and reproduce chunks until a stall or a framing event.
    ///
    /// On [`KernelStatus::StallOnInput`] with `flush == false`, the last
    /// `end_data_overhead` bytes of `input` are left unconsumed and must be
    /// presented again.
    fn process(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Result<KernelStatus>;

    /// Validate that the kernel reached [`KernelStatus::Finished`].
    fn finish(&mut self) -> Result<()>;

    fn name(&self) -> &'static str;
}

/// Encoding kernel selected by compression mode.
#[derive(Debug)]
pub enum EncodeKernel {
    Chameleon(GroupEncoder<Chameleon>),
    Mandala(GroupEncoder<Mandala>),
}

impl EncodeKernel {
    /// Kernel for `mode`, or `None` for copy streams.
    pub fn for_mode(mode: CompressionMode, parameters: Parameters) -> Result<Option<Self>> {
        parameters.validate()?;
        Ok(match mode {
            CompressionMode::Copy => None,
            CompressionMode::Chameleon => {
                Some(EncodeKernel::Chameleon(GroupEncoder::new(parameters)))
            }
            CompressionMode::Mandala => Some(EncodeKernel::Mandala(GroupEncoder::new(parameters))),
        })
    }
}

impl KernelEncoder for EncodeKernel {
    fn init(&mut self, parameters: Parameters) -> Result<()> {
        match self {
            EncodeKernel::Chameleon(kernel) => kernel.init(parameters),
            EncodeKernel::Mandala(kernel) => kernel.init(parameters),
        }
    }

    fn process(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Result<KernelStatus> {
        match self {
            EncodeKernel::Chameleon(kernel) => kernel.process(input, output, flush),
            EncodeKernel::Mandala(kernel) => kernel.process(input, output, flush),
        }
    }

    fn finish(&mut self) -> Result<()> {
        match self {
            EncodeKernel::Chameleon(kernel) => kernel.finish(),
            EncodeKernel::Mandala(kernel) => kernel.finish(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            EncodeKernel::Chameleon(kernel) => kernel.name(),
            EncodeKernel::Mandala(kernel) => kernel.name(),
        }
    }
}

/// Decoding kernel selected by compression mode.
#[derive(Debug)]
pub enum DecodeKernel {
    Chameleon(GroupDecoder<Chameleon>),
    Mandala(GroupDecoder<Mandala>),
}

impl DecodeKernel {
    /// Kernel for `mode`, or `None` for copy streams.
    pub fn for_mode(
        mode: CompressionMode,
        parameters: Parameters,
        end_data_overhead: usize,
    ) -> Result<Option<Self>> {
        parameters.validate()?;
        Ok(match mode {
            CompressionMode::Copy => None,
            CompressionMode::Chameleon => Some(DecodeKernel::Chameleon(GroupDecoder::new(
                parameters,
                end_data_overhead,
            ))),
            CompressionMode::Mandala => Some(DecodeKernel::Mandala(GroupDecoder::new(
                parameters,
                end_data_overhead,
            ))),
        })
    }
}

impl KernelDecoder for DecodeKernel {
    fn init(&mut self, parameters: Parameters, end_data_overhead: usize) -> Result<()> {
        match self {
            DecodeKernel::Chameleon(kernel) => kernel.init(parameters, end_data_overhead),
            DecodeKernel::Mandala(kernel) => kernel.init(parameters, end_data_overhead),
        }
    }

    fn process(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut OutputCursor<'_>,
        flush: bool,
    ) -> Result<KernelStatus> {
        match self {
            DecodeKernel::Chameleon(kernel) => kernel.process(input, output, flush),
            DecodeKernel::Mandala(kernel) => kernel.process(input, output, flush),
        }
    }

    fn finish(&mut self) -> Result<()> {
        match self {
            DecodeKernel::Chameleon(kernel) => kernel.finish(),
            DecodeKernel::Mandala(kernel) => kernel.finish(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            DecodeKernel::Chameleon(kernel) => kernel.name(),
            DecodeKernel::Mandala(kernel) => kernel.name(),
        }
    }
}
