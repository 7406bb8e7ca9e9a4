//! One-shot compression of whole buffers.
//!
//! Thin wrappers that drive [`Encoder`] and [`Decoder`] over complete
//! in-memory inputs.

use sallos_core::{CompressionMode, Error, InputCursor, OutputCursor, Result, Status};

use crate::block::{BLOCK_FOOTER_SIZE, BLOCK_HEADER_SIZE, MODE_MARKER_SIZE, PREFERRED_COPY_BLOCK_SIZE};
use crate::config::{DecoderConfig, EncoderConfig};
use crate::container::{ContainerFooter, CONTAINER_FOOTER_SIZE, CONTAINER_HEADER_SIZE};
use crate::decode::Decoder;
use crate::encode::Encoder;

/// Largest expansion of the decoder: a fully predicted Mandala group turns
/// an 8-byte signature into 128 bytes.
const MAX_EXPANSION: usize = 16;

/// Upper bound on the compressed size of `input_len` bytes in `mode`.
///
/// Holds for every output shape and block type.
pub fn max_compressed_length(input_len: usize, mode: CompressionMode) -> usize {
    // Header, start marker, checkpoint marker, footer.
    let per_block = BLOCK_HEADER_SIZE + 2 * MODE_MARKER_SIZE + BLOCK_FOOTER_SIZE;
    let container = CONTAINER_HEADER_SIZE + CONTAINER_FOOTER_SIZE;

    let framing = match (
        sallos_kernel::group_input_size(mode),
        sallos_kernel::efficiency_check_signatures(mode),
    ) {
        (Some(group), Some(check)) => {
            let signatures = input_len.div_ceil(group) * sallos_kernel::SIGNATURE_SIZE;
            // Kernel blocks plus the copy blocks a downgrade may add.
            let blocks = input_len / (group * check as usize) + 2;
            signatures + blocks * per_block
        }
        _ => (input_len / PREFERRED_COPY_BLOCK_SIZE + 1) * per_block,
    };

    container + input_len + framing
}

/// Compress `input` into `output`, returning the number of bytes written.
///
/// Fails with [`Error::BufferTooSmall`] carrying
/// [`max_compressed_length`] when `output` cannot hold the stream.
pub fn compress_to(input: &[u8], output: &mut [u8], config: &EncoderConfig) -> Result<usize> {
    let mut encoder = Encoder::new(*config)?;
    let provided = output.len();
    let mut src = InputCursor::new(input);
    let mut dst = OutputCursor::new(output);

    match encoder.process(&mut src, &mut dst, true)? {
        Status::Ready => {}
        Status::StallOnOutput => {
            return Err(Error::buffer_too_small(
                max_compressed_length(input.len(), config.mode),
                provided,
            ))
        }
        Status::StallOnInput => return Err(Error::invalid_state("ready", "stalled on input")),
    }
    encoder.finish()?;
    Ok(dst.position())
}

/// Compress `input` into a new vector.
pub fn compress(input: &[u8], config: &EncoderConfig) -> Result<Vec<u8>> {
    let mut output = vec![0u8; max_compressed_length(input.len(), config.mode)];
    let written = compress_to(input, &mut output, config)?;
    output.truncate(written);
    Ok(output)
}

/// Decompress a complete stream into `output`, returning the bytes written.
///
/// When `output` is too small the error's `required` field is the length
/// recorded in the container footer, if the stream has one.
pub fn decompress_to(input: &[u8], output: &mut [u8], config: &DecoderConfig) -> Result<usize> {
    let mut decoder = Decoder::new(*config)?;
    let provided = output.len();
    let mut src = InputCursor::new(input);
    let mut dst = OutputCursor::new(output);

    match decoder.process(&mut src, &mut dst, true)? {
        Status::Ready => {}
        Status::StallOnOutput => {
            let required = recorded_length(input, config)
                .filter(|&len| len > provided)
                .unwrap_or(provided + 1);
            return Err(Error::buffer_too_small(required, provided));
        }
        Status::StallOnInput => return Err(Error::unexpected_eof(src.position())),
    }
    decoder.finish()?;
    ensure_consumed(&src)?;
    Ok(dst.position())
}

/// Decompress a complete stream into a new vector.
pub fn decompress(input: &[u8], config: &DecoderConfig) -> Result<Vec<u8>> {
    let bound = input.len().saturating_mul(MAX_EXPANSION).saturating_add(1024);
    let hint = recorded_length(input, config).map_or(input.len() * 2, |len| len.min(bound));

    let mut decoder = Decoder::new(*config)?;
    let mut src = InputCursor::new(input);
    let mut output = vec![0u8; hint.max(64)];
    let mut produced = 0;
    loop {
        let mut dst = OutputCursor::new(&mut output[produced..]);
        let status = decoder.process(&mut src, &mut dst, true)?;
        produced += dst.position();
        match status {
            Status::Ready => break,
            Status::StallOnOutput => {
                let grow = output.len();
                output.resize(output.len() + grow, 0);
            }
            Status::StallOnInput => return Err(Error::unexpected_eof(src.position())),
        }
    }
    decoder.finish()?;
    ensure_consumed(&src)?;
    output.truncate(produced);
    Ok(output)
}

fn recorded_length(input: &[u8], config: &DecoderConfig) -> Option<usize> {
    if !config.output_shape.has_footer() || input.len() < CONTAINER_FOOTER_SIZE {
        return None;
    }
    ContainerFooter::from_stream_end(input)
        .and_then(|footer| usize::try_from(footer.total_uncompressed).ok())
}

fn ensure_consumed(src: &InputCursor<'_>) -> Result<()> {
    if !src.is_empty() {
        return Err(Error::corrupted_at(
            format!("{} trailing bytes after stream", src.remaining()),
            src.position() as u64,
        ));
    }
    Ok(())
}
