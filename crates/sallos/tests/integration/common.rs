//! Shared drivers and data generators.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sallos::{Decoder, DecoderConfig, Encoder, EncoderConfig, Result};
use sallos_core::{CompressionStats, InputCursor, OutputCursor, Status};
use tracing_subscriber::EnvFilter;

/// Route codec logs to the test harness; set `RUST_LOG` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Text-like data: phrases from a small vocabulary with occasional noise.
pub fn text(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let phrases: &[&[u8]] = &[
        b"The quick brown fox jumps over the lazy dog. ",
        b"Pack my box with five dozen liquor jugs! ",
        b"How vexingly quick daft zebras jump!! ",
    ];
    let mut data = Vec::with_capacity(len);
    while data.len() < len {
        if rng.gen_bool(0.9) {
            data.extend_from_slice(phrases[rng.gen_range(0..phrases.len())]);
        } else {
            data.push(rng.gen());
        }
    }
    data.truncate(len);
    data
}

/// Incompressible data.
pub fn random(len: usize, seed: u64) -> Vec<u8> {
    let mut data = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill(&mut data[..]);
    data
}

/// Encode `data` presenting at most `in_chunk` input bytes and `out_chunk`
/// output bytes per call.
pub fn encode_chunked(
    config: EncoderConfig,
    data: &[u8],
    in_chunk: usize,
    out_chunk: usize,
) -> (Vec<u8>, CompressionStats) {
    let mut encoder = Encoder::new(config).unwrap();
    let mut compressed = Vec::new();
    let mut buf = vec![0u8; out_chunk];
    let mut fed = 0;
    loop {
        let end = (fed + in_chunk).min(data.len());
        let flush = end == data.len();
        let mut input = InputCursor::new(&data[fed..end]);
        let mut output = OutputCursor::new(&mut buf);
        let status = encoder.process(&mut input, &mut output, flush).unwrap();
        fed += input.position();
        compressed.extend_from_slice(output.written());
        if status == Status::Ready {
            break;
        }
    }
    let stats = encoder.finish().unwrap();
    (compressed, stats)
}

/// Encode with unbounded buffers.
pub fn encode(config: EncoderConfig, data: &[u8]) -> Vec<u8> {
    encode_chunked(config, data, data.len().max(1), data.len() * 2 + 1024).0
}

/// Decode `compressed` presenting at most `in_chunk` new bytes per call.
///
/// Bytes the decoder leaves unconsumed are presented again on the next call.
pub fn decode_chunked(
    config: DecoderConfig,
    compressed: &[u8],
    in_chunk: usize,
    out_chunk: usize,
) -> Result<(Vec<u8>, CompressionStats)> {
    let mut decoder = Decoder::new(config)?;
    let mut decoded = Vec::new();
    let mut buf = vec![0u8; out_chunk];
    let mut pending: Vec<u8> = Vec::new();
    let mut fed = 0;
    let mut status = Status::StallOnInput;
    loop {
        if status == Status::StallOnInput {
            let end = (fed + in_chunk).min(compressed.len());
            pending.extend_from_slice(&compressed[fed..end]);
            fed = end;
        }
        let flush = fed == compressed.len();

        let mut input = InputCursor::new(&pending);
        let mut output = OutputCursor::new(&mut buf);
        status = decoder.process(&mut input, &mut output, flush)?;
        let consumed = input.position();
        decoded.extend_from_slice(output.written());
        pending.drain(..consumed);
        if status == Status::Ready {
            break;
        }
    }
    let stats = decoder.finish()?;
    assert!(pending.is_empty(), "{} bytes left after the stream", pending.len());
    Ok((decoded, stats))
}

/// Decode with unbounded buffers.
pub fn decode(config: DecoderConfig, compressed: &[u8]) -> Result<Vec<u8>> {
    decode_chunked(
        config,
        compressed,
        compressed.len().max(1),
        compressed.len() * 16 + 1024,
    )
    .map(|(decoded, _)| decoded)
}
