//! One-way downgrade to copy blocks on net expansion.

use sallos::block::PREFERRED_COPY_BLOCK_SIZE;
use sallos::{BlockType, CompressionMode, DecoderConfig, EncoderConfig, Error, FrameDescription, OutputShape};
use sallos_core::BlockMode;

use super::common::{decode, decode_chunked, encode, encode_chunked, init_tracing, random};

#[test]
fn test_incompressible_prefix_downgrades_for_good() {
    init_tracing();
    // Noise trips the checkpoint; the zeros that follow would compress well
    // but the stream never returns to kernel blocks.
    let mut data = random(64 * 1024, 20);
    data.extend(vec![0u8; 200 * 1024]);

    for mode in [CompressionMode::Mandala, CompressionMode::Chameleon] {
        let config = EncoderConfig::new(mode);
        let (compressed, stats) = encode_chunked(config, &data, data.len(), data.len() * 2);
        assert!(stats.downgraded, "{mode:?}");
        assert_eq!(stats.kernel_blocks, 1, "{mode:?}");
        assert!(stats.copy_blocks >= 4, "{mode:?}");

        let (decoded, decode_stats) =
            decode_chunked(DecoderConfig::default(), &compressed, 4096, 4096).unwrap();
        assert_eq!(decoded, data);
        assert!(decode_stats.downgraded);
        assert_eq!(decode_stats.kernel_blocks, 1);
        assert_eq!(decode_stats.copy_blocks, stats.copy_blocks);
    }
}

#[test]
fn test_compressible_stream_never_downgrades() {
    let data = vec![b'a'; 300 * 1024];
    let (_, stats) = encode_chunked(EncoderConfig::default(), &data, 1000, 1000);
    assert!(!stats.downgraded);
    assert_eq!(stats.copy_blocks, 0);
}

#[test]
fn test_expansion_bounded_after_downgrade() {
    let data = random(1 << 20, 21);
    let compressed = encode(EncoderConfig::default(), &data);
    // One checkpoint worth of expansion, then copy framing only.
    assert!(compressed.len() < data.len() + data.len() / 50);
    assert_eq!(decode(DecoderConfig::default(), &compressed).unwrap(), data);
}

/// Bare stream: a full copy block, then a block of the given mode.
fn forged(second: BlockMode) -> Vec<u8> {
    let mut stream = vec![0, BlockMode::Copy.marker()];
    stream.extend(vec![0x42; PREFERRED_COPY_BLOCK_SIZE]);
    stream.extend([1, second.marker()]);
    stream.extend([0u8; 8]);
    stream
}

fn bare(mode: CompressionMode) -> DecoderConfig {
    DecoderConfig::default()
        .with_output_shape(OutputShape::WithoutHeaderNorFooter)
        .with_fallback(FrameDescription {
            mode,
            block_type: BlockType::NoIntegrityCheck,
            ..Default::default()
        })
}

#[test]
fn test_kernel_block_after_copy_is_rejected() {
    let result = decode(bare(CompressionMode::Mandala), &forged(BlockMode::Kernel));
    assert!(matches!(result, Err(Error::CorruptedData { .. })));
}

#[test]
fn test_kernel_block_in_copy_stream_is_rejected() {
    let result = decode(bare(CompressionMode::Copy), &forged(BlockMode::Kernel));
    assert!(matches!(result, Err(Error::CorruptedData { .. })));
}

#[test]
fn test_copy_blocks_in_kernel_stream_are_accepted() {
    let stream = forged(BlockMode::Copy);
    let decoded = decode(bare(CompressionMode::Mandala), &stream).unwrap();
    assert_eq!(decoded.len(), PREFERRED_COPY_BLOCK_SIZE + 8);
}
