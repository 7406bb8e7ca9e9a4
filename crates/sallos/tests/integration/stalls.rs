//! Output must not depend on how calls are chunked.

use sallos::{BlockType, CompressionMode, DecoderConfig, EncoderConfig, OutputShape};

use super::common::{decode, decode_chunked, encode, encode_chunked, random, text};

fn configs() -> Vec<EncoderConfig> {
    let mut configs = Vec::new();
    for mode in CompressionMode::ALL {
        configs.push(EncoderConfig::new(mode));
        configs.push(
            EncoderConfig::new(mode)
                .with_block_type(BlockType::NoIntegrityCheck)
                .with_output_shape(OutputShape::WithoutHeaderNorFooter),
        );
    }
    configs
}

#[test]
fn test_single_byte_buffers_match_bulk() {
    let data = text(5_000, 10);
    for config in configs() {
        let bulk = encode(config, &data);
        let (bytewise, _) = encode_chunked(config, &data, 1, 1);
        assert_eq!(bytewise, bulk, "encode {config:?}");

        let (decoded, _) = decode_chunked(DecoderConfig::from(&config), &bulk, 1, 1).unwrap();
        assert_eq!(decoded, data, "decode {config:?}");
    }
}

#[test]
fn test_mixed_buffer_sizes() {
    let data = text(150_000, 11);
    for config in configs() {
        let bulk = encode(config, &data);
        for (in_chunk, out_chunk) in [(1, 4096), (4096, 1), (7, 13), (129, 127), (65_537, 300)] {
            let (chunked, _) = encode_chunked(config, &data, in_chunk, out_chunk);
            assert_eq!(chunked, bulk, "encode {config:?} {in_chunk}/{out_chunk}");

            let (decoded, _) =
                decode_chunked(DecoderConfig::from(&config), &bulk, in_chunk, out_chunk).unwrap();
            assert_eq!(decoded, data, "decode {config:?} {in_chunk}/{out_chunk}");
        }
    }
}

#[test]
fn test_chunking_across_downgrade() {
    let mut data = random(40_000, 12);
    data.extend(text(40_000, 13));
    let config = EncoderConfig::new(CompressionMode::Mandala);
    let bulk = encode(config, &data);
    for (in_chunk, out_chunk) in [(1, 1), (3, 5), (1000, 17)] {
        let (chunked, stats) = encode_chunked(config, &data, in_chunk, out_chunk);
        assert_eq!(chunked, bulk);
        assert!(stats.downgraded);
        let (decoded, _) =
            decode_chunked(DecoderConfig::default(), &bulk, in_chunk, out_chunk).unwrap();
        assert_eq!(decoded, data);
    }
    assert_eq!(decode(DecoderConfig::default(), &bulk).unwrap(), data);
}

#[test]
fn test_stats_are_chunking_independent() {
    let data = text(300_000, 14);
    let config = EncoderConfig::new(CompressionMode::Chameleon);
    let (bulk, bulk_stats) = encode_chunked(config, &data, data.len(), 1 << 20);
    let (_, chunked_stats) = encode_chunked(config, &data, 999, 333);
    assert_eq!(bulk_stats, chunked_stats);
    assert_eq!(bulk_stats.original_size, data.len() as u64);
    assert_eq!(bulk_stats.compressed_size, bulk.len() as u64);

    let (_, decode_stats) = decode_chunked(DecoderConfig::default(), &bulk, 512, 512).unwrap();
    assert_eq!(decode_stats.original_size, data.len() as u64);
    assert_eq!(decode_stats.compressed_size, bulk.len() as u64);
    assert_eq!(decode_stats.kernel_blocks, bulk_stats.kernel_blocks);
}
