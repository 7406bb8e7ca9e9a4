//! Round trips across modes, block types, shapes and lengths.

use sallos::{BlockType, CompressionMode, DecoderConfig, EncoderConfig, OutputShape};

use super::common::{decode, encode, random, text};

const SHAPES: [OutputShape; 4] = [
    OutputShape::Default,
    OutputShape::WithoutHeader,
    OutputShape::WithoutFooter,
    OutputShape::WithoutHeaderNorFooter,
];

#[test]
fn test_every_configuration() {
    let data = text(70_000, 1);
    for mode in CompressionMode::ALL {
        for block_type in [BlockType::Default, BlockType::NoIntegrityCheck] {
            for shape in SHAPES {
                let config = EncoderConfig::new(mode)
                    .with_block_type(block_type)
                    .with_output_shape(shape);
                let compressed = encode(config, &data);
                let decoded = decode(DecoderConfig::from(&config), &compressed).unwrap();
                assert_eq!(decoded, data, "{mode:?} {block_type:?} {shape:?}");
            }
        }
    }
}

#[test]
fn test_small_lengths() {
    for mode in CompressionMode::ALL {
        for len in 0..=40 {
            let data = random(len, len as u64);
            let config = EncoderConfig::new(mode);
            let compressed = encode(config, &data);
            assert_eq!(
                decode(DecoderConfig::default(), &compressed).unwrap(),
                data,
                "{mode:?} len {len}"
            );
        }
    }
}

#[test]
fn test_multi_block_streams() {
    // Several full kernel blocks and several copy blocks.
    let data = text(700_000, 2);
    for mode in CompressionMode::ALL {
        let config = EncoderConfig::new(mode);
        let compressed = encode(config, &data);
        assert_eq!(decode(DecoderConfig::default(), &compressed).unwrap(), data, "{mode:?}");
    }
}

#[test]
fn test_dictionary_reset_cycle() {
    let data = text(600_000, 3);
    let plain = EncoderConfig::new(CompressionMode::Mandala);
    let cycled = plain.with_reset_cycle_shift(1);

    let without = encode(plain, &data);
    let with = encode(cycled, &data);
    // A cleared dictionary has to relearn every phrase.
    assert!(with.len() > without.len());
    assert_eq!(decode(DecoderConfig::default(), &with).unwrap(), data);

    let chameleon = EncoderConfig::new(CompressionMode::Chameleon).with_reset_cycle_shift(1);
    let compressed = encode(chameleon, &data);
    assert_eq!(decode(DecoderConfig::default(), &compressed).unwrap(), data);
}

#[test]
fn test_headerless_reset_cycle_from_fallback() {
    let data = text(600_000, 4);
    let config = EncoderConfig::new(CompressionMode::Mandala)
        .with_output_shape(OutputShape::WithoutHeader)
        .with_reset_cycle_shift(1);
    let compressed = encode(config, &data);
    assert_eq!(decode(DecoderConfig::from(&config), &compressed).unwrap(), data);
}

#[test]
fn test_binary_patterns() {
    let mut data = Vec::new();
    for i in 0..20_000u32 {
        data.extend_from_slice(&(i % 97).to_le_bytes());
    }
    data.extend_from_slice(&[0xff; 5]);
    for mode in CompressionMode::ALL {
        let compressed = encode(EncoderConfig::new(mode), &data);
        assert_eq!(decode(DecoderConfig::default(), &compressed).unwrap(), data);
    }
}
