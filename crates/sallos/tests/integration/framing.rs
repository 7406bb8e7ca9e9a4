//! Stream layout: one container header, block sequence, footers.

use sallos::block::{BLOCK_FOOTER_SIZE, PREFERRED_COPY_BLOCK_SIZE};
use sallos::container::{CONTAINER_FOOTER_SIZE, CONTAINER_HEADER_SIZE};
use sallos::{
    BlockType, CompressionMode, ContainerFooter, ContainerHeader, DecoderConfig, EncoderConfig,
    Error, FORMAT_VERSION,
};
use sallos_core::BlockMode;

use super::common::{decode, encode, init_tracing, random};

/// Walk a copy-mode stream, returning the payload length of every block.
fn copy_blocks(stream: &[u8], footer: usize) -> Vec<usize> {
    let body = &stream[CONTAINER_HEADER_SIZE..stream.len() - CONTAINER_FOOTER_SIZE];
    let mut blocks = Vec::new();
    let mut at = 0;
    while at < body.len() {
        assert_eq!(body[at], blocks.len() as u8, "block header sequence");
        assert_eq!(body[at + 1], BlockMode::Copy.marker());
        let payload = (body.len() - at - 2 - footer).min(PREFERRED_COPY_BLOCK_SIZE);
        blocks.push(payload);
        at += 2 + payload + footer;
    }
    assert_eq!(at, body.len());
    blocks
}

#[test]
fn test_copy_stream_layout() {
    let len = 3 * PREFERRED_COPY_BLOCK_SIZE + 100;
    let data = random(len, 30);
    for block_type in [BlockType::Default, BlockType::NoIntegrityCheck] {
        let config = EncoderConfig::new(CompressionMode::Copy).with_block_type(block_type);
        let stream = encode(config, &data);
        let footer = if block_type == BlockType::Default {
            BLOCK_FOOTER_SIZE
        } else {
            0
        };
        let blocks = copy_blocks(&stream, footer);
        assert_eq!(
            blocks,
            vec![
                PREFERRED_COPY_BLOCK_SIZE,
                PREFERRED_COPY_BLOCK_SIZE,
                PREFERRED_COPY_BLOCK_SIZE,
                100
            ]
        );
    }
}

#[test]
fn test_single_container_header_and_footer() {
    let data = random(1000, 31);
    let config = EncoderConfig::new(CompressionMode::Chameleon).with_reset_cycle_shift(5);
    let stream = encode(config, &data);

    let mut header = [0u8; CONTAINER_HEADER_SIZE];
    header.copy_from_slice(&stream[..CONTAINER_HEADER_SIZE]);
    let header = ContainerHeader::parse(&header).unwrap();
    assert_eq!(header.version, FORMAT_VERSION);
    assert_eq!(header.mode, CompressionMode::Chameleon);
    assert_eq!(header.block_type, BlockType::Default);
    assert_eq!(header.parameters.reset_cycle_shift(), 5);

    // The first block follows the header directly.
    assert_eq!(stream[CONTAINER_HEADER_SIZE], 0);
    assert_eq!(stream[CONTAINER_HEADER_SIZE + 1], BlockMode::Kernel.marker());

    let footer = ContainerFooter::from_stream_end(&stream).unwrap();
    assert_eq!(footer.total_uncompressed, 1000);
}

#[test]
fn test_block_checksum_detects_corruption() {
    init_tracing();
    let data = random(10_000, 32);
    let config = EncoderConfig::new(CompressionMode::Copy);
    let mut stream = encode(config, &data);
    stream[CONTAINER_HEADER_SIZE + 2 + 5000] ^= 0x80;
    assert!(matches!(
        decode(DecoderConfig::default(), &stream),
        Err(Error::ChecksumMismatch { block: 0, .. })
    ));
}

#[test]
fn test_corrupted_footer_value() {
    let data = random(100, 33);
    let mut stream = encode(EncoderConfig::new(CompressionMode::Copy), &data);
    let footer_at = stream.len() - CONTAINER_FOOTER_SIZE - BLOCK_FOOTER_SIZE;
    stream[footer_at] ^= 0xff;
    assert!(matches!(
        decode(DecoderConfig::default(), &stream),
        Err(Error::ChecksumMismatch { .. })
    ));
}

#[test]
fn test_kernel_corruption_is_reported() {
    let data = super::common::text(20_000, 34);
    let stream = encode(EncoderConfig::default(), &data);
    for offset in [CONTAINER_HEADER_SIZE + 2, stream.len() / 2, stream.len() - 30] {
        let mut corrupted = stream.clone();
        corrupted[offset] ^= 0x10;
        assert!(
            decode(DecoderConfig::default(), &corrupted).is_err(),
            "corruption at {offset} went unnoticed"
        );
    }
}

#[test]
fn test_truncated_stream() {
    let data = random(5000, 35);
    let stream = encode(EncoderConfig::default(), &data);
    for cut in [1, 10, 100, stream.len() / 2] {
        assert!(decode(DecoderConfig::default(), &stream[..stream.len() - cut]).is_err());
    }
}
