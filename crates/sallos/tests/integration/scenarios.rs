//! Fixed scenarios with known stream contents.

use sallos::container::{CONTAINER_FOOTER_SIZE, CONTAINER_HEADER_SIZE};
use sallos::{CompressionMode, DecoderConfig, Encoder, EncoderConfig};
use sallos_core::{BlockMode, InputCursor, OutputCursor, Status};
use sallos_kernel::mandala::{FLAG_LITERAL, FLAG_PREDICTED};
use sallos_kernel::{Algorithm, Mandala};

use super::common::{decode, encode, random};

/// Container header, block header, mode marker.
const FIRST_SIGNATURE: usize = CONTAINER_HEADER_SIZE + 2;

fn signature_at(stream: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&stream[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}

fn flag(signature: u64, index: usize) -> u8 {
    ((signature >> (index * Mandala::FLAG_BITS as usize)) & 0b11) as u8
}

#[test]
fn test_zeros_are_predicted() {
    let data = vec![0u8; 10_000];
    let compressed = encode(EncoderConfig::new(CompressionMode::Mandala), &data);
    assert!(compressed.len() < data.len());
    assert_eq!(compressed[CONTAINER_HEADER_SIZE + 1], BlockMode::Kernel.marker());

    // Every chunk of a full zero group is predicted, so groups are bare
    // signatures laid end to end.
    let signature = signature_at(&compressed, FIRST_SIGNATURE);
    for index in 0..Mandala::CHUNKS_PER_GROUP {
        assert_eq!(flag(signature, index), FLAG_PREDICTED);
    }
    assert_eq!(
        signature_at(&compressed, FIRST_SIGNATURE + 8),
        signature,
        "second group is also fully predicted"
    );

    assert_eq!(decode(DecoderConfig::default(), &compressed).unwrap(), data);
}

#[test]
fn test_ragged_tail_is_literal() {
    let data = random(31, 31);
    let compressed = encode(EncoderConfig::new(CompressionMode::Mandala), &data);

    // Seven whole chunks, then the three-byte tail under a literal flag.
    let signature = signature_at(&compressed, FIRST_SIGNATURE);
    assert_eq!(flag(signature, 7), FLAG_LITERAL);
    for index in 8..Mandala::CHUNKS_PER_GROUP {
        assert_eq!(flag(signature, index), 0, "unused slot {index}");
    }

    let trailer = 16 + CONTAINER_FOOTER_SIZE;
    let tail_end = compressed.len() - trailer;
    assert_eq!(&compressed[tail_end - 3..tail_end], &data[28..]);

    assert_eq!(decode(DecoderConfig::default(), &compressed).unwrap(), data);
}

#[test]
fn test_header_sized_output_stalls() {
    for mode in CompressionMode::ALL {
        let mut encoder = Encoder::new(EncoderConfig::new(mode)).unwrap();
        let data = random(1000, 5);
        let mut out = [0u8; CONTAINER_HEADER_SIZE];
        let mut input = InputCursor::new(&data);
        let mut output = OutputCursor::new(&mut out);
        assert_eq!(
            encoder.process(&mut input, &mut output, true).unwrap(),
            Status::StallOnOutput
        );
        assert_eq!(output.position(), CONTAINER_HEADER_SIZE);
        assert_eq!(input.position(), 0, "no payload before the block header is out");
    }
}
