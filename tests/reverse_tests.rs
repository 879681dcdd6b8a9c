//! Tests for in-place byte order conversion

mod common;

use common::*;
use na_byml::{
    BigEndian, Byml, Endianness, Error, HashMap32, LittleEndian, NodeType, ReverseReader,
    endianness_of, normalize, reverse_node,
};

fn mixed_document(big: bool) -> Vec<u8> {
    document(big, &["alpha", "beta"], |w| {
        let long = wide(w, 0x0102_0304_0506_0708);
        let double = wide(w, 1.5f64.to_bits());
        let bin = binary(w, &[9, 8, 7]);
        let inner = hash_map(
            w,
            &[
                (0xAABB_CCDD, NodeType::Int64, long as i32),
                (0x1122_3344, NodeType::String, 1),
            ],
        );
        hash_map(
            w,
            &[
                (0x0000_0001, NodeType::Int, -2),
                (0x0000_0002, NodeType::HashMap32, inner as i32),
                (0x0000_0003, NodeType::Double, double as i32),
                (0x0000_0004, NodeType::Binary, bin as i32),
                (0x0000_0005, NodeType::Float, 3.25f32.to_bits() as i32),
                (0x0000_0006, NodeType::Bool, 1),
            ],
        )
    })
}

#[test]
fn test_normalize_matches_native_build() {
    let mut data = mixed_document(false);
    let expected = mixed_document(true);
    assert_ne!(data, expected);

    assert!(normalize::<BigEndian>(&mut data).unwrap());
    assert_eq!(data, expected);

    let doc = Byml::<BigEndian>::new(&data).unwrap();
    assert_eq!(doc.string(1).unwrap(), "beta");
}

#[test]
fn test_normalize_both_directions() {
    let mut data = mixed_document(true);
    assert!(normalize::<LittleEndian>(&mut data).unwrap());
    assert_eq!(data, mixed_document(false));
}

#[test]
fn test_normalize_twice_restores_original() {
    let original = mixed_document(false);
    let mut data = original.clone();

    assert!(normalize::<BigEndian>(&mut data).unwrap());
    assert!(normalize::<LittleEndian>(&mut data).unwrap());
    assert_eq!(data, original);
}

#[test]
fn test_normalize_in_order_is_noop() {
    let original = mixed_document(false);
    let mut data = original.clone();

    assert!(!normalize::<LittleEndian>(&mut data).unwrap());
    assert_eq!(data, original);
}

#[test]
fn test_normalized_yaml_is_identical() {
    let little = mixed_document(false);
    let mut big = little.clone();
    normalize::<BigEndian>(&mut big).unwrap();

    let little_yaml = Byml::<LittleEndian>::new(&little)
        .unwrap()
        .to_yaml()
        .unwrap();
    let big_yaml = Byml::<BigEndian>::new(&big).unwrap().to_yaml().unwrap();
    assert_eq!(little_yaml, big_yaml);
    assert!(little_yaml.contains("0xaabbccdd: !l 72623859790382856"));
    assert!(little_yaml.contains("0x11223344: beta"));
}

#[test]
fn test_entry_halves_flip_independently() {
    let mut data = vec![0x20, 0x01, 0x00, 0x00];
    data.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
    data.extend_from_slice(&[NodeType::Int as u8, 0xEE]);

    let mut reader = ReverseReader::<BigEndian>::new(&mut data);
    HashMap32::reverse(&mut reader, 0, 1).unwrap();

    assert_eq!(
        data,
        vec![
            0x20, 0x01, 0x00, 0x00, // header is not touched here
            4, 3, 2, 1, 8, 7, 6, 5, // each half reversed on its own
            NodeType::Int as u8, 0xEE, // type bytes unchanged
        ]
    );
}

#[test]
fn test_reverse_recurses_into_nested_payloads() {
    let mut data = Vec::new();
    // root map at 0 with one entry pointing at the inner map at 16
    data.extend_from_slice(&[0x20, 0x01, 0x00, 0x00]);
    data.extend_from_slice(&[0x01, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00]);
    data.extend_from_slice(&[NodeType::HashMap32 as u8, 0x00, 0x00, 0x00]);
    // inner map at 16 with one Int64 entry pointing at 32
    data.extend_from_slice(&[0x20, 0x01, 0x00, 0x00]);
    data.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x20, 0x00, 0x00, 0x00]);
    data.extend_from_slice(&[NodeType::Int64 as u8, 0x00, 0x00, 0x00]);
    // payload at 32
    data.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);

    let original = data.clone();
    let mut reader = ReverseReader::<BigEndian>::new(&mut data);
    reverse_node(&mut reader, 0, NodeType::HashMap32 as u8).unwrap();

    assert_eq!(&data[0..4], &[0x20, 0x00, 0x00, 0x01]);
    assert_eq!(&data[4..12], &[0, 0, 0, 1, 0, 0, 0, 0x10]);
    assert_eq!(&data[16..20], &[0x20, 0x00, 0x00, 0x01]);
    assert_eq!(&data[20..28], &[0, 0, 0, 2, 0, 0, 0, 0x20]);
    assert_eq!(&data[32..40], &[8, 7, 6, 5, 4, 3, 2, 1]);
    assert_eq!(data[12], original[12]);
    assert_eq!(data[28], original[28]);

    let mut reader = ReverseReader::<LittleEndian>::new(&mut data);
    reverse_node(&mut reader, 0, NodeType::HashMap32 as u8).unwrap();
    assert_eq!(data, original);
}

#[test]
fn test_shared_payload_flips_once() {
    let build = |big: bool| {
        document(big, &[], |w| {
            let shared = wide(w, 0x1122_3344_5566_7788);
            hash_map(
                w,
                &[
                    (1, NodeType::UInt64, shared as i32),
                    (2, NodeType::UInt64, shared as i32),
                ],
            )
        })
    };

    let mut data = build(false);
    normalize::<BigEndian>(&mut data).unwrap();
    assert_eq!(data, build(true));
}

#[test]
fn test_binary_aligned_header_flip() {
    let mut data = vec![
        0x03, 0x00, 0x00, 0x00, // length
        0x10, 0x00, 0x00, 0x00, // alignment
        0xAA, 0xBB, 0xCC, 0x00,
    ];
    let mut reader = ReverseReader::<BigEndian>::new(&mut data);
    reverse_node(&mut reader, 0, NodeType::BinaryAligned as u8).unwrap();
    assert_eq!(
        data,
        vec![0, 0, 0, 3, 0, 0, 0, 0x10, 0xAA, 0xBB, 0xCC, 0x00]
    );
}

#[test]
fn test_immediates_need_no_payload() {
    let mut data = vec![1, 2, 3, 4];
    let mut reader = ReverseReader::<BigEndian>::new(&mut data);
    for node_type in [
        NodeType::String,
        NodeType::Bool,
        NodeType::Int,
        NodeType::Float,
        NodeType::UInt32,
        NodeType::Null,
    ] {
        reverse_node(&mut reader, 0, node_type as u8).unwrap();
    }
    assert_eq!(data, vec![1, 2, 3, 4]);
}

#[test]
fn test_unsupported_containers() {
    let mut data = document(false, &[], |w| hash_map(w, &[(1, NodeType::Array, 0x40)]));
    assert_eq!(
        normalize::<BigEndian>(&mut data).unwrap_err(),
        Error::Unsupported(NodeType::Array)
    );

    let mut bytes = [0u8; 8];
    let mut reader = ReverseReader::<BigEndian>::new(&mut bytes);
    assert_eq!(
        reverse_node(&mut reader, 0, NodeType::HashMap64 as u8).unwrap_err(),
        Error::Unsupported(NodeType::HashMap64)
    );
}

#[test]
fn test_invalid_tag_during_reverse() {
    let mut bytes = [0u8; 8];
    let mut reader = ReverseReader::<BigEndian>::new(&mut bytes);
    assert_eq!(
        reverse_node(&mut reader, 0, 0x01).unwrap_err(),
        Error::InvalidNodeType(0x01)
    );
}

#[test]
fn test_truncated_entries_fail() {
    let mut data = vec![0x20, 0x02, 0x00, 0x00, 1, 2, 3, 4, 5, 6, 7, 8];
    let mut reader = ReverseReader::<BigEndian>::new(&mut data);
    assert!(matches!(
        HashMap32::reverse(&mut reader, 0, 2),
        Err(Error::OutOfBounds { .. })
    ));
}

#[test]
fn test_reader_primitives() {
    let mut data = vec![0x01, 0x02, 0x03, 0x04, 0x05];
    let mut reader = ReverseReader::<LittleEndian>::new(&mut data);
    assert_eq!(reader.read_u8(4).unwrap(), 0x05);
    assert!(reader.read_u8(5).is_err());
    assert_eq!(reader.read::<[u8; 2]>(1).unwrap(), [0x02, 0x03]);
    reader.reverse_bytes(0, 3).unwrap();
    assert_eq!(reader.data(), &[0x03, 0x02, 0x01, 0x04, 0x05]);
    assert!(reader.reverse_bytes(3, 3).is_err());
    assert!(reader.visit(8));
    assert!(!reader.visit(8));
}

#[test]
fn test_endianness_detection() {
    assert_eq!(
        endianness_of(&mixed_document(true)).unwrap(),
        Endianness::Big
    );
    assert_eq!(
        endianness_of(&mixed_document(false)).unwrap(),
        Endianness::Little
    );
    assert_eq!(Endianness::of::<BigEndian>(), Endianness::Big);
    assert_eq!(Endianness::of::<LittleEndian>(), Endianness::Little);
}
