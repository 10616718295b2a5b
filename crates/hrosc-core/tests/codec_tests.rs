//! Codec tests for HROSC core
//!
//! Byte-exact checks against hand-computed layouts, plus decoding through
//! `rosc` as an independent OSC implementation.

use hrosc_core::codec::{self, hex_dump, padded_len};
use hrosc_core::{encode, pad_string, Error, OscArgument, OscMessage};
use hrosc_test_utils::decode_single;
use rosc::OscType;

#[test]
fn test_encode_float_heart_rate() {
    let encoded = encode("/hrtest", ",f", OscArgument::Float32(72.0)).expect("encode failed");

    assert_eq!(
        encoded.as_ref(),
        &[
            0x2F, 0x68, 0x72, 0x74, 0x65, 0x73, 0x74, 0x00, // "/hrtest" + NUL
            0x2C, 0x66, 0x00, 0x00, // ",f" + padding
            0x42, 0x90, 0x00, 0x00, // 72.0f32 big-endian
        ]
    );
    assert_eq!(encoded.len(), 16);
}

#[test]
fn test_encode_int_heart_rate() {
    let encoded = encode("/hrtest", ",i", OscArgument::Int32(72)).expect("encode failed");

    assert_eq!(&encoded[8..12], &[0x2C, 0x69, 0x00, 0x00]);
    assert!(encoded.ends_with(&[0x00, 0x00, 0x00, 0x48]));
    assert_eq!(encoded.len(), 16);
}

#[test]
fn test_encode_negative_int_twos_complement() {
    let encoded = encode("/delta", ",i", OscArgument::Int32(-2)).expect("encode failed");
    assert!(encoded.ends_with(&[0xFF, 0xFF, 0xFF, 0xFE]));
}

#[test]
fn test_encode_aligned_address_gets_terminator_block() {
    // "/bpm" is exactly 4 bytes, so a whole extra block of NULs follows
    let encoded = encode("/bpm", ",f", OscArgument::Float32(1.0)).expect("encode failed");

    assert_eq!(&encoded[..8], b"/bpm\0\0\0\0");
    assert_eq!(encoded.len(), 16);
}

#[test]
fn test_encode_missing_slash() {
    let err = encode("hrtest", ",f", OscArgument::Float32(72.0)).unwrap_err();
    assert!(matches!(err, Error::InvalidAddress(_)));
}

#[test]
fn test_encode_bad_type_tag() {
    let err = encode("/hrtest", "f", OscArgument::Float32(72.0)).unwrap_err();
    assert!(matches!(err, Error::InvalidTypeTag(_)));

    let err = encode("/hrtest", ",s", OscArgument::Float32(72.0)).unwrap_err();
    assert!(matches!(err, Error::InvalidTypeTag(_)));
}

#[test]
fn test_address_checked_before_type_tag() {
    let err = encode("hrtest", "f", OscArgument::Float32(72.0)).unwrap_err();
    assert!(matches!(err, Error::InvalidAddress(_)));
}

#[test]
fn test_encode_non_ascii_address() {
    let err = encode("/pulsé", ",f", OscArgument::Float32(72.0)).unwrap_err();
    assert!(matches!(err, Error::InvalidEncoding(_)));
}

#[test]
fn test_pad_properties_for_all_lengths() {
    let source = "/avatar/parameters/Heartrate/with/a/rather/long/suffix/abcdefghijklmnop";

    for len in 0..=source.len() {
        let s = &source[..len];
        let padded = pad_string(s).expect("ASCII input must pad");

        assert_eq!(padded.len() % 4, 0, "length {} not aligned", len);
        assert!(padded.len() >= s.len() + 1, "no terminator for length {}", len);
        assert_eq!(padded.len(), padded_len(len));
        assert!(padded.len() - s.len() <= 4);
        assert_eq!(&padded[..len], s.as_bytes());
        assert!(padded[len..].iter().all(|&b| b == 0));
    }
}

#[test]
fn test_total_length_always_aligned() {
    let source = "/abcdefghijklmnopqrstuvwxyz0123456789";

    for len in 1..=source.len() {
        let addr = &source[..len];
        let float = encode(addr, ",f", OscArgument::Float32(60.5)).unwrap();
        let int = encode(addr, ",i", OscArgument::Int32(60)).unwrap();

        assert_eq!(float.len() % 4, 0);
        assert_eq!(int.len() % 4, 0);
        assert_eq!(float.len(), padded_len(len) + 4 + 4);
    }
}

#[test]
fn test_roundtrip_float_through_rosc() {
    for value in [0.0f32, 72.0, 58.25, -1.5, f32::MAX, f32::MIN_POSITIVE, 1e-40] {
        let encoded = encode("/avatar/parameters/Heartrate", ",f", value.into()).unwrap();
        let (addr, arg) = decode_single(&encoded);

        assert_eq!(addr, "/avatar/parameters/Heartrate");
        match arg {
            OscType::Float(v) => assert_eq!(v.to_bits(), value.to_bits()),
            other => panic!("Expected Float, got {:?}", other),
        }
    }
}

#[test]
fn test_roundtrip_int_through_rosc() {
    for value in [0i32, 72, -72, i32::MAX, i32::MIN] {
        let encoded = encode("/hr", ",i", value.into()).unwrap();
        let (addr, arg) = decode_single(&encoded);

        assert_eq!(addr, "/hr");
        match arg {
            OscType::Int(v) => assert_eq!(v, value),
            other => panic!("Expected Int, got {:?}", other),
        }
    }
}

#[test]
fn test_roundtrip_preserves_nan_bits() {
    let value = f32::from_bits(0x7FC0_0001);
    let encoded = encode("/hrtest", ",f", value.into()).unwrap();

    assert!(encoded.ends_with(&0x7FC0_0001u32.to_be_bytes()));
}

#[test]
fn test_encode_message_matches_encode() {
    let msg = OscMessage::for_argument("/hrtest", 72.0f32).unwrap();
    let direct = encode("/hrtest", ",f", OscArgument::Float32(72.0)).unwrap();

    assert_eq!(codec::encode_message(&msg), direct);
    assert_eq!(msg.encode(), direct);
}

#[test]
fn test_encode_is_deterministic() {
    let a = encode("/hrtest", ",f", OscArgument::Float32(88.8)).unwrap();
    let b = encode("/hrtest", ",f", OscArgument::Float32(88.8)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_hex_dump_of_encoded_message() {
    let encoded = encode("/hrtest", ",f", OscArgument::Float32(72.0)).unwrap();
    assert_eq!(
        hex_dump(&encoded),
        "2F 68 72 74 65 73 74 00 2C 66 00 00 42 90 00 00"
    );
}
