//! Tests for the PPP FCS-16 implementation
//!
//! Verifies the CRC against the RFC 1662 / CRC-16/X-25 reference values and
//! the good-FCS property used to check whole frames.

use sunnyboy_rs::constants::{PPP_GOODFCS16, PPP_INITFCS16};
use sunnyboy_rs::sunnyboy::crc::{crc16, frame_check_sequence, verify_frame_check_sequence};

#[test]
fn test_empty_range() {
    assert_eq!(crc16(PPP_INITFCS16, &[]), PPP_INITFCS16);
}

#[test]
fn test_x25_check_value() {
    // The X-25 / PPP FCS-16 check value for "123456789" is 0x906E.
    assert_eq!(crc16(PPP_INITFCS16, b"123456789") ^ 0xFFFF, 0x906E);
}

#[test]
fn test_fcs_bytes_are_complemented_lsb_first() {
    assert_eq!(frame_check_sequence(b"123456789"), [0x6E, 0x90]);
}

#[test]
fn test_single_byte_is_deterministic_and_verifiable() {
    let data = [0x7E];
    assert_eq!(crc16(PPP_INITFCS16, &data), crc16(PPP_INITFCS16, &data));

    let mut frame = data.to_vec();
    frame.extend_from_slice(&frame_check_sequence(&data));
    assert_eq!(crc16(PPP_INITFCS16, &frame), PPP_GOODFCS16);
}

#[test]
fn test_incremental_equals_one_shot() {
    let data = b"sunny boy frame body";
    let (head, tail) = data.split_at(7);
    let incremental = crc16(crc16(PPP_INITFCS16, head), tail);
    assert_eq!(incremental, crc16(PPP_INITFCS16, data));
}

#[test]
fn test_good_fcs_survives_verification_helper() {
    let body = [0x7E, 0xFF, 0x03, 0x60, 0x65, 0x09, 0xA0, 0xFF, 0xFF];
    let mut frame = body.to_vec();
    frame.extend_from_slice(&frame_check_sequence(&body));
    assert!(verify_frame_check_sequence(&frame));

    frame[3] ^= 0x01;
    assert!(!verify_frame_check_sequence(&frame));
}
