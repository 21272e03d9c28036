//! Tests for macro resolution and frame building
//!
//! Resolution must be deterministic against a fixed session state, honor the
//! protocol's wire byte orders, and fold the FCS over the post-header region.

use sunnyboy_rs::constants::{CRC_HEADER_OFFSET, PPP_GOODFCS16, PPP_INITFCS16};
use sunnyboy_rs::sunnyboy::codec::unescape_frame;
use sunnyboy_rs::sunnyboy::crc::{crc16, frame_check_sequence};
use sunnyboy_rs::sunnyboy::frame::{build_frame, stuff_frame};
use sunnyboy_rs::sunnyboy::script::Token;
use sunnyboy_rs::{BtAddress, SerialNumber, SessionState, SunnyBoyError};

fn test_state() -> SessionState {
    SessionState::new(
        "00:80:25:A6:77:60".parse::<BtAddress>().unwrap(),
        "7E:F9:04:9F".parse::<SerialNumber>().unwrap(),
    )
}

#[test]
fn test_peer_address_resolves_lsb_first() {
    let frame = build_frame(&[Token::PeerAddress], &test_state(), 0).unwrap();
    assert_eq!(frame, vec![0x60, 0x77, 0xA6, 0x25, 0x80, 0x00]);
}

#[test]
fn test_serial_resolves_reversed() {
    let frame = build_frame(&[Token::Serial], &test_state(), 0).unwrap();
    assert_eq!(frame, vec![0x9F, 0x04, 0xF9, 0x7E]);
}

#[test]
fn test_resolution_is_deterministic() {
    let tokens = [
        Token::Literal(0x7E),
        Token::PeerAddress,
        Token::Serial,
        Token::Timestamp,
    ];
    let a = build_frame(&tokens, &test_state(), 0x1234_5678).unwrap();
    let b = build_frame(&tokens, &test_state(), 0x1234_5678).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_learned_macros_require_session_state() {
    let mut state = test_state();
    assert!(matches!(
        build_frame(&[Token::LocalAddress], &state, 0),
        Err(SunnyBoyError::SessionState(_))
    ));
    assert!(matches!(
        build_frame(&[Token::Channel], &state, 0),
        Err(SunnyBoyError::SessionState(_))
    ));

    state.local_address = Some([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
    state.channel = Some(0x04);
    let frame = build_frame(&[Token::LocalAddress, Token::Channel], &state, 0).unwrap();
    assert_eq!(frame, vec![0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x04]);
}

#[test]
fn test_crc_covers_from_header_offset() {
    // 19 header literals, then addressing, then the FCS.
    let mut tokens: Vec<Token> = (0..CRC_HEADER_OFFSET as u8).map(Token::Literal).collect();
    tokens.push(Token::PeerAddress);
    tokens.push(Token::Serial);
    tokens.push(Token::Crc);

    let frame = build_frame(&tokens, &test_state(), 0).unwrap();
    assert_eq!(frame.len(), CRC_HEADER_OFFSET + 6 + 4 + 2);
    // Running the FCS over the covered region including the appended FCS
    // bytes must land on the RFC 1662 good-FCS constant.
    assert_eq!(
        crc16(PPP_INITFCS16, &frame[CRC_HEADER_OFFSET..]),
        PPP_GOODFCS16
    );
}

#[test]
fn test_literal_delimiter_flags_stay_raw() {
    let tokens = [Token::Literal(0x7E), Token::Literal(0x12), Token::Literal(0x7E)];
    let frame = build_frame(&tokens, &test_state(), 0).unwrap();
    assert_eq!(stuff_frame(&tokens, &frame), vec![0x7E, 0x12, 0x7E]);
}

#[test]
fn test_serial_byte_at_frame_end_is_stuffed() {
    // The serial's wire form ends in 0x7E. As the last frame byte it is
    // data, not a delimiter, and must go out as 7D 5E.
    let tokens = [Token::Literal(0x7E), Token::Serial];
    let frame = build_frame(&tokens, &test_state(), 0).unwrap();
    assert_eq!(frame, vec![0x7E, 0x9F, 0x04, 0xF9, 0x7E]);

    let wire = stuff_frame(&tokens, &frame);
    assert_eq!(wire, vec![0x7E, 0x9F, 0x04, 0xF9, 0x7D, 0x5E]);
    assert_eq!(unescape_frame(&wire).unwrap(), frame);
}

#[test]
fn test_crc_byte_equal_to_flag_is_stuffed() {
    // $CRC is always the last token, so an FCS high byte of 0x7E lands in
    // the final frame position. Two covered payload bytes determine the FCS
    // completely, so the 16-bit search space always contains such a case.
    let payload = (0..=u16::MAX)
        .map(u16::to_le_bytes)
        .find(|p| frame_check_sequence(p)[1] == 0x7E)
        .unwrap();

    let mut tokens = vec![Token::Literal(0x7E)];
    tokens.extend((1..CRC_HEADER_OFFSET).map(|_| Token::Literal(0x00)));
    tokens.push(Token::Literal(payload[0]));
    tokens.push(Token::Literal(payload[1]));
    tokens.push(Token::Crc);

    let frame = build_frame(&tokens, &test_state(), 0).unwrap();
    assert_eq!(*frame.last().unwrap(), 0x7E);

    let wire = stuff_frame(&tokens, &frame);
    assert_eq!(wire[0], 0x7E);
    assert_eq!(&wire[wire.len() - 2..], &[0x7D, 0x5E]);
    assert_eq!(unescape_frame(&wire).unwrap(), frame);
}

#[test]
fn test_crc_on_short_frame_is_an_error() {
    let tokens = [Token::Literal(0x7E), Token::Crc];
    assert!(matches!(
        build_frame(&tokens, &test_state(), 0),
        Err(SunnyBoyError::SessionState(_))
    ));
}
