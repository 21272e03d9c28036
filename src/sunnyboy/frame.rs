//! # Frame Building and Macro Resolution
//!
//! Turns the token sequence of an `R` or `S` line into the concrete byte
//! buffer it stands for: the expected pattern of a wait, or the pre-stuffing
//! payload of a send. Macro tokens draw on the session state; `$CRC` folds
//! the frame check sequence over what has been resolved so far.

use bytes::BytesMut;

use crate::constants::{CRC_HEADER_OFFSET, FRAME_FLAG, MAX_FRAME_LEN};
use crate::error::SunnyBoyError;
use crate::sunnyboy::codec::escape_frame;
use crate::sunnyboy::crc::frame_check_sequence;
use crate::sunnyboy::script::Token;
use crate::sunnyboy::session::SessionState;

/// A growable frame buffer bounded at the protocol maximum of 1024 bytes.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: BytesMut,
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            buf: BytesMut::with_capacity(64),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Appends bytes, refusing to grow past [`MAX_FRAME_LEN`].
    pub fn extend(&mut self, bytes: &[u8]) -> Result<(), SunnyBoyError> {
        if self.buf.len() + bytes.len() > MAX_FRAME_LEN {
            return Err(SunnyBoyError::FrameTooLong {
                len: self.buf.len() + bytes.len(),
                max: MAX_FRAME_LEN,
            });
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

/// Resolves one token against the session state, appending its expansion.
///
/// `epoch` is the time the `$TIME` macro stamps into the frame, passed in so
/// frame building stays deterministic under test.
fn resolve_token(
    buf: &mut FrameBuffer,
    token: Token,
    state: &SessionState,
    epoch: u32,
) -> Result<(), SunnyBoyError> {
    match token {
        Token::PeerAddress => buf.extend(&state.peer_address.wire_bytes()),
        Token::LocalAddress => {
            let addr = state.local_address.ok_or_else(|| {
                SunnyBoyError::SessionState(
                    "$ADD2 used before the local address was extracted".into(),
                )
            })?;
            buf.extend(&addr)
        }
        Token::Serial => buf.extend(&state.serial.wire_bytes()),
        // The protocol renders the epoch as 8 hex digits taken in reverse
        // byte-pair order, which is exactly the little-endian byte order.
        Token::Timestamp => buf.extend(&epoch.to_le_bytes()),
        Token::Channel => {
            let chan = state.channel.ok_or_else(|| {
                SunnyBoyError::SessionState("$CHAN used before the channel was extracted".into())
            })?;
            buf.extend(&[chan])
        }
        Token::Crc => {
            if buf.len() < CRC_HEADER_OFFSET {
                return Err(SunnyBoyError::SessionState(format!(
                    "$CRC needs at least {CRC_HEADER_OFFSET} header bytes, frame has {}",
                    buf.len()
                )));
            }
            let fcs = frame_check_sequence(&buf.as_slice()[CRC_HEADER_OFFSET..]);
            buf.extend(&fcs)
        }
        Token::Literal(byte) => buf.extend(&[byte]),
    }
}

/// Resolves a full token sequence into a frame buffer.
///
/// Used for both the expected pattern of a wait and the outgoing payload of
/// a send; stuffing is applied afterwards by the codec for sends only.
pub fn build_frame(
    tokens: &[Token],
    state: &SessionState,
    epoch: u32,
) -> Result<Vec<u8>, SunnyBoyError> {
    let mut buf = FrameBuffer::new();
    for &token in tokens {
        resolve_token(&mut buf, token, state, epoch)?;
    }
    Ok(buf.into_vec())
}

/// Byte-stuffs a resolved send frame for the wire.
///
/// Boundary flags are decided by token provenance, not byte position: only a
/// literal `7E` token at the very start or end of the line is a frame
/// delimiter and stays raw. A computed byte that resolves to `0x7E` in those
/// positions, such as the FCS high byte or the serial's last wire byte, is
/// stuffed like any other occurrence.
pub fn stuff_frame(tokens: &[Token], frame: &[u8]) -> Vec<u8> {
    let lead = usize::from(tokens.first() == Some(&Token::Literal(FRAME_FLAG)));
    let trail =
        usize::from(tokens.len() > 1 && tokens.last() == Some(&Token::Literal(FRAME_FLAG)));
    let body_end = frame.len() - trail;
    let mut wire = frame[..lead].to_vec();
    wire.extend(escape_frame(&frame[lead..body_end]));
    wire.extend_from_slice(&frame[body_end..]);
    wire
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sunnyboy::addr::{BtAddress, SerialNumber};

    fn state() -> SessionState {
        SessionState::new(
            "00:80:25:A6:77:60".parse::<BtAddress>().unwrap(),
            "7E:F9:04:9F".parse::<SerialNumber>().unwrap(),
        )
    }

    #[test]
    fn timestamp_resolves_little_endian() {
        let frame = build_frame(&[Token::Timestamp], &state(), 0x66D0_ABCD).unwrap();
        assert_eq!(frame, vec![0xCD, 0xAB, 0xD0, 0x66]);
    }

    #[test]
    fn local_address_before_learning_is_a_state_error() {
        let err = build_frame(&[Token::LocalAddress], &state(), 0).unwrap_err();
        assert!(matches!(err, SunnyBoyError::SessionState(_)));
    }

    #[test]
    fn frame_buffer_is_bounded() {
        let mut buf = FrameBuffer::new();
        buf.extend(&[0u8; MAX_FRAME_LEN]).unwrap();
        assert!(matches!(
            buf.extend(&[0u8]),
            Err(SunnyBoyError::FrameTooLong { .. })
        ));
    }
}
