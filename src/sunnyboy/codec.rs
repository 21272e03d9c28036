//! # Frame Codec
//!
//! HDLC-style byte stuffing for the Sunny Boy Bluetooth link. The reserved
//! bytes are `0x7E` (frame boundary flag) and `0x7D` (control escape); any
//! occurrence of either inside a frame is sent as `0x7D` followed by the
//! byte XOR `0x20`.
//!
//! The codec works on frame bodies only. Genuine boundary flags never enter
//! it: the frame layer keeps script-literal delimiters outside the slice it
//! passes (see `frame::stuff_frame`), so a data byte equal to the flag is
//! always stuffed, wherever it falls.

use crate::constants::{ESCAPE_XOR, FRAME_ESCAPE, FRAME_FLAG};
use crate::error::SunnyBoyError;

/// Byte-stuffs an outgoing frame body.
///
/// Every flag and escape byte in the input is escaped.
pub fn escape_frame(frame: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(frame.len() + frame.len() / 4);
    for &byte in frame {
        if byte == FRAME_FLAG || byte == FRAME_ESCAPE {
            out.push(FRAME_ESCAPE);
            out.push(byte ^ ESCAPE_XOR);
        } else {
            out.push(byte);
        }
    }
    out
}

/// Reverses byte stuffing on a raw chunk read from the transport.
///
/// When the escape byte is seen, it and the following byte are consumed and
/// replaced by one decoded byte: `0x5E -> 0x7E`, `0x5D -> 0x7D`, anything
/// else XOR `0x20`. An escape byte with nothing after it means the frame was
/// truncated and is reported as [`SunnyBoyError::MalformedFrame`].
pub fn unescape_frame(raw: &[u8]) -> Result<Vec<u8>, SunnyBoyError> {
    let mut out = Vec::with_capacity(raw.len());
    let mut iter = raw.iter();
    while let Some(&byte) = iter.next() {
        if byte == FRAME_ESCAPE {
            let escaped = iter.next().ok_or_else(|| {
                SunnyBoyError::MalformedFrame("dangling escape byte at end of input".into())
            })?;
            out.push(match escaped {
                0x5E => FRAME_FLAG,
                0x5D => FRAME_ESCAPE,
                other => other ^ ESCAPE_XOR,
            });
        } else {
            out.push(byte);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_reserved_bytes_are_stuffed() {
        assert_eq!(escape_frame(&[0x01, 0x7E, 0x02]), vec![0x01, 0x7D, 0x5E, 0x02]);
        assert_eq!(escape_frame(&[0x01, 0x7D, 0x02]), vec![0x01, 0x7D, 0x5D, 0x02]);
    }

    #[test]
    fn flag_bytes_are_stuffed_at_every_position() {
        assert_eq!(escape_frame(&[0x7E]), vec![0x7D, 0x5E]);
        assert_eq!(
            escape_frame(&[0x7E, 0x00, 0x7E]),
            vec![0x7D, 0x5E, 0x00, 0x7D, 0x5E]
        );
    }

    #[test]
    fn dangling_escape_is_an_error() {
        assert!(matches!(
            unescape_frame(&[0x01, 0x7D]),
            Err(SunnyBoyError::MalformedFrame(_))
        ));
    }
}
