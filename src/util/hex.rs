//! # Hex Encoding/Decoding Utilities
//!
//! Hex helpers used throughout the Sunny Boy protocol implementation: script
//! hex literals, colon-separated address strings, and compact hex dumps for
//! debug logging.

use thiserror::Error;

/// Errors that can occur during hex operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    #[error("Invalid hex byte: {0:?}")]
    InvalidByte(String),

    #[error("Expected {expected} colon-separated hex bytes, got {got}")]
    WrongGroupCount { expected: usize, got: usize },

    #[error("Empty hex string")]
    EmptyString,
}

/// Parse a single two-digit hex byte, as used for script literals.
///
/// Accepts upper- and lowercase digits; anything that is not exactly two
/// hex digits is rejected.
pub fn hex_byte(token: &str) -> Result<u8, HexError> {
    match hex::decode(token) {
        Ok(bytes) if bytes.len() == 1 => Ok(bytes[0]),
        _ => Err(HexError::InvalidByte(token.to_string())),
    }
}

/// Parse a colon-separated hex byte string such as `00:80:25:A6:77:60`.
///
/// The number of groups must match `expected`; each group is one hex byte.
/// Bytes are returned in textual order.
pub fn parse_colon_hex(s: &str, expected: usize) -> Result<Vec<u8>, HexError> {
    if s.is_empty() {
        return Err(HexError::EmptyString);
    }
    let groups: Vec<&str> = s.split(':').collect();
    if groups.len() != expected {
        return Err(HexError::WrongGroupCount {
            expected,
            got: groups.len(),
        });
    }
    groups.iter().map(|g| hex_byte(g)).collect()
}

/// Format hex data for compact display (useful for logs)
///
/// Formats data as `7e 31 a0 68` with spaces between bytes.
pub fn format_hex_compact(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a byte sequence as an uppercase colon-separated address string.
pub fn format_colon_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_byte() {
        assert_eq!(hex_byte("7E").unwrap(), 0x7E);
        assert_eq!(hex_byte("ff").unwrap(), 0xFF);
        assert_eq!(hex_byte("00").unwrap(), 0x00);
    }

    #[test]
    fn test_hex_byte_rejects_malformed() {
        assert!(hex_byte("G0").is_err());
        assert!(hex_byte("1").is_err());
        assert!(hex_byte("123").is_err());
        assert!(hex_byte("").is_err());
        assert!(hex_byte("+1").is_err());
    }

    #[test]
    fn test_parse_colon_hex() {
        let bytes = parse_colon_hex("00:80:25:A6:77:60", 6).unwrap();
        assert_eq!(bytes, vec![0x00, 0x80, 0x25, 0xA6, 0x77, 0x60]);
    }

    #[test]
    fn test_parse_colon_hex_group_count() {
        assert_eq!(
            parse_colon_hex("7E:F9:04", 4),
            Err(HexError::WrongGroupCount {
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_hex_compact(&[0x7E, 0x31, 0xA0]), "7e 31 a0");
        assert_eq!(format_hex_compact(&[]), "");
    }

    #[test]
    fn test_format_colon_hex() {
        assert_eq!(format_colon_hex(&[0x7E, 0xF9, 0x04, 0x9F]), "7E:F9:04:9F");
    }
}
