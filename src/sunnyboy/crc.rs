//! # PPP FCS-16 Engine
//!
//! The 16-bit frame check sequence the Sunny Boy Bluetooth protocol appends
//! to outgoing frames. This is the PPP FCS-16 of RFC 1662 (CRC-CCITT with
//! reflected polynomial 0x8408): table driven, initial value `0xFFFF`,
//! complemented before it goes on the wire, least-significant byte first.

use once_cell::sync::Lazy;

use crate::constants::{PPP_GOODFCS16, PPP_INITFCS16};

static FCS_TABLE: Lazy<[u16; 256]> = Lazy::new(|| {
    let mut table = [0u16; 256];
    for (value, entry) in table.iter_mut().enumerate() {
        let mut crc = value as u16;
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0x8408
            } else {
                crc >> 1
            };
        }
        *entry = crc;
    }
    table
});

/// Folds `data` into the running frame check sequence `fcs`.
///
/// Start from [`PPP_INITFCS16`]; the result is the raw (uncomplemented) FCS.
pub fn crc16(fcs: u16, data: &[u8]) -> u16 {
    data.iter().fold(fcs, |fcs, &byte| {
        (fcs >> 8) ^ FCS_TABLE[((fcs ^ byte as u16) & 0xFF) as usize]
    })
}

/// Computes the two FCS bytes for `data` as they are emitted into a frame:
/// complemented, least-significant byte first.
pub fn frame_check_sequence(data: &[u8]) -> [u8; 2] {
    let fcs = crc16(PPP_INITFCS16, data) ^ 0xFFFF;
    [(fcs & 0x00FF) as u8, (fcs >> 8) as u8]
}

/// Checks a region that ends with its own FCS bytes.
///
/// Per RFC 1662, running the FCS over data plus a good FCS always yields
/// [`PPP_GOODFCS16`].
pub fn verify_frame_check_sequence(data_with_fcs: &[u8]) -> bool {
    crc16(PPP_INITFCS16, data_with_fcs) == PPP_GOODFCS16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_range_is_the_initial_value() {
        assert_eq!(crc16(PPP_INITFCS16, &[]), PPP_INITFCS16);
    }

    #[test]
    fn check_value_matches_x25_reference() {
        // CRC-16/X-25 check value for "123456789" is 0x906E.
        let fcs = crc16(PPP_INITFCS16, b"123456789") ^ 0xFFFF;
        assert_eq!(fcs, 0x906E);
    }

    #[test]
    fn appended_fcs_verifies() {
        let mut frame = vec![0x7E, 0xFF, 0x03, 0x60, 0x65];
        let fcs = frame_check_sequence(&frame);
        frame.extend_from_slice(&fcs);
        assert!(verify_frame_check_sequence(&frame));
    }
}
