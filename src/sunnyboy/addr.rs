//! # Inverter Addressing
//!
//! The two identifiers a session is constructed from: the inverter's
//! Bluetooth address (`XX:XX:XX:XX:XX:XX`) and its serial number rendered as
//! four colon-separated hex bytes (`XX:XX:XX:XX`, e.g. s/n 2130248863 is
//! `7E:F9:04:9F`). The wire protocol carries both least-significant byte
//! first, i.e. reversed with respect to the textual form.

use std::fmt;
use std::str::FromStr;

use crate::error::SunnyBoyError;
use crate::util::hex::{format_colon_hex, parse_colon_hex};

/// A Bluetooth device address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BtAddress([u8; 6]);

impl BtAddress {
    pub fn new(bytes: [u8; 6]) -> Self {
        BtAddress(bytes)
    }

    /// The address bytes in textual (most-significant first) order.
    pub fn bytes(&self) -> [u8; 6] {
        self.0
    }

    /// The address bytes as the inverter protocol carries them: least-
    /// significant byte of the colon-separated form first.
    pub fn wire_bytes(&self) -> [u8; 6] {
        let mut wire = self.0;
        wire.reverse();
        wire
    }
}

impl FromStr for BtAddress {
    type Err = SunnyBoyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = parse_colon_hex(s, 6)
            .map_err(|e| SunnyBoyError::InvalidAddress(format!("{s:?}: {e}")))?;
        let mut addr = [0u8; 6];
        addr.copy_from_slice(&bytes);
        Ok(BtAddress(addr))
    }
}

impl fmt::Display for BtAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_colon_hex(&self.0))
    }
}

/// An inverter serial number as four hex bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialNumber([u8; 4]);

impl SerialNumber {
    pub fn new(bytes: [u8; 4]) -> Self {
        SerialNumber(bytes)
    }

    /// The serial bytes in textual order.
    pub fn bytes(&self) -> [u8; 4] {
        self.0
    }

    /// The serial bytes in wire order (reversed).
    pub fn wire_bytes(&self) -> [u8; 4] {
        let mut wire = self.0;
        wire.reverse();
        wire
    }
}

impl FromStr for SerialNumber {
    type Err = SunnyBoyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = parse_colon_hex(s, 4)
            .map_err(|e| SunnyBoyError::InvalidAddress(format!("{s:?}: {e}")))?;
        let mut serial = [0u8; 4];
        serial.copy_from_slice(&bytes);
        Ok(SerialNumber(serial))
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_colon_hex(&self.0))
    }
}
