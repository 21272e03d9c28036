//! # Field Extractor
//!
//! Fixed-offset decoding of values out of an unstuffed response frame. The
//! offsets are protocol constants of the Sunny Boy response layout and are
//! never recomputed at runtime; every read is bounds checked.

use crate::constants::{
    FIELD_CHANNEL_OFFSET, FIELD_ENERGY_OFFSET, FIELD_LOCAL_ADDR_OFFSET, FIELD_POWER_OFFSET,
};
use crate::error::SunnyBoyError;
use crate::sunnyboy::script::Field;

/// How a raw field slice becomes a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decode {
    /// Little-endian unsigned 16-bit integer.
    LittleEndianU16,
    /// Little-endian u16 scaled by 1/1000 (Wh on the wire, kWh reported).
    LittleEndianU16Milli,
    /// Raw bytes, kept as-is.
    Raw,
}

/// Static descriptor of one extractable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub decode: Decode,
}

/// Looks up the descriptor for a field.
pub fn descriptor(field: Field) -> FieldDescriptor {
    match field {
        Field::Power => FieldDescriptor {
            name: "$POW",
            offset: FIELD_POWER_OFFSET,
            width: 2,
            decode: Decode::LittleEndianU16,
        },
        Field::EnergyToday => FieldDescriptor {
            name: "$DTOT",
            offset: FIELD_ENERGY_OFFSET,
            width: 2,
            decode: Decode::LittleEndianU16Milli,
        },
        Field::LocalAddress => FieldDescriptor {
            name: "$ADD2",
            offset: FIELD_LOCAL_ADDR_OFFSET,
            width: 6,
            decode: Decode::Raw,
        },
        Field::Channel => FieldDescriptor {
            name: "$CHAN",
            offset: FIELD_CHANNEL_OFFSET,
            width: 1,
            decode: Decode::Raw,
        },
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Instantaneous power in watts.
    Power(u32),
    /// Energy produced so far today in kWh.
    EnergyToday(f64),
    /// Our Bluetooth address in wire order.
    LocalAddress([u8; 6]),
    /// Bluetooth channel.
    Channel(u8),
}

/// Extracts one field from a received frame.
///
/// A frame shorter than `offset + width` yields an extraction error carrying
/// the field name and offsets rather than panicking.
pub fn extract(received: &[u8], field: Field) -> Result<FieldValue, SunnyBoyError> {
    let desc = descriptor(field);
    let raw = received
        .get(desc.offset..desc.offset + desc.width)
        .ok_or(SunnyBoyError::Extraction {
            field: desc.name,
            offset: desc.offset,
            needed: desc.width,
            len: received.len(),
        })?;

    Ok(match field {
        Field::Power => FieldValue::Power(u16::from_le_bytes([raw[0], raw[1]]) as u32),
        Field::EnergyToday => {
            FieldValue::EnergyToday(u16::from_le_bytes([raw[0], raw[1]]) as f64 / 1000.0)
        }
        Field::LocalAddress => {
            let mut addr = [0u8; 6];
            addr.copy_from_slice(raw);
            FieldValue::LocalAddress(addr)
        }
        Field::Channel => FieldValue::Channel(raw[0]),
    })
}
