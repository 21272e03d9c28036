//! Sunny Boy Bluetooth Protocol Constants
//!
//! Constants of the SMA Sunny Boy PPP-like Bluetooth protocol: reserved
//! framing bytes, CRC parameters and the fixed offsets at which readings
//! sit inside a response frame.

/// Frame boundary flag byte (PPP/HDLC style).
pub const FRAME_FLAG: u8 = 0x7E;

/// Control escape byte; a stuffed byte follows, XORed with [`ESCAPE_XOR`].
pub const FRAME_ESCAPE: u8 = 0x7D;

/// XOR applied to a byte that follows the escape byte.
pub const ESCAPE_XOR: u8 = 0x20;

/// Initial FCS-16 value (RFC 1662).
pub const PPP_INITFCS16: u16 = 0xFFFF;

/// Value of the FCS-16 when run over a frame including its own good FCS.
pub const PPP_GOODFCS16: u16 = 0xF0B8;

/// Offset into an outgoing frame at which the `$CRC` region starts.
///
/// The 19 bytes in front of it are the Bluetooth transport header, which
/// is not covered by the frame check sequence.
pub const CRC_HEADER_OFFSET: usize = 19;

/// Maximum length of a frame, pre- or post-stuffing.
pub const MAX_FRAME_LEN: usize = 1024;

// ----------------------------------------------------------------------------
// Fixed field offsets within an unstuffed response frame
// ----------------------------------------------------------------------------

/// Bluetooth channel reported by the inverter (1 byte).
pub const FIELD_CHANNEL_OFFSET: usize = 22;

/// Our own Bluetooth address as seen by the inverter (6 bytes, wire order).
pub const FIELD_LOCAL_ADDR_OFFSET: usize = 26;

/// Instantaneous power in watts (little-endian u16).
pub const FIELD_POWER_OFFSET: usize = 67;

/// Energy produced today in Wh (little-endian u16; reported as kWh).
pub const FIELD_ENERGY_OFFSET: usize = 83;

// ----------------------------------------------------------------------------
// Defaults
// ----------------------------------------------------------------------------

/// Default path of the directive script.
pub const DEFAULT_SCRIPT_PATH: &str = "/etc/sbread.script";

/// Default per-read timeout on the transport, in seconds.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 7;

/// Default ceiling on poll attempts within one `R` (wait) directive.
pub const DEFAULT_MAX_WAIT_ATTEMPTS: usize = 100;
