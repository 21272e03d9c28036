//! # Sunny Boy Bluetooth Protocol
//!
//! The script-driven protocol engine: frame codec and CRC, the script
//! mini-language, macro resolution, the session state machine and the
//! transport handle it runs over.

pub mod addr;
pub mod codec;
pub mod crc;
pub mod fields;
pub mod frame;
pub mod script;
pub mod session;
pub mod transport;
pub mod transport_mock;

pub use addr::{BtAddress, SerialNumber};
pub use script::{Directive, Field, Script, ScriptLine, Token};
pub use session::{
    DisplayMode, Readings, SessionConfig, SessionPhase, SessionRunner, SessionState,
};
pub use transport::{InverterLink, LinkConfig};
