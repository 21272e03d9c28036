//! # sunnyboy-rs - Reading SMA Sunny Boy Inverters over Bluetooth
//!
//! The sunnyboy-rs crate talks to SMA Sunny Boy solar micro-inverters over
//! their proprietary, PPP-like framed Bluetooth protocol. Wire behavior is
//! driven entirely by an external text script: each line either waits for an
//! expected frame (`R`), sends a constructed frame (`S`), or extracts typed
//! values from the last received frame (`E`).
//!
//! ## Features
//!
//! - Script mini-language interpreter with protocol macros (`$ADDR`, `$SER`,
//!   `$TIME`, `$CRC`, `$ADD2`, `$CHAN`) and hex-literal bytes
//! - HDLC-style byte stuffing/unstuffing of frames
//! - PPP FCS-16 frame check sequence
//! - Blocking-with-timeout receive/match loop with a configurable attempt
//!   ceiling
//! - Fixed-offset extraction of instantaneous power and daily energy
//! - Transport-agnostic: any `AsyncRead + AsyncWrite` stream works, with
//!   constructors for an RFCOMM-bound tty and a TCP bridge
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sunnyboy_rs::{
//!     read_inverter, InverterLink, LinkConfig, Script, SessionConfig,
//! };
//!
//! # async fn example() -> Result<(), sunnyboy_rs::SunnyBoyError> {
//! let script = Script::parse(&std::fs::read_to_string("/etc/sbread.script").unwrap())?;
//! let link = InverterLink::open("/dev/rfcomm0", LinkConfig::default())?;
//! let readings = read_inverter(
//!     link,
//!     &script,
//!     "00:80:25:A6:77:60".parse()?,
//!     "7E:F9:04:9F".parse()?,
//!     SessionConfig::default(),
//! )
//! .await?;
//! println!("{:?}", readings.power_watts);
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod error;
pub mod logging;
pub mod sunnyboy;
pub mod util;

pub use crate::error::SunnyBoyError;
pub use crate::logging::{init_logger, init_logger_with_verbosity, log_info};

// Core protocol types
pub use sunnyboy::{
    BtAddress, DisplayMode, InverterLink, LinkConfig, Readings, Script, SerialNumber,
    SessionConfig, SessionPhase, SessionRunner, SessionState,
};

use tokio::io::{AsyncRead, AsyncWrite};

/// Run a script against a connected inverter link and return the readings.
///
/// # Arguments
/// * `link` - Connected transport link
/// * `script` - Parsed directive script
/// * `address` - Bluetooth address of the inverter
/// * `serial` - Inverter serial number
/// * `config` - Session tunables (display mode, wait attempt ceiling)
///
/// # Returns
/// * `Ok(Readings)` - The extracted power and/or energy values
/// * `Err(SunnyBoyError)` - The failing script line and underlying cause
pub async fn read_inverter<S: AsyncRead + AsyncWrite + Unpin>(
    link: InverterLink<S>,
    script: &Script,
    address: BtAddress,
    serial: SerialNumber,
    config: SessionConfig,
) -> Result<Readings, SunnyBoyError> {
    let state = SessionState::new(address, serial);
    SessionRunner::new(link, state, config).run(script).await
}
