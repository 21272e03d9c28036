//! # Sunny Boy Error Handling
//!
//! This module defines the SunnyBoyError enum, which represents the different
//! error types that can occur while running an inverter script session.

use thiserror::Error;

/// Represents the different error types that can occur in the Sunny Boy crate.
#[derive(Debug, Error)]
pub enum SunnyBoyError {
    /// A script line could not be parsed.
    #[error("script parse error at line {line}: {reason}")]
    ScriptParse { line: usize, reason: String },

    /// A macro was resolved before the session state it draws on was learned.
    #[error("session state error: {0}")]
    SessionState(String),

    /// No data arrived on the transport within the wait window.
    #[error("timeout after {seconds}s waiting for data from inverter")]
    Timeout { seconds: u64 },

    /// The wait/match loop gave up after the configured number of polls.
    #[error("no matching frame after {attempts} poll attempts")]
    WaitExhausted { attempts: usize },

    /// A read, write or connect on the underlying transport failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// A received byte stream could not be unstuffed.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// A field extraction read past the end of the received buffer.
    #[error("cannot extract {field}: need {needed} bytes at offset {offset}, frame is {len} bytes")]
    Extraction {
        field: &'static str,
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// A frame buffer grew beyond the protocol maximum.
    #[error("frame too long: {len} bytes exceeds maximum of {max}")]
    FrameTooLong { len: usize, max: usize },

    /// A Bluetooth address or serial number string was malformed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// An error that occurred while executing a particular script line.
    #[error("script line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<SunnyBoyError>,
    },
}

impl SunnyBoyError {
    /// Attaches a script line number to an error raised during a run.
    ///
    /// Parse errors already carry their line; everything else is wrapped.
    pub fn at_line(self, line: usize) -> SunnyBoyError {
        match self {
            e @ SunnyBoyError::ScriptParse { .. } | e @ SunnyBoyError::AtLine { .. } => e,
            other => SunnyBoyError::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }
}
