use log::{debug, error, info, log_enabled, warn, Level, LevelFilter};

use crate::util::hex::format_hex_compact;

/// Initializes the logger with the `env_logger` crate.
///
/// Log level is taken from the `RUST_LOG` environment variable.
pub fn init_logger() {
    env_logger::init();
}

/// Initializes the logger from a verbosity count, mirroring the original
/// tool's `-v` / `-vv` flags: 0 = errors only, 1 = info, 2+ = debug.
///
/// `RUST_LOG`, when set, still takes precedence.
pub fn init_logger_with_verbosity(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.to_string()),
    )
    .init();
}

/// Logs an error message.
pub fn log_error(message: &str) {
    if log_enabled!(Level::Error) {
        error!("{message}");
    }
}

/// Logs a warning message.
pub fn log_warn(message: &str) {
    if log_enabled!(Level::Warn) {
        warn!("{message}");
    }
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}

/// Logs a debug message.
pub fn log_debug(message: &str) {
    if log_enabled!(Level::Debug) {
        debug!("{message}");
    }
}

/// Logs a frame as a hex dump at debug level, e.g. `waiting for: 7e 4a 12`.
///
/// The dump is only formatted when debug logging is enabled.
pub fn log_frame(prefix: &str, data: &[u8]) {
    if log_enabled!(Level::Debug) {
        debug!("{prefix}{}", format_hex_compact(data));
    }
}
