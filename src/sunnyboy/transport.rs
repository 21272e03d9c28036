//! # Inverter Transport
//!
//! A thin handle over the byte stream the session talks through. The engine
//! only needs three things from it: connect, a bounded-timeout chunk read,
//! and a full-buffer write. The handle is therefore generic over any
//! `AsyncRead + AsyncWrite` stream, and any reliable transport substitutes.
//!
//! The reference deployment is a Bluetooth RFCOMM link. On Linux that is
//! most simply reached through an RFCOMM-bound tty (`rfcomm bind 0
//! <address>` then [`InverterLink::open`] on `/dev/rfcomm0`); a TCP bridge
//! (e.g. `ser2net`) works through [`InverterLink::connect_tcp`].

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_serial::{SerialPortBuilderExt, SerialStream};

use crate::constants::{DEFAULT_READ_TIMEOUT_SECS, MAX_FRAME_LEN};
use crate::error::SunnyBoyError;

/// Configuration for the transport link.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// How long one read may block before the wait fails.
    pub read_timeout: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
        }
    }
}

/// A connected link to the inverter.
pub struct InverterLink<S> {
    stream: S,
    config: LinkConfig,
}

impl InverterLink<SerialStream> {
    /// Opens an RFCOMM-bound tty device such as `/dev/rfcomm0`.
    ///
    /// The baud rate is nominal; an RFCOMM tty ignores it.
    pub fn open(path: &str, config: LinkConfig) -> Result<Self, SunnyBoyError> {
        let stream = tokio_serial::new(path, 115_200)
            .open_native_async()
            .map_err(|e| SunnyBoyError::Transport(format!("opening {path}: {e}")))?;
        Ok(InverterLink { stream, config })
    }
}

impl InverterLink<TcpStream> {
    /// Connects to a TCP bridge in `host:port` form.
    pub async fn connect_tcp(addr: &str, config: LinkConfig) -> Result<Self, SunnyBoyError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| SunnyBoyError::Transport(format!("connecting to {addr}: {e}")))?;
        Ok(InverterLink { stream, config })
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> InverterLink<S> {
    /// Wraps an already-connected stream. Used by tests with a mock stream.
    pub fn new(stream: S, config: LinkConfig) -> Self {
        InverterLink { stream, config }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Performs one read of up to the protocol's maximum frame length,
    /// bounded by the configured timeout.
    ///
    /// Returns the raw (still stuffed) bytes of the chunk. A timeout with no
    /// data and a closed stream are both fatal.
    pub async fn read_chunk(&mut self) -> Result<Vec<u8>, SunnyBoyError> {
        let mut buf = vec![0u8; MAX_FRAME_LEN];
        let n = timeout(self.config.read_timeout, self.stream.read(&mut buf))
            .await
            .map_err(|_| SunnyBoyError::Timeout {
                seconds: self.config.read_timeout.as_secs(),
            })?
            .map_err(|e| SunnyBoyError::Transport(format!("read: {e}")))?;
        if n == 0 {
            return Err(SunnyBoyError::Transport("connection closed by peer".into()));
        }
        buf.truncate(n);
        Ok(buf)
    }

    /// Writes a whole encoded frame; a short or failed write is fatal.
    pub async fn send(&mut self, data: &[u8]) -> Result<(), SunnyBoyError> {
        self.stream
            .write_all(data)
            .await
            .map_err(|e| SunnyBoyError::Transport(format!("write: {e}")))?;
        self.stream
            .flush()
            .await
            .map_err(|e| SunnyBoyError::Transport(format!("flush: {e}")))
    }
}
