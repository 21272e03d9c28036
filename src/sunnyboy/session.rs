//! # Session Runner
//!
//! Owns the session state and drives a parsed script against the transport,
//! one directive at a time: build-and-match for `R`, build-stuff-transmit
//! for `S`, fixed-offset decoding for `E`. A run either completes every
//! requested extraction or fails with the script line that broke it; there
//! is no partial success and nothing above the intra-wait poll loop retries.

use chrono::Utc;
use log::debug;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::constants::DEFAULT_MAX_WAIT_ATTEMPTS;
use crate::error::SunnyBoyError;
use crate::logging::{log_debug, log_frame, log_info};
use crate::sunnyboy::addr::{BtAddress, SerialNumber};
use crate::sunnyboy::codec::unescape_frame;
use crate::sunnyboy::fields::{extract, FieldValue};
use crate::sunnyboy::frame::{build_frame, stuff_frame};
use crate::sunnyboy::script::{Directive, Field, Script, ScriptLine, Token};
use crate::sunnyboy::transport::InverterLink;
use crate::util::hex::format_colon_hex;

/// Where the runner is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Executing `R`/`S` directives (the initial phase).
    SendOrWait,
    /// Executing an `E` directive.
    Extracting,
    /// Script finished without error.
    Done,
    /// A directive failed; the session is unusable.
    Failed,
}

/// Which readings the caller wants out of the run.
///
/// Requesting only the power reading lets the run stop early as soon as
/// power has been extracted, like the original tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Power,
    Energy,
    Both,
}

/// Tunables of one session run.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub display: DisplayMode,
    /// Ceiling on poll attempts within one wait directive; `0` means
    /// unbounded, reproducing the original tool's behavior.
    pub max_wait_attempts: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            display: DisplayMode::default(),
            max_wait_attempts: DEFAULT_MAX_WAIT_ATTEMPTS,
        }
    }
}

/// The mutable protocol state a session accumulates.
///
/// Peer address and serial come from the caller; local address and channel
/// are learned from the inverter through `E` directives.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub peer_address: BtAddress,
    pub serial: SerialNumber,
    pub local_address: Option<[u8; 6]>,
    pub channel: Option<u8>,
}

impl SessionState {
    pub fn new(peer_address: BtAddress, serial: SerialNumber) -> Self {
        SessionState {
            peer_address,
            serial,
            local_address: None,
            channel: None,
        }
    }
}

/// The readings a completed run produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Readings {
    pub power_watts: Option<u32>,
    pub energy_today_kwh: Option<f64>,
}

/// Drives one script against one transport link.
pub struct SessionRunner<S> {
    link: InverterLink<S>,
    state: SessionState,
    config: SessionConfig,
    /// Unstuffed bytes of the most recently matched read.
    received: Vec<u8>,
    phase: SessionPhase,
}

impl<S: AsyncRead + AsyncWrite + Unpin> SessionRunner<S> {
    pub fn new(link: InverterLink<S>, state: SessionState, config: SessionConfig) -> Self {
        SessionRunner {
            link,
            state,
            config,
            received: Vec::new(),
            phase: SessionPhase::SendOrWait,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Executes the script from top to bottom.
    ///
    /// Errors carry the failing script line via [`SunnyBoyError::at_line`].
    pub async fn run(&mut self, script: &Script) -> Result<Readings, SunnyBoyError> {
        let mut readings = Readings::default();
        for line in &script.lines {
            match self.step(line, &mut readings).await {
                Ok(false) => {}
                Ok(true) => break,
                Err(e) => {
                    self.phase = SessionPhase::Failed;
                    return Err(e.at_line(line.number));
                }
            }
        }
        self.phase = SessionPhase::Done;
        Ok(readings)
    }

    /// Executes one directive; `Ok(true)` requests early termination.
    async fn step(
        &mut self,
        line: &ScriptLine,
        readings: &mut Readings,
    ) -> Result<bool, SunnyBoyError> {
        debug!("script[{}] {:?}", line.number, line.directive);
        match &line.directive {
            Directive::Wait(tokens) => {
                self.phase = SessionPhase::SendOrWait;
                self.wait(tokens).await?;
                Ok(false)
            }
            Directive::Send(tokens) => {
                self.phase = SessionPhase::SendOrWait;
                self.send(tokens).await?;
                Ok(false)
            }
            Directive::Extract(fields) => {
                self.phase = SessionPhase::Extracting;
                self.extract_fields(fields, readings)
            }
        }
    }

    fn epoch_now() -> u32 {
        Utc::now().timestamp() as u32
    }

    /// Polls the transport until a read, unstuffed, starts with the expected
    /// pattern. Each poll gets a fresh timeout window; a timeout with no
    /// data is fatal, as is exhausting the configured attempt ceiling.
    async fn wait(&mut self, tokens: &[Token]) -> Result<(), SunnyBoyError> {
        let pattern = build_frame(tokens, &self.state, Self::epoch_now())?;
        log_frame("waiting for: ", &pattern);
        debug!("matching on {} bytes", pattern.len());

        let mut attempts = 0usize;
        loop {
            if self.config.max_wait_attempts != 0 && attempts >= self.config.max_wait_attempts {
                return Err(SunnyBoyError::WaitExhausted { attempts });
            }
            attempts += 1;

            let raw = self.link.read_chunk().await?;
            log_frame("received:    ", &raw);
            let decoded = unescape_frame(&raw)?;

            if decoded.len() >= pattern.len() && decoded[..pattern.len()] == pattern[..] {
                log_debug("found");
                self.received = decoded;
                return Ok(());
            }
        }
    }

    /// Builds, stuffs and transmits an outgoing frame.
    async fn send(&mut self, tokens: &[Token]) -> Result<(), SunnyBoyError> {
        let frame = build_frame(tokens, &self.state, Self::epoch_now())?;
        log_frame("send ", &frame);
        self.link.send(&stuff_frame(tokens, &frame)).await
    }

    /// Decodes each named field out of the last received frame, updating the
    /// session state or the readings as appropriate.
    fn extract_fields(
        &mut self,
        fields: &[Field],
        readings: &mut Readings,
    ) -> Result<bool, SunnyBoyError> {
        log_debug("extracting");
        for &field in fields {
            match extract(&self.received, field)? {
                FieldValue::Power(watts) => {
                    log_info(&format!("power (W): {watts}"));
                    readings.power_watts = Some(watts);
                    // Only the power reading was asked for; the rest of the
                    // script exists to fetch the energy total.
                    if self.config.display == DisplayMode::Power {
                        return Ok(true);
                    }
                }
                FieldValue::EnergyToday(kwh) => {
                    log_info(&format!("energy_today (kWh): {kwh:.2}"));
                    readings.energy_today_kwh = Some(kwh);
                }
                FieldValue::LocalAddress(addr) => {
                    log_info(&format!("got our bt address: {}", format_colon_hex(&addr)));
                    self.state.local_address = Some(addr);
                }
                FieldValue::Channel(chan) => {
                    log_info(&format!("bluetooth channel: {chan}"));
                    self.state.channel = Some(chan);
                }
            }
        }
        Ok(false)
    }
}
