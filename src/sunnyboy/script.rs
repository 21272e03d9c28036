//! # Script Directive Interpreter
//!
//! Parses the external text script that drives a session. One directive per
//! line, tokens separated by spaces or semicolons, every line terminated by
//! the `$END` marker:
//!
//! ```text
//! R 7E 1F 00 61 $END
//! S 7E 4E 00 2E $ADDR 00 01 $TIME $CRC 7E $END
//! E $ADD2 $CHAN $END
//! ```
//!
//! `R` waits for a frame matching the resolved pattern, `S` sends a frame,
//! `E` extracts fields from the last received frame. The script is a flat
//! sequence of steps executed once: no jumps, loops or conditionals.
//! Blank lines, unknown directives and unknown tokens are parse errors that
//! abort the run, carrying the 1-based line number.

use crate::error::SunnyBoyError;
use crate::util::hex::hex_byte;

/// End-of-line marker token.
pub const END_MARKER: &str = "$END";

/// A macro or literal token of an `R` (wait) or `S` (send) line.
///
/// Each variant resolves to a fixed number of bytes against the session
/// state; see the macro resolver in [`frame`](super::frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `$ADDR`: the inverter's Bluetooth address, 6 bytes, wire order.
    PeerAddress,
    /// `$ADD2`: our own Bluetooth address as learned from the inverter.
    LocalAddress,
    /// `$SER`: the inverter serial number, 4 bytes, wire order.
    Serial,
    /// `$TIME`: current time as epoch seconds, 4 bytes little-endian.
    Timestamp,
    /// `$CRC`: FCS-16 over the frame so far, from the header offset on.
    Crc,
    /// `$CHAN`: the Bluetooth channel as learned from the inverter.
    Channel,
    /// A two-hex-digit literal byte.
    Literal(u8),
}

/// A field named on an `E` (extract) line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `$POW`: instantaneous power in watts.
    Power,
    /// `$DTOT`: energy produced so far today.
    EnergyToday,
    /// `$ADD2`: our Bluetooth address, fed back into the session state.
    LocalAddress,
    /// `$CHAN`: the Bluetooth channel, fed back into the session state.
    Channel,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Power => "$POW",
            Field::EnergyToday => "$DTOT",
            Field::LocalAddress => "$ADD2",
            Field::Channel => "$CHAN",
        }
    }
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `R`: wait until a received frame matches the resolved pattern.
    Wait(Vec<Token>),
    /// `S`: resolve, stuff and transmit a frame.
    Send(Vec<Token>),
    /// `E`: extract the named fields from the last received frame.
    Extract(Vec<Field>),
}

/// A directive together with its position in the script file.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub number: usize,
    pub directive: Directive,
}

/// A fully parsed script.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub lines: Vec<ScriptLine>,
}

impl Script {
    /// Parses a whole script file. Any bad line aborts the parse.
    pub fn parse(text: &str) -> Result<Script, SunnyBoyError> {
        let mut lines = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let number = idx + 1;
            lines.push(ScriptLine {
                number,
                directive: parse_line(number, line)?,
            });
        }
        if lines.is_empty() {
            return Err(SunnyBoyError::ScriptParse {
                line: 0,
                reason: "script is empty".into(),
            });
        }
        Ok(Script { lines })
    }
}

fn parse_error(line: usize, reason: impl Into<String>) -> SunnyBoyError {
    SunnyBoyError::ScriptParse {
        line,
        reason: reason.into(),
    }
}

/// Parses one script line into a directive.
pub fn parse_line(number: usize, line: &str) -> Result<Directive, SunnyBoyError> {
    let mut words = line
        .split(|c: char| c == ' ' || c == ';' || c == '\t')
        .filter(|w| !w.is_empty());

    let kind = words
        .next()
        .ok_or_else(|| parse_error(number, "blank line"))?;

    let body: Vec<&str> = words.collect();
    let end_pos = body
        .iter()
        .position(|w| *w == END_MARKER)
        .ok_or_else(|| parse_error(number, format!("missing {END_MARKER} marker")))?;
    if end_pos != body.len() - 1 {
        return Err(parse_error(
            number,
            format!("tokens after {END_MARKER} marker"),
        ));
    }
    let body = &body[..end_pos];

    match kind {
        "R" => Ok(Directive::Wait(parse_pattern_tokens(number, body, false)?)),
        "S" => Ok(Directive::Send(parse_pattern_tokens(number, body, true)?)),
        "E" => Ok(Directive::Extract(parse_fields(number, body)?)),
        other => Err(parse_error(number, format!("unknown directive {other:?}"))),
    }
}

fn parse_pattern_tokens(
    number: usize,
    words: &[&str],
    is_send: bool,
) -> Result<Vec<Token>, SunnyBoyError> {
    let mut tokens = Vec::with_capacity(words.len());
    for (pos, word) in words.iter().enumerate() {
        let token = match *word {
            "$ADDR" => Token::PeerAddress,
            "$ADD2" => Token::LocalAddress,
            "$SER" => Token::Serial,
            "$TIME" => Token::Timestamp,
            "$CHAN" => Token::Channel,
            "$CRC" => {
                if !is_send {
                    return Err(parse_error(number, "$CRC is only valid in an S line"));
                }
                if pos != words.len() - 1 {
                    return Err(parse_error(
                        number,
                        format!("$CRC must be the last token before {END_MARKER}"),
                    ));
                }
                Token::Crc
            }
            "$POW" | "$DTOT" => {
                return Err(parse_error(
                    number,
                    format!("{word} is only valid in an E line"),
                ));
            }
            literal => Token::Literal(
                hex_byte(literal)
                    .map_err(|_| parse_error(number, format!("unknown token {literal:?}")))?,
            ),
        };
        tokens.push(token);
    }
    Ok(tokens)
}

fn parse_fields(number: usize, words: &[&str]) -> Result<Vec<Field>, SunnyBoyError> {
    words
        .iter()
        .map(|word| match *word {
            "$POW" => Ok(Field::Power),
            "$DTOT" => Ok(Field::EnergyToday),
            "$ADD2" => Ok(Field::LocalAddress),
            "$CHAN" => Ok(Field::Channel),
            other => Err(parse_error(
                number,
                format!("{other:?} is not an extractable field"),
            )),
        })
        .collect()
}
