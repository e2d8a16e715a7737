//! Reply framing and value extraction.
//!
//! # Wire Protocol
//!
//! ```text
//! Client ──[get(1000, speed)]──────────────► Console
//!
//! Console ──[<REPLY get(1000, speed)>]─────► Client   (ack, discarded)
//! Console ──[1000 speed[87]]───────────────► Client   (payload, 0..n lines)
//! Console ──[<END 0 (OK)>]─────────────────► Client   (terminator)
//! ```
//!
//! The payload of a reply is every non-framing line, each followed by a
//! newline, with the whole accumulation trimmed.

use crate::error::EcosError;
use crate::message::Request;
use crate::protocol::status::{ConsoleStatus, Direction};

/// Prefix of the acknowledgement line opening a reply.
pub const REPLY_PREFIX: &str = "<REPLY";

/// Prefix of the line terminating a reply.
pub const END_PREFIX: &str = "<END";

// ── Line classification ──────────────────────────────────────────

/// The role a single received line plays in a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyLine<'a> {
    /// `<REPLY ...>` acknowledgement, not part of the payload.
    Ack(&'a str),
    /// `<END ...>` terminator.
    End(&'a str),
    /// Anything else.
    Payload(&'a str),
}

impl<'a> ReplyLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        if line.starts_with(REPLY_PREFIX) {
            ReplyLine::Ack(line)
        } else if line.starts_with(END_PREFIX) {
            ReplyLine::End(line)
        } else {
            ReplyLine::Payload(line)
        }
    }
}

// ── Reply ────────────────────────────────────────────────────────

/// The accumulated payload of one request/response exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    payload: String,
    complete: bool,
}

impl Reply {
    /// The trimmed payload text.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn into_payload(self) -> String {
        self.payload
    }

    /// `true` if the `<END` terminator was received. `false` means the
    /// stream ended or failed first and the payload may be partial.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Incrementally gathers reply lines until the terminator.
#[derive(Debug, Default)]
pub struct ReplyBuilder {
    buf: String,
    complete: bool,
}

impl ReplyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one received line. Returns `false` once the terminator has
    /// been seen and no further lines belong to this reply.
    pub fn push(&mut self, line: &str) -> bool {
        match ReplyLine::classify(line) {
            ReplyLine::Ack(_) => true,
            ReplyLine::End(_) => {
                self.complete = true;
                false
            }
            ReplyLine::Payload(text) => {
                self.buf.push_str(text);
                self.buf.push('\n');
                true
            }
        }
    }

    pub fn finish(self) -> Reply {
        Reply {
            payload: self.buf.trim().to_string(),
            complete: self.complete,
        }
    }
}

// ── Value extraction ─────────────────────────────────────────────

/// Text strictly between the last `[` and the last `]`.
pub fn bracketed(payload: &str) -> Option<&str> {
    let open = payload.rfind('[')?;
    let close = payload.rfind(']')?;
    (open < close).then(|| &payload[open + 1..close])
}

/// Text between the last space and the last `]`, as in
/// `1000 func[3, 1]` → `1`.
pub fn function_value(payload: &str) -> Option<&str> {
    let space = payload.rfind(' ')?;
    let close = payload.rfind(']')?;
    (space < close).then(|| &payload[space + 1..close])
}

pub fn parse_status(request: Request, payload: &str) -> Result<ConsoleStatus, EcosError> {
    bracketed(payload)
        .map(ConsoleStatus::from_wire)
        .ok_or_else(|| EcosError::malformed(request, payload))
}

/// The bracketed value, verbatim (quotes included).
pub fn parse_name(request: Request, payload: &str) -> Result<String, EcosError> {
    bracketed(payload)
        .map(str::to_string)
        .ok_or_else(|| EcosError::malformed(request, payload))
}

pub fn parse_speed(request: Request, payload: &str) -> Result<u32, EcosError> {
    bracketed(payload)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| EcosError::malformed(request, payload))
}

pub fn parse_direction(request: Request, payload: &str) -> Result<Direction, EcosError> {
    bracketed(payload)
        .and_then(|v| v.parse::<i32>().ok())
        .map(Direction::from_raw)
        .ok_or_else(|| EcosError::malformed(request, payload))
}

/// `true` only when the function reads back as `1`.
pub fn parse_function(request: Request, payload: &str) -> Result<bool, EcosError> {
    function_value(payload)
        .and_then(|v| v.parse::<i32>().ok())
        .map(|v| v == 1)
        .ok_or_else(|| EcosError::malformed(request, payload))
}
