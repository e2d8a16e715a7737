//! Domain-specific error types for the ECoS client.
//!
//! Connection-level failures (dial, write) propagate to the caller.
//! Reply-level failures surface as [`EcosError::MalformedReply`] so the
//! caller decides whether to degrade to a default value.

use std::time::Duration;
use thiserror::Error;

/// The canonical error type for the ECoS client.
#[derive(Debug, Error)]
pub enum EcosError {
    // ── Connection Errors ────────────────────────────────────────
    /// The TCP/IO layer reported an error.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// The console did not accept the TCP connection in time.
    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// An operation needed a socket but none is open.
    #[error("connection is not open")]
    NotOpen,

    /// An operation exceeded a caller-imposed deadline.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    // ── Reply Errors ─────────────────────────────────────────────
    /// The reply payload did not contain the expected value.
    #[error("malformed reply to `{request}`: {payload:?}")]
    MalformedReply { request: String, payload: String },
}

impl EcosError {
    /// Build a [`EcosError::MalformedReply`] for the given request line.
    pub fn malformed(request: impl ToString, payload: impl Into<String>) -> Self {
        EcosError::MalformedReply {
            request: request.to_string(),
            payload: payload.into(),
        }
    }

    /// Returns `true` when the console answered but the answer could not
    /// be interpreted.
    pub fn is_malformed_reply(&self) -> bool {
        matches!(self, EcosError::MalformedReply { .. })
    }
}
