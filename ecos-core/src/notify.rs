//! Error display seam and fallback helpers.
//!
//! Typed queries return `Result`. Callers that want the classic
//! "show a message and carry on with a default" behaviour use
//! [`Fallback::or_report`] with an [`ErrorSink`] of their choosing.

use tracing::warn;

use crate::error::EcosError;

/// Message shown when a reply could not be interpreted.
pub const RESPONSE_ERROR: &str = "Can't read the ECoS response";

/// Receives user-facing error messages. Fire and forget.
pub trait ErrorSink {
    fn display_error(&self, message: &str);
}

impl<F: Fn(&str)> ErrorSink for F {
    fn display_error(&self, message: &str) {
        self(message)
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ErrorSink for NullSink {
    fn display_error(&self, _message: &str) {}
}

/// Degrade a query result to a default value.
pub trait Fallback<T> {
    /// Return the value, or `default` on error. A malformed reply also
    /// sends [`RESPONSE_ERROR`] to `sink`.
    fn or_report(self, default: T, sink: &dyn ErrorSink) -> T;
}

impl<T> Fallback<T> for Result<T, EcosError> {
    fn or_report(self, default: T, sink: &dyn ErrorSink) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                warn!("degrading to default: {e}");
                if e.is_malformed_reply() {
                    sink.display_error(RESPONSE_ERROR);
                }
                default
            }
        }
    }
}
