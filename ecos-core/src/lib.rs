//! # ecos-core
//!
//! Client library for the ECoS model-railway command station text
//! protocol.
//!
//! This crate contains:
//! - **Codec**: `EcosCodec`, newline framing for `tokio_util`
//! - **Network**: `Connection` owning one TCP socket to the console
//! - **Requests**: `Request`, rendering each command to its wire line
//! - **Protocol**: reply framing, bracketed-value parsing, roster parsing
//! - **Adapter**: `EcosAdapter`, the request/response exchange and typed
//!   operations (speed, direction, functions, emergency stop, roster)
//! - **Notify**: `ErrorSink` and `Fallback` for callers that degrade to
//!   default values
//! - **Error**: `EcosError`, a `thiserror`-based error type

pub mod adapter;
pub mod codec;
pub mod error;
pub mod message;
pub mod network;
pub mod notify;
pub mod protocol;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use adapter::{EcosAdapter, ProtocolAdapter};
pub use codec::{EcosCodec, MAX_LINE_LENGTH};
pub use error::EcosError;
pub use message::{CONSOLE_OBJECT, LOCO_MANAGER_OBJECT, Request};
pub use network::{Connection, ConnectionInfo, DEFAULT_CONNECT_TIMEOUT, EcosConnection};
pub use notify::{ErrorSink, Fallback, NullSink, RESPONSE_ERROR};
pub use protocol::{ConsoleStatus, Direction, Reply, Train};
