//! Request/response exchange with the console and the typed operations
//! built on top of it.
//!
//! The protocol is strictly half-duplex: one request line out, then every
//! line up to `<END` back. All operations take `&mut self`, so a single
//! adapter can never interleave two exchanges.
//!
//! Only the connect has a deadline. A console that never sends `<END`
//! blocks the exchange until the socket fails; wrap calls in
//! `tokio::time::timeout` where that matters.

use tracing::{debug, warn};

use crate::error::EcosError;
use crate::message::Request;
use crate::network::{ConnectionInfo, EcosConnection};
use crate::protocol::reply::{
    Reply, ReplyBuilder, parse_direction, parse_function, parse_name, parse_speed, parse_status,
};
use crate::protocol::roster::{self, Train};
use crate::protocol::status::{ConsoleStatus, Direction};

pub type ProtocolAdapter = EcosAdapter;

#[derive(Debug, Default)]
pub struct EcosAdapter {
    conn: EcosConnection,
}

impl EcosAdapter {
    pub fn new(conn: EcosConnection) -> Self {
        Self { conn }
    }

    // ── Connection management ────────────────────────────────────

    /// Open the underlying connection; a no-op if already open.
    pub async fn open(&mut self, conn_info: &ConnectionInfo) -> Result<(), EcosError> {
        self.conn.open(conn_info).await
    }

    pub async fn close(&mut self) -> Result<(), EcosError> {
        self.conn.close().await
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_open()
    }

    pub fn set_connected(&mut self, state: bool) {
        self.conn.set_connected(state);
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    // ── Exchange ─────────────────────────────────────────────────

    /// Send one raw request line and gather the reply.
    ///
    /// Only the write can fail. Once the request is out, a read failure or
    /// end of stream just ends the reply early; check
    /// [`Reply::is_complete`] to tell the two apart.
    pub async fn exchange_line(&mut self, line: &str) -> Result<Reply, EcosError> {
        self.conn.write_line(line).await?;

        let mut builder = ReplyBuilder::new();
        while let Some(received) = self.conn.read_line().await {
            if !builder.push(&received) {
                break;
            }
        }

        let reply = builder.finish();
        if !reply.is_complete() {
            warn!("reply to `{line}` ended without <END");
        }
        Ok(reply)
    }

    pub async fn exchange(&mut self, request: Request) -> Result<Reply, EcosError> {
        self.exchange_line(&request.to_string()).await
    }

    /// Send a command whose reply carries nothing of interest.
    async fn command(&mut self, request: Request) -> Result<(), EcosError> {
        let reply = self.exchange(request).await?;
        if !reply.payload().is_empty() {
            debug!("ignoring payload for `{request}`: {}", reply.payload());
        }
        Ok(())
    }

    // ── Console ──────────────────────────────────────────────────

    pub async fn status(&mut self) -> Result<ConsoleStatus, EcosError> {
        let request = Request::GetStatus;
        let reply = self.exchange(request).await?;
        parse_status(request, reply.payload())
    }

    pub async fn emergency_stop(&mut self) -> Result<(), EcosError> {
        self.command(Request::EmergencyStop).await
    }

    pub async fn go(&mut self) -> Result<(), EcosError> {
        self.command(Request::Go).await
    }

    /// `true` stops the layout, `false` resumes it.
    pub async fn set_emergency(&mut self, stop: bool) -> Result<(), EcosError> {
        if stop {
            self.emergency_stop().await
        } else {
            self.go().await
        }
    }

    /// Raw console information block.
    pub async fn info(&mut self) -> Result<String, EcosError> {
        Ok(self.exchange(Request::GetInfo).await?.into_payload())
    }

    // ── Roster ───────────────────────────────────────────────────

    pub async fn locomotive_ids(&mut self) -> Result<Vec<String>, EcosError> {
        let reply = self.exchange(Request::QueryLocomotives).await?;
        Ok(roster::parse_ids(reply.payload()))
    }

    pub async fn locomotives(&mut self) -> Result<Vec<Train>, EcosError> {
        let reply = self.exchange(Request::QueryLocomotivesDetailed).await?;
        Ok(roster::parse_roster(reply.payload()))
    }

    // ── Train ────────────────────────────────────────────────────

    pub async fn name(&mut self, id: u32) -> Result<String, EcosError> {
        let request = Request::GetName { id };
        let reply = self.exchange(request).await?;
        parse_name(request, reply.payload())
    }

    pub async fn speed(&mut self, id: u32) -> Result<u32, EcosError> {
        let request = Request::GetSpeed { id };
        let reply = self.exchange(request).await?;
        parse_speed(request, reply.payload())
    }

    pub async fn set_speed(&mut self, id: u32, speed: u32) -> Result<(), EcosError> {
        self.command(Request::SetSpeed { id, speed }).await
    }

    pub async fn direction(&mut self, id: u32) -> Result<Direction, EcosError> {
        let request = Request::GetDirection { id };
        let reply = self.exchange(request).await?;
        parse_direction(request, reply.payload())
    }

    pub async fn set_direction(&mut self, id: u32, dir: Direction) -> Result<(), EcosError> {
        self.command(Request::SetDirection { id, dir }).await
    }

    pub async fn take_control(&mut self, id: u32) -> Result<(), EcosError> {
        self.command(Request::TakeControl { id }).await
    }

    pub async fn release_control(&mut self, id: u32) -> Result<(), EcosError> {
        self.command(Request::ReleaseControl { id }).await
    }

    pub async fn set_function(
        &mut self,
        id: u32,
        index: u32,
        enabled: bool,
    ) -> Result<(), EcosError> {
        self.command(Request::SetFunction { id, index, enabled }).await
    }

    /// Whether function `index` is switched on.
    pub async fn function(&mut self, id: u32, index: u32) -> Result<bool, EcosError> {
        let request = Request::GetFunction { id, index };
        let reply = self.exchange(request).await?;
        parse_function(request, reply.payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exchange_without_socket_fails() {
        let mut adapter = EcosAdapter::default();
        assert!(matches!(
            adapter.exchange(Request::GetStatus).await,
            Err(EcosError::NotOpen)
        ));
        assert!(matches!(adapter.speed(1000).await, Err(EcosError::NotOpen)));
    }

    #[tokio::test]
    async fn connected_flag_passes_through() {
        let mut adapter = EcosAdapter::default();
        adapter.set_connected(true);
        assert!(adapter.is_connected());
        assert!(!adapter.is_open());
        adapter.set_connected(false);
        assert!(!adapter.is_connected());
    }
}
