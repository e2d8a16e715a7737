use std::fmt;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, info};

use crate::codec::EcosCodec;
use crate::error::EcosError;

pub type Connection = EcosConnection;

/// Bound on the initial TCP connect.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(1000);

/// A line-oriented TCP connection to one ECoS console.
///
/// The socket is created by [`open`](Self::open) and dropped by
/// [`close`](Self::close); in between it is reused for every request.
/// The `connected` flag is caller-owned bookkeeping and has no bearing on
/// whether I/O is attempted.
#[derive(Debug)]
pub struct EcosConnection {
    framed: Option<Framed<TcpStream, EcosCodec>>,
    connected: bool,
    connect_timeout: Duration,
}

impl Default for EcosConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl EcosConnection {
    pub fn new() -> Self {
        Self {
            framed: None,
            connected: false,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Dial the console. Does nothing if a socket is already open.
    ///
    /// On failure no socket is kept, so `open` may simply be called again.
    pub async fn open(&mut self, conn_info: &ConnectionInfo) -> Result<(), EcosError> {
        if self.framed.is_some() {
            debug!("open({conn_info}) ignored: already open");
            return Ok(());
        }

        let addr = conn_info.to_string();
        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| EcosError::ConnectTimeout(self.connect_timeout))??;
        stream.set_nodelay(true)?;

        info!("connected to console at {addr}");
        self.framed = Some(Framed::new(stream, EcosCodec::new()));
        Ok(())
    }

    /// Whether a socket is currently held.
    pub fn is_open(&self) -> bool {
        self.framed.is_some()
    }

    /// Next line from the console, or `None` on end of stream, read
    /// failure, or when not open. Failures are not reported further.
    pub async fn read_line(&mut self) -> Option<String> {
        let framed = self.framed.as_mut()?;
        match framed.next().await {
            Some(Ok(line)) => {
                debug!("<- {line}");
                Some(line)
            }
            Some(Err(e)) => {
                debug!("read failed: {e}");
                None
            }
            None => {
                debug!("console closed the stream");
                None
            }
        }
    }

    /// Write one line and flush it to the peer.
    pub async fn write_line(&mut self, text: &str) -> Result<(), EcosError> {
        let framed = self.framed.as_mut().ok_or(EcosError::NotOpen)?;
        debug!("-> {text}");
        // `send` flushes after encoding.
        framed.send(text).await
    }

    /// Shut the socket down and forget it. Closing a closed connection
    /// is a no-op.
    pub async fn close(&mut self) -> Result<(), EcosError> {
        let Some(mut framed) = self.framed.take() else {
            return Ok(());
        };
        info!("closing console connection");
        SinkExt::<&str>::close(&mut framed).await
    }

    pub fn set_connected(&mut self, state: bool) {
        self.connected = state;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

// ── ConnectionInfo ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    host: String,
    port: u16,
}

impl ConnectionInfo {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_info_display() {
        let info = ConnectionInfo::new("192.168.1.20", 15471);
        assert_eq!(info.to_string(), "192.168.1.20:15471");
        assert_eq!(info.host(), "192.168.1.20");
        assert_eq!(info.port(), 15471);
    }

    #[test]
    fn connected_flag_is_independent() {
        let mut conn = EcosConnection::new();
        assert!(!conn.is_open());
        conn.set_connected(true);
        assert!(conn.is_connected());
        assert!(!conn.is_open());
    }

    #[tokio::test]
    async fn io_when_not_open() {
        let mut conn = EcosConnection::new();
        assert!(conn.read_line().await.is_none());
        assert!(matches!(
            conn.write_line("get(1, status)").await,
            Err(EcosError::NotOpen)
        ));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let mut conn = EcosConnection::new();
        conn.close().await.unwrap();
        conn.close().await.unwrap();
    }
}
