//! One console session: open, run a command, close.
//!
//! In lenient mode (the default) queries degrade like a handset display:
//! an unreadable reply shows an error and falls back to a neutral value.
//! Strict mode returns the error instead.

use std::future::Future;
use std::time::Duration;

use ecos_core::{
    ConsoleStatus, Direction, EcosAdapter, EcosConnection, EcosError, ErrorSink, Fallback,
};
use tracing::{info, warn};

use crate::command::{Action, ControlMode};
use crate::config::ConsoleConfig;
use crate::display::Output;

/// A connected console plus the train it drives.
///
/// A request cut off by the deadline leaves its reply unread on the socket,
/// so after [`EcosError::Timeout`] the session hangs up. Later commands fail
/// with [`EcosError::NotOpen`]; connect a new session to carry on.
pub struct ConsoleSession {
    adapter: EcosAdapter,
    train_id: u32,
    request_timeout: Option<Duration>,
    strict: bool,
}

impl ConsoleSession {
    /// Connect to the console described by `config`.
    pub async fn connect(config: &ConsoleConfig, strict: bool) -> Result<Self, EcosError> {
        let conn_info = config.connection_info();
        info!("connecting to console at {conn_info}");

        let conn = EcosConnection::new().with_connect_timeout(config.connect_timeout());
        let mut adapter = EcosAdapter::new(conn);
        adapter.open(&conn_info).await?;
        adapter.set_connected(true);

        Ok(Self {
            adapter,
            train_id: config.train_id,
            request_timeout: config.request_timeout(),
            strict,
        })
    }

    pub fn adapter(&self) -> &EcosAdapter {
        &self.adapter
    }

    /// Run one action against the console.
    pub async fn run(
        &mut self,
        action: Action,
        sink: &dyn ErrorSink,
    ) -> Result<Output, EcosError> {
        let result = self.dispatch(action, sink).await;
        if let Err(EcosError::Timeout(d)) = &result {
            warn!("no reply within {d:?}; dropping the connection");
            self.adapter.set_connected(false);
            if let Err(e) = self.adapter.close().await {
                warn!("close failed: {e}");
            }
        }
        result
    }

    async fn dispatch(
        &mut self,
        action: Action,
        sink: &dyn ErrorSink,
    ) -> Result<Output, EcosError> {
        let id = self.train_id;
        let deadline = self.request_timeout;
        let strict = self.strict;
        let adapter = &mut self.adapter;

        let output = match action {
            Action::Status => {
                let status = with_deadline(deadline, adapter.status()).await;
                let unknown = ConsoleStatus::Other("UNKNOWN".into());
                Output::Status(degrade(strict, status, unknown, sink)?)
            }
            Action::Stop => {
                with_deadline(deadline, adapter.emergency_stop()).await?;
                Output::Done
            }
            Action::Go => {
                with_deadline(deadline, adapter.go()).await?;
                Output::Done
            }
            Action::Info => Output::Text(with_deadline(deadline, adapter.info()).await?),
            Action::Name => {
                let name = with_deadline(deadline, adapter.name(id)).await;
                Output::Text(degrade(strict, name, String::new(), sink)?)
            }
            Action::Speed { value: Some(speed) } => {
                with_deadline(deadline, adapter.set_speed(id, speed)).await?;
                Output::Done
            }
            Action::Speed { value: None } => {
                let speed = with_deadline(deadline, adapter.speed(id)).await;
                Output::Speed(degrade(strict, speed, 0, sink)?)
            }
            Action::Dir { value: Some(dir) } => {
                with_deadline(deadline, adapter.set_direction(id, dir)).await?;
                Output::Done
            }
            Action::Dir { value: None } => {
                let dir = with_deadline(deadline, adapter.direction(id)).await;
                Output::Direction(degrade(strict, dir, Direction::Reverse, sink)?)
            }
            Action::Roster { ids: true, .. } => {
                let ids = with_deadline(deadline, adapter.locomotive_ids()).await;
                Output::Ids(degrade(strict, ids, Vec::new(), sink)?)
            }
            Action::Roster { ids: false, json } => {
                let trains = with_deadline(deadline, adapter.locomotives()).await;
                Output::Roster {
                    trains: degrade(strict, trains, Vec::new(), sink)?,
                    json,
                }
            }
            Action::Func {
                index,
                state: Some(state),
            } => {
                with_deadline(deadline, adapter.set_function(id, index, state.is_on())).await?;
                Output::Done
            }
            Action::Func { index, state: None } => {
                let enabled = with_deadline(deadline, adapter.function(id, index)).await;
                Output::Function {
                    index,
                    enabled: degrade(strict, enabled, false, sink)?,
                }
            }
            Action::Control {
                mode: ControlMode::Take,
            } => {
                with_deadline(deadline, adapter.take_control(id)).await?;
                Output::Done
            }
            Action::Control {
                mode: ControlMode::Release,
            } => {
                with_deadline(deadline, adapter.release_control(id)).await?;
                Output::Done
            }
            Action::Raw { line } => {
                let reply = with_deadline(deadline, adapter.exchange_line(&line)).await?;
                Output::Text(reply.into_payload())
            }
        };
        Ok(output)
    }

    pub async fn close(mut self) -> Result<(), EcosError> {
        self.adapter.set_connected(false);
        self.adapter.close().await
    }
}

/// Bound `fut` by `deadline`, if any.
async fn with_deadline<T, F>(deadline: Option<Duration>, fut: F) -> Result<T, EcosError>
where
    F: Future<Output = Result<T, EcosError>>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| EcosError::Timeout(d))?,
        None => fut.await,
    }
}

fn degrade<T>(
    strict: bool,
    result: Result<T, EcosError>,
    default: T,
    sink: &dyn ErrorSink,
) -> Result<T, EcosError> {
    if strict {
        result
    } else {
        Ok(result.or_report(default, sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use ecos_core::NullSink;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    /// Console that answers every request with `answer`.
    async fn one_shot_console(
        answer: &'static str,
    ) -> (ConsoleConfig, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = stream.into_split();
            let mut lines = BufReader::new(read_half).lines();
            let request = lines.next_line().await.unwrap().unwrap();
            let reply = format!("<REPLY {request}>\n{answer}\n<END 0 (OK)>\n");
            write_half.write_all(reply.as_bytes()).await.unwrap();
            request
        });
        let config = ConsoleConfig {
            host: "127.0.0.1".into(),
            port,
            train_id: 3,
            ..ConsoleConfig::default()
        };
        (config, handle)
    }

    #[tokio::test]
    async fn lenient_speed_degrades_and_reports() {
        let (config, console) = one_shot_console("3 speed[bogus]").await;
        let mut session = ConsoleSession::connect(&config, false).await.unwrap();
        assert!(session.adapter().is_connected());

        let reported = Cell::new(0);
        let sink = |_: &str| reported.set(reported.get() + 1);
        let out = session.run(Action::Speed { value: None }, &sink).await.unwrap();

        assert_eq!(out, Output::Speed(0));
        assert_eq!(reported.get(), 1);
        assert_eq!(console.await.unwrap(), "get(3, speed)");
    }

    #[tokio::test]
    async fn strict_speed_returns_error() {
        let (config, console) = one_shot_console("3 speed[bogus]").await;
        let mut session = ConsoleSession::connect(&config, true).await.unwrap();

        let err = session
            .run(Action::Speed { value: None }, &NullSink)
            .await
            .unwrap_err();
        assert!(err.is_malformed_reply());
        console.await.unwrap();
    }

    #[tokio::test]
    async fn set_speed_uses_configured_train() {
        let (config, console) = one_shot_console("").await;
        let mut session = ConsoleSession::connect(&config, false).await.unwrap();

        let out = session
            .run(Action::Speed { value: Some(7) }, &NullSink)
            .await
            .unwrap();
        assert_eq!(out, Output::Done);
        assert_eq!(console.await.unwrap(), "set(3, speed[7])");
    }

    #[tokio::test]
    async fn deadline_elapses_and_session_hangs_up() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let console = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(stream);
        });
        let config = ConsoleConfig {
            host: "127.0.0.1".into(),
            port,
            request_timeout_ms: 100,
            ..ConsoleConfig::default()
        };

        let mut session = ConsoleSession::connect(&config, true).await.unwrap();
        let err = session.run(Action::Status, &NullSink).await.unwrap_err();
        assert!(matches!(err, EcosError::Timeout(_)));

        // The unread reply must not leak into the next command.
        assert!(!session.adapter().is_open());
        assert!(!session.adapter().is_connected());
        let err = session.run(Action::Status, &NullSink).await.unwrap_err();
        assert!(matches!(err, EcosError::NotOpen));
        console.abort();
    }
}
