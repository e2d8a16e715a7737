//! Presentation of command results and user-facing errors.

use ecos_core::{ConsoleStatus, Direction, ErrorSink, Train};

/// What a finished command has to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Command accepted; nothing to print.
    Done,
    Status(ConsoleStatus),
    Text(String),
    Speed(u32),
    Direction(Direction),
    Function { index: u32, enabled: bool },
    Ids(Vec<String>),
    Roster { trains: Vec<Train>, json: bool },
}

impl Output {
    /// Render for stdout. `None` when there is nothing to print.
    pub fn render(&self) -> Result<Option<String>, serde_json::Error> {
        let text = match self {
            Output::Done => return Ok(None),
            Output::Status(status) => status.to_string(),
            Output::Text(text) => text.clone(),
            Output::Speed(speed) => speed.to_string(),
            Output::Direction(dir) => dir.to_string(),
            Output::Function { index, enabled } => {
                format!("f{index} {}", if *enabled { "on" } else { "off" })
            }
            Output::Ids(ids) => ids.join("\n"),
            Output::Roster { trains, json: true } => serde_json::to_string_pretty(trains)?,
            Output::Roster { trains, json: false } => render_roster(trains),
        };
        Ok(Some(text))
    }
}

fn render_roster(trains: &[Train]) -> String {
    let id_width = trains.iter().map(|t| t.id().len()).max().unwrap_or(0).max(2);
    let mut out = format!("{:<id_width$}  {:>5}  NAME", "ID", "ADDR");
    for train in trains {
        out.push('\n');
        out.push_str(&format!(
            "{:<id_width$}  {:>5}  {}",
            train.id(),
            train.address(),
            train.name()
        ));
    }
    out
}

/// Shows error messages on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSink;

impl ErrorSink for TerminalSink {
    fn display_error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}
