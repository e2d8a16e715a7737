//! Subcommands accepted by the `ecos` binary.

use clap::{Subcommand, ValueEnum};
use ecos_core::Direction;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show the console run state (GO / STOP).
    Status,
    /// Emergency stop: cut track power.
    Stop,
    /// Restore track power.
    Go,
    /// Print the console information block.
    Info,
    /// Print the train's name.
    Name,
    /// Read the train speed, or set it when a value is given.
    Speed { value: Option<u32> },
    /// Read the train direction, or set it.
    Dir { value: Option<Direction> },
    /// List locomotives known to the console.
    Roster {
        /// Only list object ids.
        #[arg(long)]
        ids: bool,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Read a function button, or switch it.
    Func { index: u32, state: Option<Switch> },
    /// Take or release control of the train.
    Control { mode: ControlMode },
    /// Send one raw request line and print the reply payload.
    Raw { line: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn is_on(self) -> bool {
        self == Switch::On
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Take,
    Release,
}
