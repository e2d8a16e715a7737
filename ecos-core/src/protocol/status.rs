//! Typed values read from or written to the console.

use std::fmt;

// ── ConsoleStatus ────────────────────────────────────────────────

/// Run state reported by `get(1, status)`.
///
/// Kept as an enumeration rather than a boolean: the console may report
/// values other than `GO` and `STOP`, and neither of them should be
/// silently folded into the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleStatus {
    /// Track power on.
    Go,
    /// Emergency stop active.
    Stop,
    /// Any other value, upper-cased.
    Other(String),
}

impl ConsoleStatus {
    pub fn from_wire(value: &str) -> Self {
        let value = value.trim().to_uppercase();
        match value.as_str() {
            "GO" => ConsoleStatus::Go,
            "STOP" => ConsoleStatus::Stop,
            _ => ConsoleStatus::Other(value),
        }
    }

    pub fn is_go(&self) -> bool {
        matches!(self, ConsoleStatus::Go)
    }

    pub fn is_emergency_stop(&self) -> bool {
        matches!(self, ConsoleStatus::Stop)
    }
}

impl fmt::Display for ConsoleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleStatus::Go => write!(f, "GO"),
            ConsoleStatus::Stop => write!(f, "STOP"),
            ConsoleStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

// ── Direction ────────────────────────────────────────────────────

/// Train travel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    /// Wire value: `0` forward, `1` reverse.
    pub fn as_raw(self) -> u8 {
        match self {
            Direction::Forward => 0,
            Direction::Reverse => 1,
        }
    }

    /// Anything but `0` reads as reverse.
    pub fn from_raw(value: i32) -> Self {
        if value == 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Reverse => write!(f, "reverse"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" | "fwd" | "0" => Ok(Direction::Forward),
            "reverse" | "rev" | "1" => Ok(Direction::Reverse),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_from_wire() {
        assert_eq!(ConsoleStatus::from_wire("GO"), ConsoleStatus::Go);
        assert_eq!(ConsoleStatus::from_wire("Stop"), ConsoleStatus::Stop);
        assert_eq!(
            ConsoleStatus::from_wire("idle"),
            ConsoleStatus::Other("IDLE".into())
        );
    }

    #[test]
    fn unknown_status_is_neither_go_nor_stop() {
        let status = ConsoleStatus::from_wire("SHUTDOWN");
        assert!(!status.is_go());
        assert!(!status.is_emergency_stop());
    }

    #[test]
    fn direction_raw_values() {
        assert_eq!(Direction::Forward.as_raw(), 0);
        assert_eq!(Direction::Reverse.as_raw(), 1);
        assert_eq!(Direction::from_raw(0), Direction::Forward);
        assert_eq!(Direction::from_raw(7), Direction::Reverse);
    }

    #[test]
    fn direction_from_str() {
        assert_eq!("Forward".parse::<Direction>().unwrap(), Direction::Forward);
        assert_eq!("rev".parse::<Direction>().unwrap(), Direction::Reverse);
        assert!("sideways".parse::<Direction>().is_err());
    }
}
