//! Locomotive roster parsing.
//!
//! A detailed roster query (`queryObjects(10, name, addr)`) answers with
//! one line per locomotive:
//!
//! ```text
//! 1000 name["BR 218"] addr[3]
//! 1001 name["V 100"] addr[24]
//! ```
//!
//! The name is not escaped by the console, so a name containing `"]`
//! cannot be recovered exactly. Lines that do not match are kept with the
//! raw line as id and empty name/address.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TRAIN_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(\S+)\s+name\["(.*)"\]\s+addr\[([^\]]*)\]\s*$"#)
        .expect("invalid roster regex")
});

/// One locomotive known to the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Train {
    id: String,
    name: String,
    address: String,
}

impl Train {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Parse one roster line. Never fails.
pub fn parse_train(line: &str) -> Train {
    match TRAIN_LINE.captures(line) {
        Some(caps) => Train::new(&caps[1], &caps[2], &caps[3]),
        None => Train::new(line, "", ""),
    }
}

/// Parse every non-empty line of a detailed roster reply.
pub fn parse_roster(payload: &str) -> Vec<Train> {
    payload
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(parse_train)
        .collect()
}

/// Every non-empty line of an id-only roster reply, verbatim.
pub fn parse_ids(payload: &str) -> Vec<String> {
    payload
        .lines()
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
