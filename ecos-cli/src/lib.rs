//! # ecos-cli — ECoS command-line driver
//!
//! Opens one connection to an ECoS command station, runs a single
//! command against the configured train, prints the result and hangs
//! up. Host, port and train id come from a TOML config file and can be
//! overridden on the command line.

pub mod command;
pub mod config;
pub mod display;
pub mod session;
