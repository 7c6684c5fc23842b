//! Days-in-state CLI library.
//!
//! This crate provides the CLI interface for days-in-state audits.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, CountArgs, CsvLayout};
pub use config::{Config, DEFAULT_OFFICES};
