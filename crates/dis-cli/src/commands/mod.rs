//! CLI subcommand implementations.

pub mod count;
pub mod export;
pub mod holidays;
pub mod report;
pub mod util;
