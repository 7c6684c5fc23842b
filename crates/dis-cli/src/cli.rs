//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::commands::util::parse_date;

/// Days-in-state audit.
///
/// Classifies each day of a period as worked, vacation, holiday or weekend,
/// and attributes worked days to the state they were worked from, using a
/// Google Takeout location history export.
#[derive(Debug, Parser)]
#[command(name = "dis", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Count days worked per state over a date range.
    Count(CountArgs),

    /// List the company holidays of a year.
    Holidays {
        /// Calendar year.
        #[arg(long)]
        year: i32,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Arguments of `dis count`.
#[derive(Debug, Clone, Args)]
pub struct CountArgs {
    /// Path to the extracted "Takeout" directory.
    #[arg(long)]
    pub takeout_dir: PathBuf,

    /// State performing the audit (name, postal code or FIPS code).
    #[arg(long)]
    pub state: String,

    /// First day to count.
    #[arg(long, value_parser = parse_date)]
    pub start_date: NaiveDate,

    /// Last day to count.
    #[arg(long, value_parser = parse_date)]
    pub end_date: NaiveDate,

    /// US states GeoJSON file (overrides config).
    #[arg(long)]
    pub states_geojson: Option<PathBuf>,

    /// World countries GeoJSON file (overrides config).
    #[arg(long)]
    pub countries_geojson: Option<PathBuf>,

    /// Write the per-day classification to this CSV file.
    #[arg(long)]
    pub csv_out: Option<PathBuf>,

    /// CSV layout.
    #[arg(long, value_enum, default_value_t = CsvLayout::MonthGrid)]
    pub csv_layout: CsvLayout,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// CSV output layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CsvLayout {
    /// One row per day of month, one column per month.
    MonthGrid,
    /// One row per date.
    Daily,
}
