//! `dis count`: classify every day of a range and report the totals.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dis_core::jurisdiction::{self, Jurisdiction};
use dis_core::{
    DateRange, DayAggregator, DayRecord, RegionIndex, VisitNormalizer, WorkCalendar,
};
use dis_takeout::{COUNTRY_NAME_KEY, STATE_NAME_KEY, TakeoutArchive, load_boundaries};

use crate::commands::export::write_csv;
use crate::commands::report::{Summary, format_report, format_report_json};
use crate::{Config, CountArgs};

/// Result of a classification run.
#[derive(Debug)]
pub struct Classification {
    pub jurisdiction: &'static Jurisdiction,
    pub records: Vec<DayRecord>,
}

fn boundary_path<'a>(
    flag: Option<&'a PathBuf>,
    configured: Option<&'a PathBuf>,
    what: &str,
    flag_name: &str,
) -> Result<&'a Path> {
    flag.or(configured)
        .map(PathBuf::as_path)
        .with_context(|| format!("no {what} GeoJSON configured; pass {flag_name}"))
}

/// Classifies every day of the requested range.
///
/// All setup (jurisdiction, range, calendar, boundaries, offices, archive)
/// is validated before any location data is read.
pub fn classify(args: &CountArgs, config: &Config) -> Result<Classification> {
    let jurisdiction = jurisdiction::lookup(&args.state)?;
    let timezone = jurisdiction.timezone()?;
    let range = DateRange::new(args.start_date, args.end_date)?;
    let mut calendar =
        WorkCalendar::new(config.calendar()).context("invalid working holiday configuration")?;

    let states_path = boundary_path(
        args.states_geojson.as_ref(),
        config.states_geojson.as_ref(),
        "states",
        "--states-geojson",
    )?;
    let countries_path = boundary_path(
        args.countries_geojson.as_ref(),
        config.countries_geojson.as_ref(),
        "countries",
        "--countries-geojson",
    )?;
    let states = load_boundaries(states_path, STATE_NAME_KEY)
        .context("failed to load state boundaries")?;
    let countries = load_boundaries(countries_path, COUNTRY_NAME_KEY)
        .context("failed to load country boundaries")?;
    let mut regions = RegionIndex::new(states, countries, config.boundary_buffer_deg)
        .context("invalid boundary buffer")?;
    let offices = config
        .proximity_index()
        .context("invalid office configuration")?;

    let archive = TakeoutArchive::open(&args.takeout_dir)?;
    tracing::debug!(
        jurisdiction = jurisdiction.name,
        %timezone,
        start = %range.start(),
        end = %range.end(),
        days = range.len(),
        "starting classification"
    );

    let mut normalizer = VisitNormalizer::new(&mut regions, &offices, timezone);
    let mut aggregator = DayAggregator::new(range);

    let pings = archive.load_pings()?;
    aggregator.ingest_pings(&pings, &mut normalizer);
    drop(pings);

    for year in range.years() {
        let visits = archive.semantic_year(year)?;
        aggregator.ingest_visits(&visits, &mut normalizer);
    }
    tracing::info!(
        observed_days = aggregator.observations().len(),
        "collected location evidence"
    );

    let records = aggregator.reduce(&mut calendar, jurisdiction.name);
    Ok(Classification {
        jurisdiction,
        records,
    })
}

/// Runs the count command.
pub fn run(args: &CountArgs, config: &Config) -> Result<()> {
    let classification = classify(args, config)?;
    let records = &classification.records;

    if let Some(path) = &args.csv_out {
        write_csv(records, path, args.csv_layout)?;
    }

    let summary = Summary::from_records(classification.jurisdiction.name, records)
        .context("no days to report")?;
    if args.json {
        let output = format_report_json(&summary, records)?;
        println!("{output}");
    } else {
        let output = format_report(&summary);
        print!("{output}");
    }
    Ok(())
}
