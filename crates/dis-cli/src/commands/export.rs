//! CSV export of day classifications.

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Datelike;
use dis_core::{DayRecord, DayType};

use crate::CsvLayout;

const MONTH_ABBRS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Writes one row per date: `date,region,day_type`.
pub fn write_daily<W: io::Write>(records: &[DayRecord], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["date", "region", "day_type"])?;
    for record in records {
        csv.write_record([
            record.date.to_string().as_str(),
            record.region.as_str(),
            record.day_type.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes a calendar grid: one row per day of month, one column per month.
///
/// Cells hold `<region>,<code>` and stay blank on weekends and on dates
/// outside the records. Later records overwrite earlier ones on the same
/// month and day, so a multi-year range shows its final year.
pub fn write_month_grid<W: io::Write>(records: &[DayRecord], writer: W) -> Result<()> {
    let mut grid = vec![vec![String::new(); MONTH_ABBRS.len()]; 31];
    for record in records {
        let row = record.date.day0() as usize;
        let column = record.date.month0() as usize;
        grid[row][column] = if record.day_type == DayType::Weekend {
            String::new()
        } else {
            format!("{},{}", record.region, record.day_type.code())
        };
    }

    let mut csv = csv::Writer::from_writer(writer);
    let header: Vec<&str> = std::iter::once("Day").chain(MONTH_ABBRS).collect();
    csv.write_record(&header)?;
    for (day0, cells) in grid.iter().enumerate() {
        let day = (day0 + 1).to_string();
        csv.write_record(std::iter::once(day.as_str()).chain(cells.iter().map(String::as_str)))?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes `records` to `path` in the requested layout.
pub fn write_csv(records: &[DayRecord], path: &Path, layout: CsvLayout) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create CSV file {}", path.display()))?;
    match layout {
        CsvLayout::MonthGrid => write_month_grid(records, file),
        CsvLayout::Daily => write_daily(records, file),
    }
    .with_context(|| format!("failed to write CSV file {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = records.len(), "wrote CSV");
    Ok(())
}
