//! `dis holidays`: list the company holidays of a year.

use std::fmt::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dis_core::{HolidaySet, WorkCalendar};
use serde::Serialize;

use crate::Config;

#[derive(Debug, Serialize)]
struct JsonHoliday<'a> {
    date: NaiveDate,
    name: &'a str,
}

/// Formats a holiday set, one `date  weekday  name` line per holiday.
pub fn format_holidays(year: i32, holidays: &HolidaySet) -> String {
    let mut output = String::new();
    writeln!(output, "HOLIDAYS {year}").unwrap();
    writeln!(output, "{}", "─".repeat(13)).unwrap();
    for (date, name) in holidays {
        writeln!(output, "{}  {}  {name}", date, date.format("%a")).unwrap();
    }
    output
}

/// Formats a holiday set as a JSON array.
pub fn format_holidays_json(holidays: &HolidaySet) -> Result<String> {
    let entries: Vec<_> = holidays
        .iter()
        .map(|(date, name)| JsonHoliday { date: *date, name })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Runs the holidays command.
pub fn run(year: i32, json: bool, config: &Config) -> Result<()> {
    let mut calendar =
        WorkCalendar::new(config.calendar()).context("invalid working holiday configuration")?;
    let holidays = calendar.holidays(year);

    if json {
        println!("{}", format_holidays_json(holidays)?);
    } else {
        print!("{}", format_holidays(year, holidays));
    }
    Ok(())
}
