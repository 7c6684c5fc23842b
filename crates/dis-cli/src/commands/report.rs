//! Summary report for `dis count`.
//!
//! This module turns the per-day classification into totals and renders them
//! in human-readable or JSON form.

use std::fmt::Write;

use anyhow::Result;
use chrono::NaiveDate;
use dis_core::{DayRecord, DayType};
use serde::Serialize;

/// Working days attributed to one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionDays {
    pub region: String,
    pub days: usize,
}

/// Number of days of each type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayTypeCounts {
    pub working: usize,
    pub vacation: usize,
    pub holiday: usize,
    pub weekend: usize,
}

impl DayTypeCounts {
    fn add(&mut self, day_type: DayType) {
        match day_type {
            DayType::Working => self.working += 1,
            DayType::Vacation => self.vacation += 1,
            DayType::Holiday => self.holiday += 1,
            DayType::Weekend => self.weekend += 1,
        }
    }
}

/// Totals over a classified period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub jurisdiction: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_working_days: usize,
    /// Most worked region first; ties keep first-seen order.
    pub working_days_by_region: Vec<RegionDays>,
    pub day_types: DayTypeCounts,
}

impl Summary {
    /// Summarizes `records`, which must be in date order.
    pub fn from_records(jurisdiction: &str, records: &[DayRecord]) -> Option<Self> {
        let start = records.first()?.date;
        let end = records.last()?.date;

        let mut day_types = DayTypeCounts::default();
        let mut by_region: Vec<RegionDays> = Vec::new();
        for record in records {
            day_types.add(record.day_type);
            if record.day_type != DayType::Working {
                continue;
            }
            if let Some(entry) = by_region.iter_mut().find(|e| e.region == record.region) {
                entry.days += 1;
            } else {
                by_region.push(RegionDays {
                    region: record.region.clone(),
                    days: 1,
                });
            }
        }
        // Stable sort keeps first-seen order among equal counts
        by_region.sort_by_key(|e| std::cmp::Reverse(e.days));

        Some(Self {
            jurisdiction: jurisdiction.to_string(),
            start,
            end,
            total_working_days: day_types.working,
            working_days_by_region: by_region,
            day_types,
        })
    }
}

// ========== Human-readable Output ==========

fn region_label(region: &str) -> &str {
    if region.is_empty() { "(unknown)" } else { region }
}

/// Formats the human-readable report output.
pub fn format_report(summary: &Summary) -> String {
    let mut output = String::new();
    writeln!(
        output,
        "DAYS IN STATE: {}, {} to {}",
        summary.jurisdiction, summary.start, summary.end
    )
    .unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Total days worked: {}", summary.total_working_days).unwrap();

    writeln!(output).unwrap();
    writeln!(output, "BY STATE").unwrap();
    writeln!(output, "────────").unwrap();
    if summary.working_days_by_region.is_empty() {
        writeln!(output, "(no working days)").unwrap();
    }
    for entry in &summary.working_days_by_region {
        writeln!(output, "{:<32}{:>5}", region_label(&entry.region), entry.days).unwrap();
    }

    let counts = &summary.day_types;
    writeln!(output).unwrap();
    writeln!(output, "DAY TYPES").unwrap();
    writeln!(output, "─────────").unwrap();
    writeln!(output, "Working:  {:>5}", counts.working).unwrap();
    writeln!(output, "Vacation: {:>5}", counts.vacation).unwrap();
    writeln!(output, "Holiday:  {:>5}", counts.holiday).unwrap();
    writeln!(output, "Weekend:  {:>5}", counts.weekend).unwrap();
    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub jurisdiction: &'a str,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_working_days: usize,
    pub working_days_by_region: &'a [RegionDays],
    pub day_types: DayTypeCounts,
    pub days: &'a [DayRecord],
}

/// Formats the summary and every day record as JSON.
pub fn format_report_json(summary: &Summary, records: &[DayRecord]) -> Result<String> {
    let report = JsonReport {
        jurisdiction: &summary.jurisdiction,
        start: summary.start,
        end: summary.end,
        total_working_days: summary.total_working_days,
        working_days_by_region: &summary.working_days_by_region,
        day_types: summary.day_types,
        days: records,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
