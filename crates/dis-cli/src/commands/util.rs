//! Shared utilities for CLI commands.

use chrono::NaiveDate;

/// Accepted date layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a calendar date.
///
/// Supports:
/// - ISO 8601: "2023-01-31"
/// - Slashed ISO: "2023/01/31"
/// - US style: "01/31/2023"
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .ok_or_else(|| {
            format!("Invalid date: {s}. Use YYYY-MM-DD, YYYY/MM/DD or MM/DD/YYYY")
        })
}
