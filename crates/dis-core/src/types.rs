//! Core type definitions with validation.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scale factor of the fixed-point coordinates stored in location archives.
pub const E7_SCALE: f64 = 1e7;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The range ends before it starts.
    #[error("date range is inverted: {start} is after {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    /// A distance or buffer setting was negative or not finite.
    #[error("{field} must be a non-negative finite number, got {value}")]
    InvalidDistance { field: &'static str, value: f64 },
}

/// A geographic coordinate in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Converts fixed-point coordinates (degrees × 10^7) to decimal degrees.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "E7 coordinates stay well below 2^53"
    )]
    pub fn from_e7(lat_e7: i64, lng_e7: i64) -> Self {
        Self {
            lat: lat_e7 as f64 / E7_SCALE,
            lng: lng_e7 as f64 / E7_SCALE,
        }
    }

    /// Whether both components are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Classification of a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekend,
    Holiday,
    Working,
    /// A calendar working day without a confirmed office visit.
    Vacation,
}

impl DayType {
    /// Lowercase name used in JSON and daily CSV output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weekend => "weekend",
            Self::Holiday => "holiday",
            Self::Working => "working",
            Self::Vacation => "vacation",
        }
    }

    /// Single-letter code used in the month-grid report.
    #[must_use]
    pub const fn code(&self) -> char {
        match self {
            Self::Weekend => 'W',
            Self::Holiday => 'H',
            Self::Working => 'Y',
            Self::Vacation => 'V',
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekend" | "W" => Ok(Self::Weekend),
            "holiday" | "H" => Ok(Self::Holiday),
            "working" | "Y" => Ok(Self::Working),
            "vacation" | "V" => Ok(Self::Vacation),
            _ => Err(format!("invalid day type: {s}")),
        }
    }
}

/// One `(region, near_office)` sighting on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Observation {
    /// Resolved region name, empty when the location could not be resolved.
    pub region: String,
    pub near_office: bool,
}

impl Observation {
    pub fn new(region: impl Into<String>, near_office: bool) -> Self {
        Self {
            region: region.into(),
            near_office,
        }
    }
}

/// A semantic visit reduced to what day classification needs.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedVisit {
    /// Representative location (the start point for movement segments).
    pub location: Point,
    /// Resolved region name, possibly empty.
    pub region: String,
    /// Local date the visit started.
    pub start_date: NaiveDate,
    /// Local date the visit ended. May precede `start_date` for malformed input.
    pub end_date: NaiveDate,
    pub near_office: bool,
}

impl NormalizedVisit {
    /// The observation this visit contributes to its start date.
    pub fn observation(&self) -> Observation {
        Observation::new(self.region.clone(), self.near_office)
    }
}

/// Final classification of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub region: String,
    pub day_type: DayType,
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range covering `start..=end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start
            .iter_days()
            .take_while(move |d| *d <= end)
    }

    /// Number of days in the range.
    #[must_use]
    pub fn len(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs() + 1
    }

    /// Always false; a valid range holds at least one day.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Calendar years touched by the range, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + use<> {
        self.start.year()..=self.end.year()
    }
}

/// Validates a distance-like setting.
pub(crate) fn check_distance(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidDistance { field, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_point_from_e7_divides_by_scale() {
        let p = Point::from_e7(377_603_770, -1_224_131_780);
        assert!((p.lat - 37.760_377).abs() < 1e-9);
        assert!((p.lng - -122.413_178).abs() < 1e-9);
    }

    #[test]
    fn test_day_type_codes() {
        assert_eq!(DayType::Weekend.code(), 'W');
        assert_eq!(DayType::Holiday.code(), 'H');
        assert_eq!(DayType::Working.code(), 'Y');
        assert_eq!(DayType::Vacation.code(), 'V');
    }

    #[test]
    fn test_day_type_from_str() {
        assert_eq!("working".parse::<DayType>().unwrap(), DayType::Working);
        assert_eq!("V".parse::<DayType>().unwrap(), DayType::Vacation);
        assert!("sick".parse::<DayType>().is_err());
    }

    #[test]
    fn test_day_type_serializes_lowercase() {
        let json = serde_json::to_string(&DayType::Holiday).unwrap();
        assert_eq!(json, "\"holiday\"");
    }

    #[test]
    fn test_date_range_rejects_inverted() {
        let err = DateRange::new(date(2023, 1, 2), date(2023, 1, 1)).unwrap_err();
        assert!(matches!(err, ValidationError::InvertedRange { .. }));
    }

    #[test]
    fn test_date_range_days_is_inclusive() {
        let range = DateRange::new(date(2023, 1, 30), date(2023, 2, 2)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(
            days,
            vec![
                date(2023, 1, 30),
                date(2023, 1, 31),
                date(2023, 2, 1),
                date(2023, 2, 2)
            ]
        );
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_date_range_single_day() {
        let range = DateRange::new(date(2024, 2, 29), date(2024, 2, 29)).unwrap();
        assert_eq!(range.days().count(), 1);
        assert!(range.contains(date(2024, 2, 29)));
        assert!(!range.contains(date(2024, 3, 1)));
    }

    #[test]
    fn test_date_range_years_spans_boundary() {
        let range = DateRange::new(date(2022, 12, 30), date(2024, 1, 2)).unwrap();
        assert_eq!(range.years().collect::<Vec<_>>(), vec![2022, 2023, 2024]);
    }

    #[test]
    fn test_check_distance_rejects_negative_and_nan() {
        assert!(check_distance("threshold", -0.1).is_err());
        assert!(check_distance("threshold", f64::NAN).is_err());
        assert!(check_distance("threshold", 0.75).is_ok());
    }
}
