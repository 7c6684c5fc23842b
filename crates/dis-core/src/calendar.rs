//! Working-day calendar.
//!
//! Classifies dates as weekend, holiday or working day. Each year's holiday
//! set is built on first use and kept for the life of the calendar:
//!
//! 1. Start from the US federal holidays (see [`crate::holidays`]).
//! 2. Drop the configured working holidays, including their observed dates.
//! 3. Add the day after Thanksgiving.
//! 4. Add Christmas Eve, moved to Dec 23 when Dec 24 is a Saturday and to
//!    Dec 22 when it is a Sunday.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Days, NaiveDate, Weekday};
use thiserror::Error;

use crate::holidays::{federal_holidays, is_federal_holiday_name, thanksgiving};
use crate::types::DayType;

pub const DAY_AFTER_THANKSGIVING: &str = "Day after Thanksgiving";
pub const CHRISTMAS_EVE: &str = "Christmas Eve";

/// Calendar configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// A working holiday did not name a federal holiday.
    #[error("unknown holiday name: {0}")]
    UnknownHoliday(String),
}

/// Calendar settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarConfig {
    /// Federal holidays the audited person works through.
    pub working_holidays: Vec<String>,
    /// Whether weekend holidays get a weekday substitute.
    pub observed_holidays: bool,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            working_holidays: vec!["Columbus Day".to_string(), "Veterans Day".to_string()],
            observed_holidays: true,
        }
    }
}

/// Materialized holidays of one year, date to name.
pub type HolidaySet = BTreeMap<NaiveDate, String>;

/// Weekend/holiday/working-day classifier with a per-year cache.
#[derive(Debug, Clone)]
pub struct WorkCalendar {
    config: CalendarConfig,
    years: HashMap<i32, HolidaySet>,
}

impl WorkCalendar {
    /// Creates a calendar, rejecting working holidays that name no federal
    /// holiday.
    pub fn new(config: CalendarConfig) -> Result<Self, CalendarError> {
        if let Some(unknown) = config
            .working_holidays
            .iter()
            .find(|name| !is_federal_holiday_name(name))
        {
            return Err(CalendarError::UnknownHoliday(unknown.clone()));
        }
        Ok(Self {
            config,
            years: HashMap::new(),
        })
    }

    /// Classifies `date`. Weekends win over holidays.
    ///
    /// Never returns [`DayType::Vacation`]; that is derived during
    /// aggregation.
    pub fn day_type(&mut self, date: NaiveDate) -> DayType {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return DayType::Weekend;
        }
        if self.holidays(date.year()).contains_key(&date) {
            DayType::Holiday
        } else {
            DayType::Working
        }
    }

    /// The holiday set for `year`, built on first access.
    pub fn holidays(&mut self, year: i32) -> &HolidaySet {
        let config = &self.config;
        self.years
            .entry(year)
            .or_insert_with(|| build_year(year, config))
    }

    /// Number of years materialized so far.
    pub fn cached_years(&self) -> usize {
        self.years.len()
    }
}

fn build_year(year: i32, config: &CalendarConfig) -> HolidaySet {
    let mut set = HolidaySet::new();
    for holiday in federal_holidays(year, config.observed_holidays) {
        let working = config
            .working_holidays
            .iter()
            .any(|name| name.trim().eq_ignore_ascii_case(holiday.name));
        if working {
            continue;
        }
        add_named(&mut set, holiday.date, &holiday.display_name());
    }

    if let Some(day_after) = thanksgiving(year).and_then(|d| d.checked_add_days(Days::new(1))) {
        add_named(&mut set, day_after, DAY_AFTER_THANKSGIVING);
    }

    if let Some(eve) = christmas_eve(year) {
        add_named(&mut set, eve, CHRISTMAS_EVE);
    }

    tracing::debug!(year, holidays = set.len(), "materialized holiday calendar");
    set
}

/// Christmas Eve holiday for `year`, shifted off the weekend.
pub fn christmas_eve(year: i32) -> Option<NaiveDate> {
    let eve = NaiveDate::from_ymd_opt(year, 12, 24)?;
    match eve.weekday() {
        Weekday::Sat => NaiveDate::from_ymd_opt(year, 12, 23),
        Weekday::Sun => NaiveDate::from_ymd_opt(year, 12, 22),
        _ => Some(eve),
    }
}

/// Inserts `name` for `date`, joining names that share a date.
fn add_named(set: &mut HolidaySet, date: NaiveDate, name: &str) {
    set.entry(date)
        .and_modify(|existing| {
            existing.push_str("; ");
            existing.push_str(name);
        })
        .or_insert_with(|| name.to_string());
}
