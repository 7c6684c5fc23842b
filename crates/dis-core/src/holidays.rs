//! US federal public holidays.
//!
//! Fixed-date holidays that fall on a Saturday are observed on the preceding
//! Friday; on a Sunday, the following Monday. A New Year's Day observed on
//! December 31 belongs to the earlier year.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Names of the standard federal holidays, in calendar order.
pub const FEDERAL_HOLIDAY_NAMES: &[&str] = &[
    NEW_YEARS_DAY,
    MLK_DAY,
    WASHINGTONS_BIRTHDAY,
    MEMORIAL_DAY,
    JUNETEENTH,
    INDEPENDENCE_DAY,
    LABOR_DAY,
    COLUMBUS_DAY,
    VETERANS_DAY,
    THANKSGIVING,
    CHRISTMAS_DAY,
];

pub const NEW_YEARS_DAY: &str = "New Year's Day";
pub const MLK_DAY: &str = "Martin Luther King Jr. Day";
pub const WASHINGTONS_BIRTHDAY: &str = "Washington's Birthday";
pub const MEMORIAL_DAY: &str = "Memorial Day";
pub const JUNETEENTH: &str = "Juneteenth National Independence Day";
pub const INDEPENDENCE_DAY: &str = "Independence Day";
pub const LABOR_DAY: &str = "Labor Day";
pub const COLUMBUS_DAY: &str = "Columbus Day";
pub const VETERANS_DAY: &str = "Veterans Day";
pub const THANKSGIVING: &str = "Thanksgiving";
pub const CHRISTMAS_DAY: &str = "Christmas Day";

/// A single holiday occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holiday {
    pub date: NaiveDate,
    /// Name of the holiday this occurrence belongs to.
    pub name: &'static str,
    /// True when this is the weekday substitute for a weekend holiday.
    pub observed: bool,
}

impl Holiday {
    const fn actual(date: NaiveDate, name: &'static str) -> Self {
        Self {
            date,
            name,
            observed: false,
        }
    }

    /// Name including the `(observed)` marker where applicable.
    pub fn display_name(&self) -> String {
        if self.observed {
            format!("{} (observed)", self.name)
        } else {
            self.name.to_string()
        }
    }
}

/// Returns the `n`th (1-based) `weekday` of `month`.
pub fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

/// Returns the last `weekday` of `month`.
pub fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let mut day = first_of_next.pred_opt()?;
    while day.weekday() != weekday {
        day = day.pred_opt()?;
    }
    Some(day)
}

/// Fourth Thursday of November.
pub fn thanksgiving(year: i32) -> Option<NaiveDate> {
    nth_weekday(year, 11, Weekday::Thu, 4)
}

/// Weekday substitute for a holiday falling on a weekend.
fn observed_date(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => date.checked_sub_days(Days::new(1)),
        Weekday::Sun => date.checked_add_days(Days::new(1)),
        _ => None,
    }
}

/// Federal holidays for `year`.
///
/// With `with_observed`, weekend fixed-date holidays also yield an observed
/// weekday entry (the actual date stays in the list).
pub fn federal_holidays(year: i32, with_observed: bool) -> Vec<Holiday> {
    let mut holidays = Vec::with_capacity(16);
    let fixed = |holidays: &mut Vec<Holiday>, month: u32, day: u32, name: &'static str| {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            return;
        };
        holidays.push(Holiday::actual(date, name));
        if with_observed {
            if let Some(observed) = observed_date(date).filter(|d| d.year() == year) {
                holidays.push(Holiday {
                    date: observed,
                    name,
                    observed: true,
                });
            }
        }
    };

    fixed(&mut holidays, 1, 1, NEW_YEARS_DAY);
    if year >= 1986 {
        if let Some(date) = nth_weekday(year, 1, Weekday::Mon, 3) {
            holidays.push(Holiday::actual(date, MLK_DAY));
        }
    }
    if let Some(date) = nth_weekday(year, 2, Weekday::Mon, 3) {
        holidays.push(Holiday::actual(date, WASHINGTONS_BIRTHDAY));
    }
    if let Some(date) = last_weekday(year, 5, Weekday::Mon) {
        holidays.push(Holiday::actual(date, MEMORIAL_DAY));
    }
    if year >= 2021 {
        fixed(&mut holidays, 6, 19, JUNETEENTH);
    }
    fixed(&mut holidays, 7, 4, INDEPENDENCE_DAY);
    if let Some(date) = nth_weekday(year, 9, Weekday::Mon, 1) {
        holidays.push(Holiday::actual(date, LABOR_DAY));
    }
    if let Some(date) = nth_weekday(year, 10, Weekday::Mon, 2) {
        holidays.push(Holiday::actual(date, COLUMBUS_DAY));
    }
    fixed(&mut holidays, 11, 11, VETERANS_DAY);
    if let Some(date) = thanksgiving(year) {
        holidays.push(Holiday::actual(date, THANKSGIVING));
    }
    fixed(&mut holidays, 12, 25, CHRISTMAS_DAY);

    // Next year's New Year's Day on a Saturday is observed on Dec 31 of this year.
    if with_observed {
        if let Some(next_new_year) = NaiveDate::from_ymd_opt(year + 1, 1, 1) {
            if next_new_year.weekday() == Weekday::Sat {
                if let Some(dec_31) = next_new_year.pred_opt() {
                    holidays.push(Holiday {
                        date: dec_31,
                        name: NEW_YEARS_DAY,
                        observed: true,
                    });
                }
            }
        }
    }

    holidays.sort_by_key(|h| h.date);
    holidays
}

/// Whether `name` matches a standard federal holiday (case-insensitive).
pub fn is_federal_holiday_name(name: &str) -> bool {
    FEDERAL_HOLIDAY_NAMES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(name.trim()))
}
