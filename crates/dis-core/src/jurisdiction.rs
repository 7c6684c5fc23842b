//! Audit jurisdictions and their local timezones.
//!
//! A run classifies days in the local time of the audited jurisdiction's
//! capital. Lookups accept the full name, the postal abbreviation or the
//! two-digit FIPS code.

use chrono_tz::Tz;
use thiserror::Error;

/// Jurisdiction lookup errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JurisdictionError {
    #[error("unknown jurisdiction: {0}")]
    Unknown(String),

    #[error("invalid timezone {timezone} for {jurisdiction}")]
    InvalidTimezone {
        jurisdiction: &'static str,
        timezone: &'static str,
    },
}

/// A US state or state-level territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jurisdiction {
    /// Name as it appears in boundary reference data.
    pub name: &'static str,
    pub abbr: &'static str,
    pub fips: &'static str,
    /// IANA timezone of the capital.
    pub capital_tz: &'static str,
}

impl Jurisdiction {
    /// Parses the capital timezone.
    pub fn timezone(&self) -> Result<Tz, JurisdictionError> {
        self.capital_tz
            .parse::<Tz>()
            .map_err(|_| JurisdictionError::InvalidTimezone {
                jurisdiction: self.name,
                timezone: self.capital_tz,
            })
    }
}

const fn j(
    name: &'static str,
    abbr: &'static str,
    fips: &'static str,
    capital_tz: &'static str,
) -> Jurisdiction {
    Jurisdiction {
        name,
        abbr,
        fips,
        capital_tz,
    }
}

/// The 50 states, the District of Columbia and Puerto Rico.
pub const JURISDICTIONS: &[Jurisdiction] = &[
    j("Alabama", "AL", "01", "America/Chicago"),
    j("Alaska", "AK", "02", "America/Juneau"),
    j("Arizona", "AZ", "04", "America/Phoenix"),
    j("Arkansas", "AR", "05", "America/Chicago"),
    j("California", "CA", "06", "America/Los_Angeles"),
    j("Colorado", "CO", "08", "America/Denver"),
    j("Connecticut", "CT", "09", "America/New_York"),
    j("Delaware", "DE", "10", "America/New_York"),
    j("District of Columbia", "DC", "11", "America/New_York"),
    j("Florida", "FL", "12", "America/New_York"),
    j("Georgia", "GA", "13", "America/New_York"),
    j("Hawaii", "HI", "15", "Pacific/Honolulu"),
    j("Idaho", "ID", "16", "America/Boise"),
    j("Illinois", "IL", "17", "America/Chicago"),
    j("Indiana", "IN", "18", "America/Indiana/Indianapolis"),
    j("Iowa", "IA", "19", "America/Chicago"),
    j("Kansas", "KS", "20", "America/Chicago"),
    j("Kentucky", "KY", "21", "America/New_York"),
    j("Louisiana", "LA", "22", "America/Chicago"),
    j("Maine", "ME", "23", "America/New_York"),
    j("Maryland", "MD", "24", "America/New_York"),
    j("Massachusetts", "MA", "25", "America/New_York"),
    j("Michigan", "MI", "26", "America/Detroit"),
    j("Minnesota", "MN", "27", "America/Chicago"),
    j("Mississippi", "MS", "28", "America/Chicago"),
    j("Missouri", "MO", "29", "America/Chicago"),
    j("Montana", "MT", "30", "America/Denver"),
    j("Nebraska", "NE", "31", "America/Chicago"),
    j("Nevada", "NV", "32", "America/Los_Angeles"),
    j("New Hampshire", "NH", "33", "America/New_York"),
    j("New Jersey", "NJ", "34", "America/New_York"),
    j("New Mexico", "NM", "35", "America/Denver"),
    j("New York", "NY", "36", "America/New_York"),
    j("North Carolina", "NC", "37", "America/New_York"),
    j("North Dakota", "ND", "38", "America/Chicago"),
    j("Ohio", "OH", "39", "America/New_York"),
    j("Oklahoma", "OK", "40", "America/Chicago"),
    j("Oregon", "OR", "41", "America/Los_Angeles"),
    j("Pennsylvania", "PA", "42", "America/New_York"),
    j("Rhode Island", "RI", "44", "America/New_York"),
    j("South Carolina", "SC", "45", "America/New_York"),
    j("South Dakota", "SD", "46", "America/Chicago"),
    j("Tennessee", "TN", "47", "America/Chicago"),
    j("Texas", "TX", "48", "America/Chicago"),
    j("Utah", "UT", "49", "America/Denver"),
    j("Vermont", "VT", "50", "America/New_York"),
    j("Virginia", "VA", "51", "America/New_York"),
    j("Washington", "WA", "53", "America/Los_Angeles"),
    j("West Virginia", "WV", "54", "America/New_York"),
    j("Wisconsin", "WI", "55", "America/Chicago"),
    j("Wyoming", "WY", "56", "America/Denver"),
    j("Puerto Rico", "PR", "72", "America/Puerto_Rico"),
];

/// Finds a jurisdiction by name, abbreviation or FIPS code.
pub fn lookup(id: &str) -> Result<&'static Jurisdiction, JurisdictionError> {
    let id = id.trim();
    JURISDICTIONS
        .iter()
        .find(|j| {
            j.name.eq_ignore_ascii_case(id) || j.abbr.eq_ignore_ascii_case(id) || j.fips == id
        })
        .ok_or_else(|| JurisdictionError::Unknown(id.to_string()))
}
