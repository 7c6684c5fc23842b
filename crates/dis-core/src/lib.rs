//! Core domain logic for days-in-state classification.
//!
//! This crate contains the fundamental types and logic for:
//! - Region lookup: resolving coordinates to states or foreign countries
//! - Office proximity: great-circle checks against known office locations
//! - Work calendar: weekends, federal holidays and company holidays
//! - Aggregation: reducing location evidence to one classification per day

mod aggregate;
pub mod calendar;
pub mod holidays;
pub mod jurisdiction;
mod proximity;
mod region;
pub mod types;
mod visit;

pub use aggregate::{DayAggregator, DayObservations};
pub use calendar::{CalendarConfig, CalendarError, HolidaySet, WorkCalendar};
pub use jurisdiction::{Jurisdiction, JurisdictionError};
pub use proximity::{DEFAULT_OFFICE_THRESHOLD_KM, ProximityIndex, haversine_km};
pub use region::{DEFAULT_BUFFER_DEG, OUTSIDE_US_PREFIX, RegionIndex};
pub use types::{
    DateRange, DayRecord, DayType, NormalizedVisit, Observation, Point, ValidationError,
};
pub use visit::{E7Point, MovementSegment, Ping, PlaceVisit, SemanticVisit, VisitNormalizer};
