//! Per-day aggregation of location evidence.
//!
//! Observations from the ping stream and the semantic timeline are folded
//! into one [`DayObservations`] map, then reduced against the
//! [`WorkCalendar`] into exactly one [`DayRecord`] per requested date.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::calendar::WorkCalendar;
use crate::types::{DateRange, DayRecord, DayType, NormalizedVisit, Observation};
use crate::visit::{Ping, SemanticVisit, VisitNormalizer};

/// Distinct `(region, near_office)` observations per date.
///
/// Each day keeps its observations in first-seen order, so the reduction's
/// fallback choice is reproducible across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayObservations {
    days: BTreeMap<NaiveDate, Vec<Observation>>,
}

impl DayObservations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `observation` for `date`. Returns false if it was already
    /// present.
    pub fn insert(&mut self, date: NaiveDate, observation: Observation) -> bool {
        let day = self.days.entry(date).or_default();
        if day.contains(&observation) {
            return false;
        }
        day.push(observation);
        true
    }

    /// Whether `date` already has an office observation in `region`.
    pub fn has_office_visit(&self, date: NaiveDate, region: &str) -> bool {
        self.days
            .get(&date)
            .is_some_and(|day| day.iter().any(|o| o.near_office && o.region == region))
    }

    /// Observations for `date`, in first-seen order.
    pub fn get(&self, date: NaiveDate) -> Option<&[Observation]> {
        self.days.get(&date).map(Vec::as_slice)
    }

    /// Number of dates with at least one observation.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Collects observations for a date range and reduces them to day records.
#[derive(Debug, Clone)]
pub struct DayAggregator {
    range: DateRange,
    observations: DayObservations,
}

impl DayAggregator {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            observations: DayObservations::new(),
        }
    }

    pub const fn observations(&self) -> &DayObservations {
        &self.observations
    }

    /// Folds raw pings into the observation map, returning how many new
    /// observations were recorded.
    ///
    /// Pings outside the range are ignored. A ping in a region that already
    /// has an office observation that day is skipped before the office check,
    /// so a noisy ping never downgrades a known office day.
    pub fn ingest_pings(&mut self, pings: &[Ping], normalizer: &mut VisitNormalizer<'_>) -> usize {
        let mut added = 0;
        for ping in pings {
            let Some(date) = normalizer.local_date(ping.timestamp_ms) else {
                tracing::debug!(timestamp_ms = ping.timestamp_ms, "skipping ping with bad timestamp");
                continue;
            };
            if !self.range.contains(date) {
                continue;
            }

            let location = ping.location.to_point();
            let region = normalizer.region(location);
            if self.observations.has_office_visit(date, &region) {
                continue;
            }
            let near_office = normalizer.near_office(location);
            if self.observations.insert(date, Observation::new(region, near_office)) {
                added += 1;
            }
        }
        tracing::debug!(pings = pings.len(), added, "ingested pings");
        added
    }

    /// Normalizes and folds semantic visits, returning how many new
    /// observations were recorded.
    pub fn ingest_visits(
        &mut self,
        visits: &[SemanticVisit],
        normalizer: &mut VisitNormalizer<'_>,
    ) -> usize {
        let mut added = 0;
        for visit in visits {
            if let Some(normalized) = normalizer.normalize(visit) {
                if self.ingest_normalized(&normalized) {
                    added += 1;
                }
            }
        }
        tracing::debug!(visits = visits.len(), added, "ingested semantic visits");
        added
    }

    /// Records one normalized visit against its start date.
    pub fn ingest_normalized(&mut self, visit: &NormalizedVisit) -> bool {
        if !self.range.contains(visit.start_date) {
            return false;
        }
        self.observations.insert(visit.start_date, visit.observation())
    }

    /// Reduces the collected observations into one record per date.
    ///
    /// `audit_region` seeds the carried-forward region. The carried region
    /// only moves on working days confirmed by an office observation.
    pub fn reduce(&self, calendar: &mut WorkCalendar, audit_region: &str) -> Vec<DayRecord> {
        let mut records = Vec::with_capacity(usize::try_from(self.range.len()).unwrap_or(0));
        let mut last_region = audit_region.to_string();

        for date in self.range.days() {
            let day_type = calendar.day_type(date);
            let observations = self.observations.get(date).unwrap_or_default();

            let Some(first) = observations.first() else {
                records.push(DayRecord {
                    date,
                    region: last_region.clone(),
                    day_type,
                });
                continue;
            };

            let office_visit = if day_type == DayType::Working {
                observations.iter().find(|o| o.near_office)
            } else {
                None
            };

            if let Some(visit) = office_visit {
                if !visit.region.is_empty() {
                    last_region.clone_from(&visit.region);
                }
                records.push(DayRecord {
                    date,
                    region: last_region.clone(),
                    day_type: DayType::Working,
                });
            } else {
                let region = if first.region.is_empty() {
                    last_region.clone()
                } else {
                    first.region.clone()
                };
                let day_type = if day_type == DayType::Working {
                    DayType::Vacation
                } else {
                    day_type
                };
                records.push(DayRecord {
                    date,
                    region,
                    day_type,
                });
            }
        }
        records
    }
}
