//! Normalization of raw location events.
//!
//! Location archives describe movement in two shapes: a dwell at one place
//! ([`PlaceVisit`]) and a movement from one place to another
//! ([`MovementSegment`]). Both reduce to a [`NormalizedVisit`] carrying the
//! region to attribute the visit to, its local start/end dates and whether it
//! touched an office.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use crate::proximity::ProximityIndex;
use crate::region::RegionIndex;
use crate::types::{NormalizedVisit, Point};

/// A coordinate stored as integer degrees × 10^7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct E7Point {
    pub lat_e7: i64,
    pub lng_e7: i64,
}

impl E7Point {
    pub const fn new(lat_e7: i64, lng_e7: i64) -> Self {
        Self { lat_e7, lng_e7 }
    }

    pub fn to_point(self) -> Point {
        Point::from_e7(self.lat_e7, self.lng_e7)
    }
}

/// A raw, unsegmented location sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ping {
    /// Epoch milliseconds, UTC.
    pub timestamp_ms: i64,
    pub location: E7Point,
}

/// A dwell at a single place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceVisit {
    pub location: E7Point,
    pub start_ms: i64,
    pub end_ms: i64,
}

/// A movement between two places, optionally with the path taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementSegment {
    pub start: E7Point,
    pub end: E7Point,
    /// Intermediate points, in travel order.
    pub waypoints: Vec<E7Point>,
    pub start_ms: i64,
    pub end_ms: i64,
}

/// A pre-segmented record from the semantic timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticVisit {
    Place(PlaceVisit),
    Movement(MovementSegment),
}

/// Resolves raw events against the region and office indexes in the audit
/// timezone.
#[derive(Debug)]
pub struct VisitNormalizer<'a> {
    regions: &'a mut RegionIndex,
    offices: &'a ProximityIndex,
    timezone: Tz,
}

impl<'a> VisitNormalizer<'a> {
    pub const fn new(regions: &'a mut RegionIndex, offices: &'a ProximityIndex, timezone: Tz) -> Self {
        Self {
            regions,
            offices,
            timezone,
        }
    }

    /// Local calendar date of an epoch-millisecond timestamp, or `None` if
    /// the timestamp is out of range.
    pub fn local_date(&self, timestamp_ms: i64) -> Option<NaiveDate> {
        DateTime::from_timestamp_millis(timestamp_ms)
            .map(|utc| utc.with_timezone(&self.timezone).date_naive())
    }

    /// Trimmed region name for `point`, empty when unresolved.
    pub fn region(&mut self, point: Point) -> String {
        let region = self.regions.find_region(point);
        let trimmed = region.trim();
        if trimmed.len() == region.len() {
            region
        } else {
            trimmed.to_string()
        }
    }

    pub fn near_office(&self, point: Point) -> bool {
        self.offices.is_near_office(point)
    }

    /// Normalizes any semantic record.
    pub fn normalize(&mut self, visit: &SemanticVisit) -> Option<NormalizedVisit> {
        match visit {
            SemanticVisit::Place(place) => self.normalize_place(place),
            SemanticVisit::Movement(segment) => self.normalize_movement(segment),
        }
    }

    /// Normalizes a dwell: region and office flag both come from its single
    /// location.
    pub fn normalize_place(&mut self, visit: &PlaceVisit) -> Option<NormalizedVisit> {
        let (start_date, end_date) = self.span(visit.start_ms, visit.end_ms)?;
        let location = visit.location.to_point();
        let region = self.region(location);
        let near_office = self.near_office(location);

        Some(NormalizedVisit {
            location,
            region,
            start_date,
            end_date,
            near_office,
        })
    }

    /// Normalizes a movement.
    ///
    /// The segment is near an office when its start, end or any waypoint is.
    /// It is attributed to the start region when the start itself is near an
    /// office, otherwise to the end region.
    pub fn normalize_movement(&mut self, segment: &MovementSegment) -> Option<NormalizedVisit> {
        let (start_date, end_date) = self.span(segment.start_ms, segment.end_ms)?;
        let start = segment.start.to_point();
        let end = segment.end.to_point();

        let start_near_office = self.near_office(start);
        let near_office = start_near_office
            || self.near_office(end)
            || segment
                .waypoints
                .iter()
                .any(|waypoint| self.near_office(waypoint.to_point()));

        let region = if start_near_office {
            self.region(start)
        } else {
            self.region(end)
        };

        Some(NormalizedVisit {
            location: start,
            region,
            start_date,
            end_date,
            near_office,
        })
    }

    /// Local start/end dates. An unusable end timestamp collapses the span to
    /// the start date; an unusable start drops the record.
    fn span(&self, start_ms: i64, end_ms: i64) -> Option<(NaiveDate, NaiveDate)> {
        let Some(start_date) = self.local_date(start_ms) else {
            tracing::debug!(start_ms, "skipping visit with out-of-range start timestamp");
            return None;
        };
        let end_date = self.local_date(end_ms).unwrap_or(start_date);
        Some((start_date, end_date))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono_tz::America::Los_Angeles;

    use super::*;
    use crate::region::tests::rect;

    pub(crate) const SF_OFFICE: E7Point = E7Point::new(377_603_770, -1_224_131_780);
    pub(crate) const OAKLAND: E7Point = E7Point::new(378_044_000, -1_222_712_000);
    pub(crate) const RENO: E7Point = E7Point::new(395_296_000, -1_198_138_000);
    pub(crate) const OCEAN: E7Point = E7Point::new(300_000_000, -1_400_000_000);

    /// 2023-01-03T18:00:00Z, 10:00 in Los Angeles.
    pub(crate) const JAN_3_MORNING_MS: i64 = 1_672_768_800_000;

    pub(crate) fn west_coast() -> RegionIndex {
        RegionIndex::new(
            vec![
                ("California".to_string(), rect(32.5, -124.5, 42.0, -120.0)),
                ("Nevada".to_string(), rect(35.0, -120.0, 42.0, -114.0)),
            ],
            vec![("Mexico".to_string(), rect(14.5, -118.0, 32.5, -86.0))],
            0.0,
        )
        .unwrap()
    }

    pub(crate) fn sf_office() -> ProximityIndex {
        ProximityIndex::new(vec![SF_OFFICE.to_point()], 0.75).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_local_date_uses_audit_timezone() {
        let mut regions = west_coast();
        let offices = sf_office();
        let normalizer = VisitNormalizer::new(&mut regions, &offices, Los_Angeles);
        // 2023-01-04T05:00:00Z is still Jan 3 in Los Angeles
        assert_eq!(
            normalizer.local_date(1_672_808_400_000),
            Some(date(2023, 1, 3))
        );
        assert_eq!(normalizer.local_date(i64::MAX), None);
    }

    #[test]
    fn test_place_visit_at_office() {
        let mut regions = west_coast();
        let offices = sf_office();
        let mut normalizer = VisitNormalizer::new(&mut regions, &offices, Los_Angeles);

        let visit = normalizer
            .normalize_place(&PlaceVisit {
                location: SF_OFFICE,
                start_ms: JAN_3_MORNING_MS,
                end_ms: JAN_3_MORNING_MS + 8 * 3_600_000,
            })
            .unwrap();

        assert_eq!(visit.region, "California");
        assert!(visit.near_office);
        assert_eq!(visit.start_date, date(2023, 1, 3));
        assert_eq!(visit.end_date, date(2023, 1, 3));
    }

    #[test]
    fn test_place_visit_unresolved_region_is_empty() {
        let mut regions = west_coast();
        let offices = sf_office();
        let mut normalizer = VisitNormalizer::new(&mut regions, &offices, Los_Angeles);

        let visit = normalizer
            .normalize_place(&PlaceVisit {
                location: OCEAN,
                start_ms: JAN_3_MORNING_MS,
                end_ms: JAN_3_MORNING_MS,
            })
            .unwrap();
        assert_eq!(visit.region, "");
        assert!(!visit.near_office);
    }

    #[test]
    fn test_inverted_span_does_not_fail() {
        let mut regions = west_coast();
        let offices = sf_office();
        let mut normalizer = VisitNormalizer::new(&mut regions, &offices, Los_Angeles);

        let visit = normalizer
            .normalize_place(&PlaceVisit {
                location: RENO,
                start_ms: JAN_3_MORNING_MS,
                end_ms: JAN_3_MORNING_MS - 3 * 86_400_000,
            })
            .unwrap();
        assert_eq!(visit.start_date, date(2023, 1, 3));
        assert_eq!(visit.end_date, date(2022, 12, 31));
        assert_eq!(visit.region, "Nevada");
    }

    #[test]
    fn test_out_of_range_start_is_skipped() {
        let mut regions = west_coast();
        let offices = sf_office();
        let mut normalizer = VisitNormalizer::new(&mut regions, &offices, Los_Angeles);

        assert!(
            normalizer
                .normalize_place(&PlaceVisit {
                    location: RENO,
                    start_ms: i64::MIN,
                    end_ms: JAN_3_MORNING_MS,
                })
                .is_none()
        );
    }

    #[test]
    fn test_movement_from_office_uses_start_region() {
        let mut regions = west_coast();
        let offices = sf_office();
        let mut normalizer = VisitNormalizer::new(&mut regions, &offices, Los_Angeles);

        let visit = normalizer
            .normalize_movement(&MovementSegment {
                start: SF_OFFICE,
                end: RENO,
                waypoints: vec![],
                start_ms: JAN_3_MORNING_MS,
                end_ms: JAN_3_MORNING_MS + 4 * 3_600_000,
            })
            .unwrap();
        assert_eq!(visit.region, "California");
        assert!(visit.near_office);
        assert_eq!(visit.location, SF_OFFICE.to_point());
    }

    #[test]
    fn test_movement_to_office_uses_end_region() {
        let mut regions = west_coast();
        let offices = sf_office();
        let mut normalizer = VisitNormalizer::new(&mut regions, &offices, Los_Angeles);

        let visit = normalizer
            .normalize_movement(&MovementSegment {
                start: RENO,
                end: SF_OFFICE,
                waypoints: vec![],
                start_ms: JAN_3_MORNING_MS,
                end_ms: JAN_3_MORNING_MS + 4 * 3_600_000,
            })
            .unwrap();
        assert_eq!(visit.region, "California");
        assert!(visit.near_office);
    }

    #[test]
    fn test_movement_without_office_uses_end_region() {
        let mut regions = west_coast();
        let offices = sf_office();
        let mut normalizer = VisitNormalizer::new(&mut regions, &offices, Los_Angeles);

        let visit = normalizer
            .normalize_movement(&MovementSegment {
                start: OAKLAND,
                end: RENO,
                waypoints: vec![],
                start_ms: JAN_3_MORNING_MS,
                end_ms: JAN_3_MORNING_MS + 4 * 3_600_000,
            })
            .unwrap();
        assert_eq!(visit.region, "Nevada");
        assert!(!visit.near_office);
    }

    #[test]
    fn test_movement_through_office_waypoint_is_near_office() {
        let mut regions = west_coast();
        let offices = sf_office();
        let mut normalizer = VisitNormalizer::new(&mut regions, &offices, Los_Angeles);

        let visit = normalizer
            .normalize_movement(&MovementSegment {
                start: OAKLAND,
                end: RENO,
                waypoints: vec![OAKLAND, SF_OFFICE, RENO],
                start_ms: JAN_3_MORNING_MS,
                end_ms: JAN_3_MORNING_MS + 4 * 3_600_000,
            })
            .unwrap();
        assert!(visit.near_office);
        // Start is not the office, so the end region wins
        assert_eq!(visit.region, "Nevada");
    }

    #[test]
    fn test_normalize_dispatches_on_shape() {
        let mut regions = west_coast();
        let offices = sf_office();
        let mut normalizer = VisitNormalizer::new(&mut regions, &offices, Los_Angeles);

        let place = SemanticVisit::Place(PlaceVisit {
            location: RENO,
            start_ms: JAN_3_MORNING_MS,
            end_ms: JAN_3_MORNING_MS,
        });
        assert_eq!(normalizer.normalize(&place).unwrap().region, "Nevada");
    }
}
