//! Wire formats of the Location History export.
//!
//! Every record is decoded independently from a raw JSON slice so that one
//! malformed entry costs only that entry.

use chrono::DateTime;
use dis_core::{E7Point, MovementSegment, Ping, PlaceVisit, SemanticVisit};
use serde::Deserialize;
use serde_json::value::RawValue;

/// Top level of `Location History.json` / `Records.json`.
#[derive(Debug, Deserialize)]
pub(crate) struct LocationHistory<'a> {
    #[serde(default, borrow)]
    pub locations: Vec<&'a RawValue>,
}

/// Top level of a `Semantic Location History/<year>/<year>_<MONTH>.json` file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TimelineMonth<'a> {
    #[serde(default, borrow)]
    pub timeline_objects: Vec<&'a RawValue>,
}

/// Epoch milliseconds, written as a number by some exports and as a string
/// by others.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Millis {
    Number(i64),
    Text(String),
}

impl Millis {
    fn value(&self) -> Option<i64> {
        match self {
            Self::Number(ms) => Some(*ms),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Picks the millisecond field, falling back to an RFC 3339 timestamp.
fn resolve_timestamp(ms: Option<&Millis>, rfc3339: Option<&str>) -> Option<i64> {
    ms.and_then(Millis::value).or_else(|| {
        rfc3339
            .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
            .map(|dt| dt.timestamp_millis())
    })
}

/// A location as it appears in pings and semantic records.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawLocation {
    pub latitude_e7: Option<i64>,
    pub longitude_e7: Option<i64>,
    pub timestamp_ms: Option<Millis>,
    pub timestamp: Option<String>,
}

impl RawLocation {
    fn point(&self) -> Option<E7Point> {
        Some(E7Point::new(self.latitude_e7?, self.longitude_e7?))
    }

    pub fn into_ping(self) -> Option<Ping> {
        let location = self.point()?;
        let timestamp_ms = resolve_timestamp(self.timestamp_ms.as_ref(), self.timestamp.as_deref())?;
        Some(Ping {
            timestamp_ms,
            location,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawDuration {
    pub start_timestamp_ms: Option<Millis>,
    pub end_timestamp_ms: Option<Millis>,
    pub start_timestamp: Option<String>,
    pub end_timestamp: Option<String>,
}

impl RawDuration {
    /// `(start, end)` in epoch milliseconds. A missing end mirrors the start.
    fn span(&self) -> Option<(i64, i64)> {
        let start = resolve_timestamp(
            self.start_timestamp_ms.as_ref(),
            self.start_timestamp.as_deref(),
        )?;
        let end = resolve_timestamp(self.end_timestamp_ms.as_ref(), self.end_timestamp.as_deref())
            .unwrap_or(start);
        Some((start, end))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPlaceVisit {
    pub location: Option<RawLocation>,
    #[serde(default)]
    pub duration: RawDuration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawWaypoint {
    pub lat_e7: i64,
    pub lng_e7: i64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawWaypointPath {
    #[serde(default)]
    pub waypoints: Vec<RawWaypoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawActivitySegment {
    pub start_location: Option<RawLocation>,
    pub end_location: Option<RawLocation>,
    #[serde(default)]
    pub waypoint_path: RawWaypointPath,
    #[serde(default)]
    pub duration: RawDuration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TimelineObject {
    pub place_visit: Option<RawPlaceVisit>,
    pub activity_segment: Option<RawActivitySegment>,
}

impl TimelineObject {
    /// Converts to a core record. Objects without a usable location or start
    /// time yield `None`.
    pub fn into_visit(self) -> Option<SemanticVisit> {
        if let Some(place) = self.place_visit {
            let location = place.location?.point()?;
            let (start_ms, end_ms) = place.duration.span()?;
            return Some(SemanticVisit::Place(PlaceVisit {
                location,
                start_ms,
                end_ms,
            }));
        }

        let segment = self.activity_segment?;
        let start = segment.start_location?.point()?;
        let end = segment
            .end_location
            .and_then(|end| end.point())
            .unwrap_or(start);
        let (start_ms, end_ms) = segment.duration.span()?;
        let waypoints = segment
            .waypoint_path
            .waypoints
            .iter()
            .map(|w| E7Point::new(w.lat_e7, w.lng_e7))
            .collect();

        Some(SemanticVisit::Movement(MovementSegment {
            start,
            end,
            waypoints,
            start_ms,
            end_ms,
        }))
    }
}

/// Decodes every usable ping in a location history document.
pub fn parse_pings(json: &str) -> Result<Vec<Ping>, serde_json::Error> {
    let history: LocationHistory<'_> = serde_json::from_str(json)?;
    let total = history.locations.len();
    let pings: Vec<Ping> = history
        .locations
        .into_iter()
        .filter_map(|raw| match serde_json::from_str::<RawLocation>(raw.get()) {
            Ok(location) => location.into_ping(),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed location record");
                None
            }
        })
        .collect();
    if pings.len() < total {
        tracing::debug!(skipped = total - pings.len(), "skipped unusable pings");
    }
    Ok(pings)
}

/// Decodes every usable record in one month of semantic history, in file
/// order.
pub fn parse_timeline_month(json: &str) -> Result<Vec<SemanticVisit>, serde_json::Error> {
    let month: TimelineMonth<'_> = serde_json::from_str(json)?;
    Ok(month
        .timeline_objects
        .into_iter()
        .filter_map(|raw| match serde_json::from_str::<TimelineObject>(raw.get()) {
            Ok(object) => object.into_visit(),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed timeline object");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pings_accept_numeric_string_and_rfc3339_timestamps() {
        let json = r#"{"locations": [
            {"latitudeE7": 377603770, "longitudeE7": -1224131780, "timestampMs": "1672768800000"},
            {"latitudeE7": 377603770, "longitudeE7": -1224131780, "timestampMs": 1672768800001},
            {"latitudeE7": 377603770, "longitudeE7": -1224131780, "timestamp": "2023-01-03T18:00:00.002Z"}
        ]}"#;
        let pings = parse_pings(json).unwrap();
        let stamps: Vec<_> = pings.iter().map(|p| p.timestamp_ms).collect();
        assert_eq!(stamps, vec![1_672_768_800_000, 1_672_768_800_001, 1_672_768_800_002]);
        assert_eq!(pings[0].location, E7Point::new(377_603_770, -1_224_131_780));
    }

    #[test]
    fn test_malformed_pings_are_skipped_individually() {
        let json = r#"{"locations": [
            {"latitudeE7": 1, "longitudeE7": 2},
            {"latitudeE7": "north", "longitudeE7": 2, "timestampMs": "5"},
            {"longitudeE7": 2, "timestampMs": "5"},
            {"latitudeE7": 1, "longitudeE7": 2, "timestampMs": "not-a-number"},
            {"latitudeE7": 1, "longitudeE7": 2, "timestampMs": "7"}
        ]}"#;
        let pings = parse_pings(json).unwrap();
        assert_eq!(pings.len(), 1);
        assert_eq!(pings[0].timestamp_ms, 7);
    }

    #[test]
    fn test_empty_history_has_no_pings() {
        assert!(parse_pings("{}").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_document_is_an_error() {
        assert!(parse_pings("[1, 2").is_err());
    }

    #[test]
    fn test_timeline_month_parses_both_shapes_in_order() {
        let json = r#"{"timelineObjects": [
            {"activitySegment": {
                "startLocation": {"latitudeE7": 1, "longitudeE7": 2},
                "endLocation": {"latitudeE7": 3, "longitudeE7": 4},
                "waypointPath": {"waypoints": [{"latE7": 5, "lngE7": 6}]},
                "duration": {"startTimestampMs": "100", "endTimestampMs": "200"}
            }},
            {"placeVisit": {
                "location": {"latitudeE7": 3, "longitudeE7": 4, "name": "Office"},
                "duration": {"startTimestamp": "1970-01-01T00:00:00.300Z", "endTimestamp": "1970-01-01T00:00:00.400Z"}
            }}
        ]}"#;
        let visits = parse_timeline_month(json).unwrap();
        assert_eq!(
            visits,
            vec![
                SemanticVisit::Movement(MovementSegment {
                    start: E7Point::new(1, 2),
                    end: E7Point::new(3, 4),
                    waypoints: vec![E7Point::new(5, 6)],
                    start_ms: 100,
                    end_ms: 200,
                }),
                SemanticVisit::Place(PlaceVisit {
                    location: E7Point::new(3, 4),
                    start_ms: 300,
                    end_ms: 400,
                }),
            ]
        );
    }

    #[test]
    fn test_place_visit_without_location_is_skipped() {
        let json = r#"{"timelineObjects": [
            {"placeVisit": {"duration": {"startTimestampMs": "1", "endTimestampMs": "2"}}},
            {"placeVisit": {"location": {"name": "no coordinates"},
                            "duration": {"startTimestampMs": "1", "endTimestampMs": "2"}}}
        ]}"#;
        assert!(parse_timeline_month(json).unwrap().is_empty());
    }

    #[test]
    fn test_activity_without_start_coordinates_is_skipped() {
        let json = r#"{"timelineObjects": [
            {"activitySegment": {"startLocation": {}, "endLocation": {"latitudeE7": 3, "longitudeE7": 4},
                                 "duration": {"startTimestampMs": "1", "endTimestampMs": "2"}}}
        ]}"#;
        assert!(parse_timeline_month(json).unwrap().is_empty());
    }

    #[test]
    fn test_activity_without_end_location_ends_where_it_started() {
        let json = r#"{"timelineObjects": [
            {"activitySegment": {"startLocation": {"latitudeE7": 1, "longitudeE7": 2},
                                 "duration": {"startTimestampMs": "1"}}}
        ]}"#;
        let visits = parse_timeline_month(json).unwrap();
        let SemanticVisit::Movement(segment) = &visits[0] else {
            panic!("expected a movement, got {visits:?}");
        };
        assert_eq!(segment.end, segment.start);
        assert_eq!(segment.end_ms, segment.start_ms);
        assert!(segment.waypoints.is_empty());
    }

    #[test]
    fn test_unknown_timeline_objects_are_ignored() {
        let json = r#"{"timelineObjects": [{"somethingElse": {}}, 42]}"#;
        assert!(parse_timeline_month(json).unwrap().is_empty());
    }
}
