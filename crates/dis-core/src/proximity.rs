//! Office proximity checks.

use geo::{Distance, Haversine};

use crate::types::{Point, ValidationError, check_distance};

/// Default distance under which a point counts as "at the office".
pub const DEFAULT_OFFICE_THRESHOLD_KM: f64 = 0.75;

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(a: Point, b: Point) -> f64 {
    let a = geo::Point::new(a.lng, a.lat);
    let b = geo::Point::new(b.lng, b.lat);
    Haversine::distance(a, b) / 1000.0
}

/// A fixed set of office locations.
#[derive(Debug, Clone)]
pub struct ProximityIndex {
    offices: Vec<Point>,
    threshold_km: f64,
}

impl ProximityIndex {
    pub fn new(offices: Vec<Point>, threshold_km: f64) -> Result<Self, ValidationError> {
        let threshold_km = check_distance("office threshold", threshold_km)?;
        Ok(Self {
            offices,
            threshold_km,
        })
    }

    /// Whether `point` lies strictly within the threshold of any office.
    pub fn is_near_office(&self, point: Point) -> bool {
        point.is_finite()
            && self
                .offices
                .iter()
                .any(|office| haversine_km(point, *office) < self.threshold_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SF_OFFICE: Point = Point::new(37.760_377, -122.413_178);
    const SEATTLE_OFFICE: Point = Point::new(47.605_076, -122.336_696);

    #[test]
    fn test_haversine_same_point_is_zero() {
        assert!(haversine_km(SF_OFFICE, SF_OFFICE).abs() < 1e-12);
    }

    #[test]
    fn test_haversine_known_distance() {
        // San Francisco to Seattle on the mean-radius sphere
        let d = haversine_km(SF_OFFICE, SEATTLE_OFFICE);
        assert!((d - 1094.70).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let d1 = haversine_km(SF_OFFICE, SEATTLE_OFFICE);
        let d2 = haversine_km(SEATTLE_OFFICE, SF_OFFICE);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn test_near_office_within_threshold() {
        let index = ProximityIndex::new(vec![SF_OFFICE, SEATTLE_OFFICE], 0.75).unwrap();
        // ~0.5 km north of the SF office
        assert!(index.is_near_office(Point::new(37.7649, -122.413_178)));
        assert!(index.is_near_office(SEATTLE_OFFICE));
    }

    #[test]
    fn test_not_near_office_beyond_threshold() {
        let index = ProximityIndex::new(vec![SF_OFFICE], 0.75).unwrap();
        // ~1.1 km north
        assert!(!index.is_near_office(Point::new(37.7704, -122.413_178)));
    }

    #[test]
    fn test_planar_distance_would_disagree_at_high_latitude() {
        // 0.01 degrees of longitude at 60N is ~0.56 km, not ~1.1 km
        let office = Point::new(60.0, 10.0);
        let index = ProximityIndex::new(vec![office], 0.75).unwrap();
        assert!(index.is_near_office(Point::new(60.0, 10.01)));
    }

    #[test]
    fn test_empty_office_list_is_never_near() {
        let index = ProximityIndex::new(vec![], 0.75).unwrap();
        assert!(!index.is_near_office(SF_OFFICE));
    }

    #[test]
    fn test_rejects_negative_threshold() {
        assert!(ProximityIndex::new(vec![SF_OFFICE], -1.0).is_err());
    }
}
