//! Region membership lookup.
//!
//! Maps a coordinate to the name of the US state (or foreign country) whose
//! boundary contains it. States are always searched before countries.
//!
//! # Search order
//!
//! Each list is kept in most-recently-matched order: a hit moves the entry to
//! the front. Location histories revisit the same few regions over and over,
//! so most lookups end on the first probe. Containment is still tested
//! exhaustively until a hit, so the answer for a point never depends on
//! earlier queries (unless two boundaries overlap, in which case the most
//! recently matched one wins).
//!
//! # Thread Safety
//!
//! Lookups reorder the lists, so [`RegionIndex::find_region`] takes
//! `&mut self`. Wrap the index in a `Mutex` to share it across threads.

use geo::{BoundingRect, Closest, ClosestPoint, Contains, Coord, MultiPolygon, Rect};

use crate::types::{Point, ValidationError, check_distance};

/// Prefix applied to country names so they never collide with state names.
pub const OUTSIDE_US_PREFIX: &str = "Outside US/";

/// Default boundary tolerance in degrees (roughly 500 m at mid latitudes).
pub const DEFAULT_BUFFER_DEG: f64 = 0.005;

/// A named boundary expanded by a fixed tolerance.
///
/// A point belongs to the boundary when it lies inside the shape or within
/// `buffer` degrees of its edge, which absorbs GPS noise along borders and
/// coastlines.
#[derive(Debug, Clone)]
struct BufferedBoundary {
    name: String,
    shape: MultiPolygon<f64>,
    /// Bounding box grown by `buffer` on every side.
    envelope: Option<Rect<f64>>,
    buffer: f64,
}

impl BufferedBoundary {
    fn new(name: String, shape: MultiPolygon<f64>, buffer: f64) -> Self {
        let envelope = shape.bounding_rect().map(|rect| {
            let min = rect.min();
            let max = rect.max();
            Rect::new(
                Coord {
                    x: min.x - buffer,
                    y: min.y - buffer,
                },
                Coord {
                    x: max.x + buffer,
                    y: max.y + buffer,
                },
            )
        });
        Self {
            name,
            shape,
            envelope,
            buffer,
        }
    }

    fn contains(&self, point: &geo::Point<f64>) -> bool {
        let Some(envelope) = self.envelope else {
            return false;
        };
        let (min, max) = (envelope.min(), envelope.max());
        if point.x() < min.x || point.x() > max.x || point.y() < min.y || point.y() > max.y {
            return false;
        }
        if self.shape.contains(point) {
            return true;
        }
        if self.buffer <= 0.0 {
            return false;
        }
        match self.shape.closest_point(point) {
            Closest::Intersection(_) => true,
            Closest::SinglePoint(nearest) => {
                (nearest.x() - point.x()).hypot(nearest.y() - point.y()) <= self.buffer
            }
            Closest::Indeterminate => false,
        }
    }
}

/// Resolves coordinates to region names.
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    states: Vec<BufferedBoundary>,
    countries: Vec<BufferedBoundary>,
}

impl RegionIndex {
    /// Builds an index from `(name, shape)` lists, expanding every shape by
    /// `buffer_deg` degrees.
    ///
    /// Names are stored trimmed; country names are stored without the
    /// `Outside US/` prefix.
    pub fn new(
        states: Vec<(String, MultiPolygon<f64>)>,
        countries: Vec<(String, MultiPolygon<f64>)>,
        buffer_deg: f64,
    ) -> Result<Self, ValidationError> {
        let buffer = check_distance("boundary buffer", buffer_deg)?;
        let prepare = |entries: Vec<(String, MultiPolygon<f64>)>| -> Vec<BufferedBoundary> {
            entries
                .into_iter()
                .map(|(name, shape)| BufferedBoundary::new(name.trim().to_string(), shape, buffer))
                .collect()
        };
        let index = Self {
            states: prepare(states),
            countries: prepare(countries),
        };
        tracing::debug!(
            states = index.states.len(),
            countries = index.countries.len(),
            buffer,
            "built region index"
        );
        Ok(index)
    }

    /// Returns the state name containing `point`, `Outside US/<country>` when
    /// only a country matches, or an empty string when nothing does.
    pub fn find_region(&mut self, point: Point) -> String {
        if !point.is_finite() {
            return String::new();
        }
        let probe = geo::Point::new(point.lng, point.lat);

        if let Some(name) = find_and_promote(&mut self.states, &probe) {
            return name.to_string();
        }
        if let Some(name) = find_and_promote(&mut self.countries, &probe) {
            return format!("{OUTSIDE_US_PREFIX}{name}");
        }
        String::new()
    }

    #[cfg(test)]
    fn state_order(&self) -> Vec<&str> {
        self.states.iter().map(|b| b.name.as_str()).collect()
    }

    #[cfg(test)]
    fn country_order(&self) -> Vec<&str> {
        self.countries.iter().map(|b| b.name.as_str()).collect()
    }
}

/// Finds the first boundary containing `probe` and moves it to the front.
fn find_and_promote<'a>(
    entries: &'a mut [BufferedBoundary],
    probe: &geo::Point<f64>,
) -> Option<&'a str> {
    let index = entries.iter().position(|b| b.contains(probe))?;
    entries[..=index].rotate_right(1);
    Some(entries[0].name.as_str())
}
