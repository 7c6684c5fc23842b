//! Boundary reference data loaded from GeoJSON.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use geo::{MultiPolygon, Polygon};
use geojson::{Feature, GeoJson, Value};

use crate::{BoundaryError, TakeoutError};

/// Name property of US state boundary files.
pub const STATE_NAME_KEY: &str = "NAME";

/// Name property of world country boundary files.
pub const COUNTRY_NAME_KEY: &str = "ADMIN";

/// Named region boundaries in file order.
pub type Boundaries = Vec<(String, MultiPolygon<f64>)>;

/// Loads named boundaries from a GeoJSON `FeatureCollection` on disk.
pub fn load_boundaries(path: &Path, name_key: &str) -> Result<Boundaries, TakeoutError> {
    let text = fs::read_to_string(path).map_err(|source| TakeoutError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let boundaries =
        parse_boundaries(&text, name_key).map_err(|source| TakeoutError::Boundaries {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(
        path = %path.display(),
        boundaries = boundaries.len(),
        "loaded boundaries"
    );
    Ok(boundaries)
}

/// Parses named boundaries from GeoJSON text.
///
/// Polygon and multipolygon features are keyed by their `name_key` property.
/// A repeated name keeps its first position and its last geometry. Features
/// without a name or with another geometry kind are skipped.
pub fn parse_boundaries(text: &str, name_key: &str) -> Result<Boundaries, BoundaryError> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e| BoundaryError::GeoJson(Box::new(e)))?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(BoundaryError::NotFeatureCollection);
    };

    let mut boundaries: Boundaries = Vec::with_capacity(collection.features.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, feature) in collection.features.into_iter().enumerate() {
        let Some(name) = feature_name(&feature, name_key) else {
            tracing::warn!(index, name_key, "skipping feature without a name");
            continue;
        };
        let Some(shape) = feature_shape(feature) else {
            tracing::warn!(index, name = %name, "skipping feature without polygon geometry");
            continue;
        };

        if let Some(&existing) = positions.get(&name) {
            boundaries[existing].1 = shape;
        } else {
            positions.insert(name.clone(), boundaries.len());
            boundaries.push((name, shape));
        }
    }

    if boundaries.is_empty() {
        return Err(BoundaryError::Empty);
    }
    Ok(boundaries)
}

fn feature_name(feature: &Feature, name_key: &str) -> Option<String> {
    let name = feature.property(name_key)?.as_str()?.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn feature_shape(feature: Feature) -> Option<MultiPolygon<f64>> {
    let value = feature.geometry?.value;
    match value {
        Value::Polygon(_) => Polygon::<f64>::try_from(value)
            .ok()
            .map(|polygon| MultiPolygon::new(vec![polygon])),
        Value::MultiPolygon(_) => MultiPolygon::<f64>::try_from(value).ok(),
        _ => None,
    }
}
