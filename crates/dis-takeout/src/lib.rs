//! Input loading for days-in-state audits.
//!
//! This crate reads the two on-disk inputs of an audit:
//! - Takeout archive: raw pings and per-month semantic history
//! - Boundary reference: state and country shapes from GeoJSON

use std::path::PathBuf;

use thiserror::Error;

mod archive;
mod records;
mod reference;

pub use archive::{LOCATION_HISTORY_DIR, PING_FILES, SEMANTIC_DIR, TakeoutArchive};
pub use records::{parse_pings, parse_timeline_month};
pub use reference::{
    Boundaries, COUNTRY_NAME_KEY, STATE_NAME_KEY, load_boundaries, parse_boundaries,
};

#[derive(Debug, Error)]
pub enum TakeoutError {
    #[error("takeout directory not found: {}", .0.display())]
    MissingArchive(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid boundary file {}: {source}", .path.display())]
    Boundaries {
        path: PathBuf,
        #[source]
        source: BoundaryError,
    },

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Problems with GeoJSON boundary content.
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("GeoJSON parse error: {0}")]
    GeoJson(Box<geojson::Error>),

    #[error("expected a FeatureCollection")]
    NotFeatureCollection,

    #[error("no named polygon features")]
    Empty,
}
