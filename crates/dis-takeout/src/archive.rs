//! Access to an extracted Google Takeout directory.

use std::fs;
use std::path::{Path, PathBuf};

use dis_core::{Ping, SemanticVisit};
use glob::{Pattern, glob};
use rayon::prelude::*;

use crate::TakeoutError;
use crate::records::{parse_pings, parse_timeline_month};

/// Directory holding all location data inside the export.
pub const LOCATION_HISTORY_DIR: &str = "Location History";

/// Ping files, in order of preference. Older exports use the first name.
pub const PING_FILES: &[&str] = &["Location History.json", "Records.json"];

/// Directory of per-year semantic history inside [`LOCATION_HISTORY_DIR`].
pub const SEMANTIC_DIR: &str = "Semantic Location History";

const MONTHS: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// An extracted Takeout export on disk.
#[derive(Debug, Clone)]
pub struct TakeoutArchive {
    root: PathBuf,
}

impl TakeoutArchive {
    /// Opens the export rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, TakeoutError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(TakeoutError::MissingArchive(root));
        }
        Ok(Self { root })
    }

    fn history_dir(&self) -> PathBuf {
        self.root.join(LOCATION_HISTORY_DIR)
    }

    /// The ping file present in this export, if any.
    pub fn ping_file(&self) -> Option<PathBuf> {
        let dir = self.history_dir();
        PING_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Loads every usable ping. An export without a ping file has no pings.
    pub fn load_pings(&self) -> Result<Vec<Ping>, TakeoutError> {
        let Some(path) = self.ping_file() else {
            tracing::warn!(root = %self.root.display(), "no location history file found");
            return Ok(Vec::new());
        };
        let text = read(&path)?;
        let pings = parse_pings(&text).map_err(|source| TakeoutError::Json {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), pings = pings.len(), "loaded location history");
        Ok(pings)
    }

    /// Semantic history files for `year`, in calendar month order.
    pub fn month_files(&self, year: i32) -> Result<Vec<PathBuf>, TakeoutError> {
        let dir = self.history_dir().join(SEMANTIC_DIR).join(year.to_string());
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let pattern = format!(
            "{}/{year}_*.json",
            Pattern::escape(&dir.to_string_lossy())
        );

        let mut files = Vec::new();
        for entry in glob(&pattern)? {
            match entry {
                Ok(path) => files.push(path),
                Err(e) => tracing::debug!(error = %e, "error accessing semantic history file"),
            }
        }
        files.sort_by_cached_key(|path| month_sort_key(path));
        Ok(files)
    }

    /// Loads the semantic records of `year`.
    ///
    /// Month files are parsed in parallel and concatenated in month order.
    /// A missing year yields no records; an unreadable month is skipped.
    pub fn semantic_year(&self, year: i32) -> Result<Vec<SemanticVisit>, TakeoutError> {
        let files = self.month_files(year)?;
        if files.is_empty() {
            tracing::debug!(year, "no semantic history for year");
            return Ok(Vec::new());
        }

        let months: Vec<Vec<SemanticVisit>> = files
            .par_iter()
            .filter_map(|path| match load_month(path) {
                Ok(visits) => Some(visits),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping semantic history file");
                    None
                }
            })
            .collect();

        let visits: Vec<SemanticVisit> = months.into_iter().flatten().collect();
        tracing::info!(year, files = files.len(), visits = visits.len(), "loaded semantic history");
        Ok(visits)
    }
}

fn read(path: &Path) -> Result<String, TakeoutError> {
    fs::read_to_string(path).map_err(|source| TakeoutError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_month(path: &Path) -> Result<Vec<SemanticVisit>, TakeoutError> {
    let text = read(path)?;
    parse_timeline_month(&text).map_err(|source| TakeoutError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Orders `<year>_<MONTH>.json` files by month, anything else after them by
/// name.
fn month_sort_key(path: &Path) -> (usize, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let month = stem
        .split_once('_')
        .and_then(|(_, month)| MONTHS.iter().position(|m| m.eq_ignore_ascii_case(month)))
        .unwrap_or(MONTHS.len());
    (month, stem)
}
