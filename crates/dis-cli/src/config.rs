//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use dis_core::{
    CalendarConfig, DEFAULT_BUFFER_DEG, DEFAULT_OFFICE_THRESHOLD_KM, Point, ProximityIndex,
    ValidationError,
};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Office locations used when none are configured.
pub const DEFAULT_OFFICES: &[Point] = &[
    Point::new(37.760_377, -122.413_178),
    Point::new(47.605_076, -122.336_696),
    Point::new(47.605_527, -122.337_297),
    Point::new(45.528_588, -122.663_336),
    Point::new(39.786_562, -104.918_720),
    Point::new(39.766_362, -86.160_946),
    Point::new(36.163_415, -86.776_012),
    Point::new(34.052_376, -118.255_906),
    Point::new(40.741_238, -74.000_896_3),
    Point::new(40.753_852_8, -73.996_851_6),
    Point::new(37.775_943_1, -122.391_874),
    Point::new(45.506_019_7, -73.569_546),
];

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// US states GeoJSON file.
    pub states_geojson: Option<PathBuf>,

    /// World countries GeoJSON file.
    pub countries_geojson: Option<PathBuf>,

    /// Office locations.
    pub offices: Vec<Point>,

    /// Distance under which a location counts as at an office.
    pub office_threshold_km: f64,

    /// Tolerance added around every boundary, in degrees.
    pub boundary_buffer_deg: f64,

    /// Federal holidays that are regular working days.
    pub working_holidays: Vec<String>,

    /// Give weekend holidays a weekday substitute.
    pub observed_holidays: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("states_geojson", &self.states_geojson)
            .field("countries_geojson", &self.countries_geojson)
            .field("offices", &self.offices.len())
            .field("office_threshold_km", &self.office_threshold_km)
            .field("boundary_buffer_deg", &self.boundary_buffer_deg)
            .field("working_holidays", &self.working_holidays)
            .field("observed_holidays", &self.observed_holidays)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let calendar = CalendarConfig::default();
        Self {
            states_geojson: None,
            countries_geojson: None,
            offices: DEFAULT_OFFICES.to_vec(),
            office_threshold_km: DEFAULT_OFFICE_THRESHOLD_KM,
            boundary_buffer_deg: DEFAULT_BUFFER_DEG,
            working_holidays: calendar.working_holidays,
            observed_holidays: calendar.observed_holidays,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (DIS_*)
        figment = figment.merge(Env::prefixed("DIS_"));

        figment.extract()
    }

    /// Work calendar settings.
    pub fn calendar(&self) -> CalendarConfig {
        CalendarConfig {
            working_holidays: self.working_holidays.clone(),
            observed_holidays: self.observed_holidays,
        }
    }

    /// Office index built from the configured offices and threshold.
    pub fn proximity_index(&self) -> Result<ProximityIndex, ValidationError> {
        ProximityIndex::new(self.offices.clone(), self.office_threshold_km)
    }
}

/// Returns the platform-specific config directory for dis.
///
/// On Linux: `~/.config/dis`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dis"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_dis() {
        if let Some(path) = dirs_config_path() {
            assert_eq!(path.file_name().unwrap(), "dis");
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.offices.len(), 12);
        assert!((config.office_threshold_km - 0.75).abs() < f64::EPSILON);
        assert!((config.boundary_buffer_deg - 0.005).abs() < f64::EPSILON);
        assert_eq!(config.working_holidays, vec!["Columbus Day", "Veterans Day"]);
        assert!(config.observed_holidays);
        assert!(config.states_geojson.is_none());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
states_geojson = "/data/states.json"
office_threshold_km = 1.5
working_holidays = []
observed_holidays = false

[[offices]]
lat = 40.0
lng = -105.0
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(
            config.states_geojson.as_deref(),
            Some(Path::new("/data/states.json"))
        );
        assert!((config.office_threshold_km - 1.5).abs() < f64::EPSILON);
        assert!(config.working_holidays.is_empty());
        assert!(!config.observed_holidays);
        assert_eq!(config.offices, vec![Point::new(40.0, -105.0)]);
        // Untouched settings keep their defaults
        assert!((config.boundary_buffer_deg - 0.005).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let config = Config::load_from(Some(Path::new("/nonexistent/dis.toml"))).unwrap();
        assert_eq!(config.offices.len(), 12);
    }

    #[test]
    fn test_calendar_and_proximity_from_config() {
        let config = Config::default();
        assert_eq!(config.calendar(), CalendarConfig::default());
        let index = config.proximity_index().unwrap();
        assert!(index.is_near_office(DEFAULT_OFFICES[0]));
    }

    #[test]
    fn test_negative_threshold_is_rejected() {
        let config = Config {
            office_threshold_km: -1.0,
            ..Config::default()
        };
        assert!(config.proximity_index().is_err());
    }
}
