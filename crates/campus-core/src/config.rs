use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Geolocation defaults and request options
    #[serde(default)]
    pub location: LocationConfig,

    /// Simulated network latency per widget
    #[serde(default)]
    pub latency: LatencyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Campus latitude used when no device fix is available
    pub default_latitude: f64,

    /// Campus longitude used when no device fix is available
    pub default_longitude: f64,

    pub enable_high_accuracy: bool,

    /// Timeout for the location request issued at startup
    pub initial_timeout_ms: u64,

    /// Oldest cached fix accepted at startup
    pub initial_max_cache_age_ms: u64,

    /// Timeout for an explicit "use my location" request
    pub on_demand_timeout_ms: u64,

    /// Oldest cached fix accepted for an explicit request (0 = always fresh)
    pub on_demand_max_cache_age_ms: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            default_latitude: 40.7589,
            default_longitude: -73.9851,
            enable_high_accuracy: true,
            initial_timeout_ms: 5_000,
            initial_max_cache_age_ms: 60_000,
            on_demand_timeout_ms: 10_000,
            on_demand_max_cache_age_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyConfig {
    pub weather_ms: u64,
    pub external_events_ms: u64,
    pub availability_ms: u64,
    pub rsvp_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            weather_ms: 1_200,
            external_events_ms: 1_500,
            availability_ms: 1_200,
            rsvp_ms: 800,
        }
    }
}

impl LatencyConfig {
    pub fn weather(&self) -> Duration {
        Duration::from_millis(self.weather_ms)
    }

    pub fn external_events(&self) -> Duration {
        Duration::from_millis(self.external_events_ms)
    }

    pub fn availability(&self) -> Duration {
        Duration::from_millis(self.availability_ms)
    }

    pub fn rsvp(&self) -> Duration {
        Duration::from_millis(self.rsvp_ms)
    }
}

impl Config {
    /// Load configuration from the user config directory, creating a default file if missing
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, creating a default file if missing
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }

    /// Load configuration and validate it
    ///
    /// Returns `ConfigError::Invalid` if validation finds errors; warnings are logged.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();
        let loc = &self.location;

        if !(-90.0..=90.0).contains(&loc.default_latitude) {
            result.add_error(
                "location.default_latitude",
                format!("Latitude must be within [-90, 90], got {}", loc.default_latitude),
            );
        }
        if !(-180.0..=180.0).contains(&loc.default_longitude) {
            result.add_error(
                "location.default_longitude",
                format!("Longitude must be within [-180, 180], got {}", loc.default_longitude),
            );
        }

        if loc.initial_timeout_ms == 0 {
            result.add_error("location.initial_timeout_ms", "Timeout must be greater than 0");
        }
        if loc.on_demand_timeout_ms == 0 {
            result.add_error("location.on_demand_timeout_ms", "Timeout must be greater than 0");
        } else if loc.on_demand_timeout_ms > 60_000 {
            result.add_warning(
                "location.on_demand_timeout_ms",
                "Location timeout is longer than a minute",
            );
        }

        let lat = &self.latency;
        for (field, ms) in [
            ("latency.weather_ms", lat.weather_ms),
            ("latency.external_events_ms", lat.external_events_ms),
            ("latency.availability_ms", lat.availability_ms),
            ("latency.rsvp_ms", lat.rsvp_ms),
        ] {
            if ms > 30_000 {
                result.add_warning(field, "Simulated latency is more than 30 seconds");
            }
        }

        result
    }

    /// Save configuration to the user config directory
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound("no user config directory".to_string()))?
            .join("campus-life");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_out_of_range_default_latitude() {
        let mut config = Config::default();
        config.location.default_latitude = 120.0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "location.default_latitude"));
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let mut config = Config::default();
        config.location.on_demand_timeout_ms = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "location.on_demand_timeout_ms"));
    }

    #[test]
    fn test_long_latency_is_warning() {
        let mut config = Config::default();
        config.latency.weather_ms = 60_000;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "latency.weather_ms"));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.latency.rsvp_ms, 800);
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[latency]\nweather_ms = 10\nexternal_events_ms = 20\navailability_ms = 30\nrsvp_ms = 40\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.latency.weather(), Duration::from_millis(10));
        assert_eq!(config.location.default_latitude, 40.7589);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[latency\nweather_ms = \"soon\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().contains("config.toml"));
        assert_eq!(
            err.user_message(),
            "Configuration file is malformed. Check your settings."
        );
    }

    #[test]
    fn test_save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.latency.rsvp_ms = 250;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.latency.rsvp(), Duration::from_millis(250));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
