use std::time::Duration;

use campus_core::CampusError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Default campus latitude (used when no device fix is available)
pub const DEFAULT_LATITUDE: f64 = 40.7589;
/// Default campus longitude
pub const DEFAULT_LONGITUDE: f64 = -73.9851;

/// Validated geographic coordinates.
///
/// Only constructible through [`Coordinates::new`], so every value in
/// circulation is within range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = CampusError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Coordinates::new(raw.latitude, raw.longitude)
    }
}

impl Coordinates {
    /// # Errors
    /// `InvalidInput` if latitude is outside [-90, 90], longitude outside
    /// [-180, 180], or either is NaN.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CampusError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CampusError::InvalidInput(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CampusError::InvalidInput(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// The campus fallback location.
    pub fn campus_default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Inputs above 40° latitude get the colder seasonal table.
    pub fn is_northern(&self) -> bool {
        self.latitude > 40.0
    }

    /// "40.7589, -73.9851"
    pub fn display(&self, decimals: usize) -> String {
        format!(
            "{:.*}, {:.*}",
            decimals, self.latitude, decimals, self.longitude
        )
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::campus_default()
    }
}

/// Sky conditions offered by the synthesizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conditions {
    Sunny,
    Clear,
    PartlyCloudy,
    MostlyCloudy,
    Overcast,
    Fair,
    MostlySunny,
}

impl Conditions {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::MostlyCloudy => "Mostly Cloudy",
            Self::Overcast => "Overcast",
            Self::Fair => "Fair",
            Self::MostlySunny => "Mostly Sunny",
        }
    }

    pub fn icon_glyph(&self) -> &'static str {
        match self {
            Self::Sunny | Self::Clear => "☀️",
            Self::PartlyCloudy => "⛅",
            Self::MostlyCloudy | Self::Overcast => "☁️",
            Self::Fair | Self::MostlySunny => "🌤️",
        }
    }
}

/// Part of the day covered by a forecast entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodLabel {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl PeriodLabel {
    pub const ALL: [PeriodLabel; 4] = [
        PeriodLabel::Morning,
        PeriodLabel::Afternoon,
        PeriodLabel::Evening,
        PeriodLabel::Night,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPeriod {
    pub label: PeriodLabel,
    pub temperature_f: i32,
    pub icon_glyph: String,
}

/// One synthesized weather snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location_label: String,
    pub coordinates: Coordinates,
    pub temperature_f: i32,
    pub feels_like_f: i32,
    pub conditions: Conditions,
    pub wind_speed_mph: u32,
    pub humidity_pct: u8,
    pub visibility_miles: f64,
    /// "HH:MM AM/PM"
    pub sunset_local_time: String,
    /// "HH:MM AM/PM"
    pub updated_time: String,
    /// "Weekday, Month D, YYYY"
    pub current_date: String,
    pub forecast_periods: [ForecastPeriod; 4],
}

/// Where a location fix came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixSource {
    Device,
    Cached,
    Default,
}

/// Coordinates captured at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub coordinates: Coordinates,
    pub captured_at: NaiveDateTime,
    pub source: FixSource,
}

/// Options passed to the geolocation collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix that may be reused instead of asking the device
    pub max_cache_age: Duration,
}

impl PositionOptions {
    /// Startup detection: short timeout, accepts a minute-old fix.
    pub fn initial() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_millis(5_000),
            max_cache_age: Duration::from_millis(60_000),
        }
    }

    /// Explicit "use my location": longer timeout, never cached.
    pub fn on_demand() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_millis(10_000),
            max_cache_age: Duration::ZERO,
        }
    }

    pub fn from_config_initial(config: &campus_core::LocationConfig) -> Self {
        Self {
            enable_high_accuracy: config.enable_high_accuracy,
            timeout: Duration::from_millis(config.initial_timeout_ms),
            max_cache_age: Duration::from_millis(config.initial_max_cache_age_ms),
        }
    }

    pub fn from_config_on_demand(config: &campus_core::LocationConfig) -> Self {
        Self {
            enable_high_accuracy: config.enable_high_accuracy,
            timeout: Duration::from_millis(config.on_demand_timeout_ms),
            max_cache_age: Duration::from_millis(config.on_demand_max_cache_age_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_accept_bounds() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_coordinates_reject_out_of_range() {
        assert!(matches!(
            Coordinates::new(90.5, 0.0),
            Err(CampusError::InvalidInput(_))
        ));
        assert!(matches!(
            Coordinates::new(0.0, -181.0),
            Err(CampusError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_coordinates_reject_nan() {
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<Coordinates, _> =
            serde_json::from_str(r#"{"latitude": 10.0, "longitude": 20.0}"#);
        assert!(ok.is_ok());

        let bad: Result<Coordinates, _> =
            serde_json::from_str(r#"{"latitude": 100.0, "longitude": 20.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_northern_threshold_is_exclusive() {
        assert!(!Coordinates::new(40.0, 0.0).unwrap().is_northern());
        assert!(Coordinates::new(40.01, 0.0).unwrap().is_northern());
        assert!(Coordinates::campus_default().is_northern());
    }

    #[test]
    fn test_condition_icon_glyph() {
        assert_eq!(Conditions::Sunny.icon_glyph(), "☀️");
        assert_eq!(Conditions::Overcast.icon_glyph(), "☁️");
        assert_eq!(Conditions::MostlySunny.description(), "Mostly Sunny");
    }

    #[test]
    fn test_position_option_presets() {
        assert_eq!(PositionOptions::initial().timeout, Duration::from_secs(5));
        assert_eq!(PositionOptions::on_demand().max_cache_age, Duration::ZERO);
    }
}
