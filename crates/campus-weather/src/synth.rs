//! Weather synthesis.
//!
//! Produces a plausible report for a location and instant. Every random
//! draw goes through the caller's RNG, so a seeded RNG and a fixed instant
//! always give the same report.

use campus_core::clock::{clock_label, format_clock};
use chrono::{Datelike, NaiveDateTime, Timelike};
use rand::Rng;

use crate::types::{Conditions, Coordinates, ForecastPeriod, PeriodLabel, WeatherReport};

/// Reported temperature never drops below this.
pub const MIN_TEMPERATURE_F: i32 = 10;
/// Subtracted from the seasonal base between 21:00 and 05:59.
pub const NIGHT_OFFSET_F: i32 = 8;

const LOCATION_LABEL: &str = "Campus Area";
const FORECAST_GLYPHS: [&str; 4] = ["☀️", "⛅", "☁️", "🌤️"];

const NORTHERN_CONDITIONS: [Conditions; 5] = [
    Conditions::PartlyCloudy,
    Conditions::Sunny,
    Conditions::MostlyCloudy,
    Conditions::Clear,
    Conditions::Overcast,
];

const SOUTHERN_CONDITIONS: [Conditions; 5] = [
    Conditions::Sunny,
    Conditions::Clear,
    Conditions::MostlySunny,
    Conditions::PartlyCloudy,
    Conditions::Fair,
];

/// Meteorological season used to pick the base temperature range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// `month` is 1-based.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9 | 10 => Season::Fall,
            _ => Season::Winter,
        }
    }

    /// (floor, span): base is `floor + uniform[0, span)`
    fn base_range(self, northern: bool) -> (i32, i32) {
        match (self, northern) {
            (Season::Winter, true) => (25, 20),
            (Season::Spring, true) => (50, 20),
            (Season::Summer, true) => (70, 15),
            (Season::Fall, true) => (55, 20),
            (Season::Winter, false) => (60, 15),
            (Season::Spring, false) => (70, 15),
            (Season::Summer, false) => (85, 10),
            (Season::Fall, false) => (75, 15),
        }
    }
}

pub fn is_night(hour: u32) -> bool {
    hour < 6 || hour > 20
}

/// Seasonal base temperature before jitter, night adjustment included.
///
/// Consumes exactly one draw from `rng`.
pub fn seasonal_base(coords: &Coordinates, now: NaiveDateTime, rng: &mut impl Rng) -> i32 {
    let (floor, span) = Season::from_month(now.month()).base_range(coords.is_northern());
    let mut base = floor + rng.gen_range(0..span);
    if is_night(now.hour()) {
        base -= NIGHT_OFFSET_F;
    }
    base
}

/// Sunset base hour by month: short days Nov-Jan, long days May-Jul.
fn sunset_base_hour(month: u32) -> u32 {
    match month {
        11 | 12 | 1 => 16,
        2..=4 => 18,
        5..=7 => 20,
        _ => 19,
    }
}

/// Build a weather report for `coords` at `now`.
pub fn synthesize(coords: &Coordinates, now: NaiveDateTime, rng: &mut impl Rng) -> WeatherReport {
    let base = seasonal_base(coords, now, rng);

    let options = if coords.is_northern() {
        &NORTHERN_CONDITIONS
    } else {
        &SOUTHERN_CONDITIONS
    };
    let conditions = options[rng.gen_range(0..options.len())];

    let temperature_f = (base + rng.gen_range(-3..=2)).max(MIN_TEMPERATURE_F);
    let wind_speed_mph = rng.gen_range(3..=22);
    let humidity_pct = rng.gen_range(40..=79);

    let forecast_periods = PeriodLabel::ALL.map(|label| ForecastPeriod {
        label,
        temperature_f: temperature_f + rng.gen_range(-4..=3),
        icon_glyph: FORECAST_GLYPHS[rng.gen_range(0..FORECAST_GLYPHS.len())].to_string(),
    });

    let sunset_fraction: f64 = rng.gen();
    let sunset_minute = ((sunset_fraction * 60.0).floor() as u32).min(59);
    let sunset_local_time = format_clock(sunset_base_hour(now.month()), sunset_minute);

    let feels_like_f = temperature_f + rng.gen_range(-2..=1);
    let visibility_miles = ((5.0 + rng.gen::<f64>() * 7.0) * 10.0).round() / 10.0;

    tracing::debug!(
        "Synthesized weather for {}: {}°F {}",
        coords.display(4),
        temperature_f,
        conditions.description()
    );

    WeatherReport {
        location_label: LOCATION_LABEL.to_string(),
        coordinates: *coords,
        temperature_f,
        feels_like_f,
        conditions,
        wind_speed_mph,
        humidity_pct,
        visibility_miles,
        sunset_local_time,
        updated_time: clock_label(now),
        current_date: now.format("%A, %B %-d, %Y").to_string(),
        forecast_periods,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn coords(lat: f64) -> Coordinates {
        Coordinates::new(lat, -73.0).unwrap()
    }

    #[test]
    fn test_season_buckets() {
        assert_eq!(Season::from_month(2), Season::Winter);
        assert_eq!(Season::from_month(3), Season::Spring);
        assert_eq!(Season::from_month(8), Season::Summer);
        assert_eq!(Season::from_month(10), Season::Fall);
        assert_eq!(Season::from_month(11), Season::Winter);
    }

    #[test]
    fn test_night_hours() {
        assert!(is_night(0));
        assert!(is_night(5));
        assert!(!is_night(6));
        assert!(!is_night(20));
        assert!(is_night(21));
    }

    #[test]
    fn test_same_seed_same_report() {
        let now = at(4, 14, 13, 0);
        let a = synthesize(&coords(41.0), now, &mut StdRng::seed_from_u64(7));
        let b = synthesize(&coords(41.0), now, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_invariants_hold_across_year_and_seeds() {
        for seed in 0..40u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            for month in 1..=12 {
                for hour in [0, 5, 6, 12, 20, 21, 23] {
                    for lat in [-89.0, 0.0, 40.0, 40.5, 89.0] {
                        let report = synthesize(&coords(lat), at(month, 1, hour, 0), &mut rng);
                        assert!(report.temperature_f >= MIN_TEMPERATURE_F);
                        assert!((40..80).contains(&report.humidity_pct));
                        assert!((3..=22).contains(&report.wind_speed_mph));
                        assert!((5.0..=12.0).contains(&report.visibility_miles));
                        assert_eq!(report.forecast_periods.len(), 4);
                        assert_eq!(report.sunset_local_time.len(), 8);
                        assert!(report.sunset_local_time.ends_with(" PM"));
                    }
                }
            }
        }
    }

    #[test]
    fn test_night_cooling_on_base() {
        for seed in 0..20u64 {
            for month in 1..=12 {
                let day = seasonal_base(
                    &coords(42.0),
                    at(month, 10, 12, 0),
                    &mut StdRng::seed_from_u64(seed),
                );
                let early = seasonal_base(
                    &coords(42.0),
                    at(month, 10, 3, 0),
                    &mut StdRng::seed_from_u64(seed),
                );
                let late = seasonal_base(
                    &coords(42.0),
                    at(month, 10, 22, 0),
                    &mut StdRng::seed_from_u64(seed),
                );
                assert_eq!(early, day - NIGHT_OFFSET_F);
                assert_eq!(late, day - NIGHT_OFFSET_F);
            }
        }
    }

    #[test]
    fn test_base_ranges_by_hemisphere() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let north = seasonal_base(&coords(45.0), at(1, 15, 12, 0), &mut rng);
            assert!((25..45).contains(&north));
            let south = seasonal_base(&coords(30.0), at(7, 15, 12, 0), &mut rng);
            assert!((85..95).contains(&south));
        }
    }

    #[test]
    fn test_conditions_follow_hemisphere() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let north = synthesize(&coords(45.0), at(6, 1, 12, 0), &mut rng);
            assert!(NORTHERN_CONDITIONS.contains(&north.conditions));
            let south = synthesize(&coords(10.0), at(6, 1, 12, 0), &mut rng);
            assert!(SOUTHERN_CONDITIONS.contains(&south.conditions));
        }
    }

    #[test]
    fn test_sunset_hour_by_month() {
        let mut rng = StdRng::seed_from_u64(5);
        let december = synthesize(&coords(41.0), at(12, 1, 12, 0), &mut rng);
        assert!(december.sunset_local_time.starts_with("04:"));
        let june = synthesize(&coords(41.0), at(6, 1, 12, 0), &mut rng);
        assert!(june.sunset_local_time.starts_with("08:"));
        let september = synthesize(&coords(41.0), at(9, 1, 12, 0), &mut rng);
        assert!(september.sunset_local_time.starts_with("07:"));
    }

    #[test]
    fn test_forecast_labels_in_order() {
        let report = synthesize(&coords(41.0), at(5, 5, 10, 0), &mut StdRng::seed_from_u64(1));
        let labels: Vec<_> = report.forecast_periods.iter().map(|p| p.label).collect();
        assert_eq!(labels, PeriodLabel::ALL.to_vec());
        for period in &report.forecast_periods {
            assert!((report.temperature_f - 4..=report.temperature_f + 3).contains(&period.temperature_f));
            assert!(FORECAST_GLYPHS.contains(&period.icon_glyph.as_str()));
        }
    }

    #[test]
    fn test_date_and_update_labels() {
        let report = synthesize(&coords(41.0), at(10, 18, 14, 5), &mut StdRng::seed_from_u64(1));
        assert_eq!(report.current_date, "Sunday, October 18, 2026");
        assert_eq!(report.updated_time, "02:05 PM");
        assert_eq!(report.location_label, "Campus Area");
    }
}
