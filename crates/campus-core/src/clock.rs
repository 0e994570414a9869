//! Wall-clock collaborator.
//!
//! Synthesizers and schedules only care about local calendar fields
//! (month, weekday, hour), so the clock hands out naive local time.

use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use std::fmt::Debug;

/// Source of the current local date and time.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

const CLOCK_FORMAT: &str = "%I:%M %p";

/// 24h clock fields to "HH:MM AM/PM". Hours past 23 wrap around midnight.
pub fn format_clock(hour: u32, minute: u32) -> String {
    let offset = Duration::minutes(i64::from(hour) * 60 + i64::from(minute));
    (NaiveTime::default() + offset).format(CLOCK_FORMAT).to_string()
}

/// "HH:MM AM/PM" for the given instant.
pub fn clock_label(at: NaiveDateTime) -> String {
    at.format(CLOCK_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn fixed_clock_is_stable() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let clock = FixedClock(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0, 5), "12:05 AM");
        assert_eq!(format_clock(12, 0), "12:00 PM");
        assert_eq!(format_clock(16, 42), "04:42 PM");
        assert_eq!(format_clock(9, 7), "09:07 AM");
        assert_eq!(format_clock(24, 5), "12:05 AM");
    }

    #[test]
    fn test_clock_label_uses_instant() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(20, 9, 59)
            .unwrap();
        assert_eq!(clock_label(at), "08:09 PM");
    }
}
