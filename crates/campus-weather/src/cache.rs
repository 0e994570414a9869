//! Last known location fix, reused while younger than the request's
//! `max_cache_age`.

use chrono::NaiveDateTime;
use std::time::Duration;

use crate::types::{FixSource, LocationFix};

#[derive(Debug, Default)]
pub struct LocationCache {
    last: Option<LocationFix>,
}

impl LocationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a device fix. Default-coordinate fallbacks are not cached.
    pub fn store(&mut self, fix: LocationFix) {
        if fix.source == FixSource::Device {
            self.last = Some(fix);
        }
    }

    /// The cached fix if it is no older than `max_age` at `now`.
    pub fn fresh(&self, now: NaiveDateTime, max_age: Duration) -> Option<LocationFix> {
        if max_age.is_zero() {
            return None;
        }
        let fix = self.last?;
        let age = now.signed_duration_since(fix.captured_at).to_std().ok()?;
        if age <= max_age {
            tracing::debug!("Reusing location fix captured {:?} ago", age);
            Some(LocationFix {
                source: FixSource::Cached,
                ..fix
            })
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}
