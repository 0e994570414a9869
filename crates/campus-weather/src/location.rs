//! Geolocation collaborator.
//!
//! The core never talks to a positioning device itself; the host supplies a
//! [`LocationProvider`] and the UI layer applies timeout and caching policy.

use std::time::Duration;

use async_trait::async_trait;
use campus_core::LocationError;

use crate::types::{Coordinates, PositionOptions};

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Resolve the device position.
    ///
    /// Implementations may ignore `options`; the caller enforces the timeout.
    async fn current_position(&self, options: &PositionOptions)
        -> Result<Coordinates, LocationError>;
}

/// Reports a fixed position, optionally after a delay.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    coordinates: Coordinates,
    delay: Duration,
}

impl FixedLocation {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.coordinates)
    }
}

/// Host without positioning support: every request fails with the given error.
#[derive(Debug, Clone, Copy)]
pub struct UnavailableLocation(pub LocationError);

impl Default for UnavailableLocation {
    fn default() -> Self {
        Self(LocationError::PositionUnavailable)
    }
}

#[async_trait]
impl LocationProvider for UnavailableLocation {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        Err(self.0)
    }
}
