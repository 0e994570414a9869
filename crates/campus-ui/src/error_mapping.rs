//! Maps core errors to widget errors so nothing but `WidgetStatus` reaches the view.

use campus_core::{CampusError, LocationError};
use campus_weather::Coordinates;

use crate::widget::{FallbackAction, WidgetError};

impl From<CampusError> for WidgetError {
    fn from(e: CampusError) -> Self {
        tracing::debug!("Mapping error for display: {}", e);
        WidgetError::new(e.user_message())
    }
}

/// Location failures always offer the campus default as a way forward.
pub fn location_error(error: LocationError, fallback: Coordinates) -> WidgetError {
    WidgetError::new(format!(
        "{} Using default campus location instead.",
        error.user_message()
    ))
    .with_fallback(FallbackAction::UseDefaultCoordinates {
        coordinates: fallback,
    })
}
