//! Widget status state machine.
//!
//! `Idle -> Loading -> {Success, Error}`; `Success`/`Error` may go back to
//! `Loading` on refresh or retry. Nothing returns to `Idle`.

use std::fmt;

use campus_services::{EventId, ExternalEvent, ResourceAvailability, ResourceHours, RsvpStatus};
use campus_weather::{Coordinates, LocationFix, WeatherReport};
use serde::Serialize;

/// Independently loading region of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    Weather,
    ExternalEvents,
    Availability,
}

impl Widget {
    pub const ALL: [Widget; 3] = [Widget::Weather, Widget::ExternalEvents, Widget::Availability];
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Widget::Weather => "weather",
            Widget::ExternalEvents => "external-events",
            Widget::Availability => "availability",
        };
        f.write_str(name)
    }
}

/// Sequence number of a request within one widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestId(pub u64);

/// What the view should offer after an error
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FallbackAction {
    UseDefaultCoordinates { coordinates: Coordinates },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetError {
    pub message: String,
    pub fallback: Option<FallbackAction>,
}

impl WidgetError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackAction) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

/// Data rendered by a widget on success
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    Weather(WeatherReport),
    Location(LocationFix),
    ExternalEvents(Vec<ExternalEvent>),
    Availability(ResourceAvailability),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum WidgetStatus {
    #[default]
    Idle,
    Loading,
    Success(Payload),
    Error(WidgetError),
}

impl WidgetStatus {
    /// Only an in-flight request can complete.
    pub fn can_complete(&self) -> bool {
        matches!(self, WidgetStatus::Loading)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, WidgetStatus::Loading)
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            WidgetStatus::Success(p) => Some(p),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&WidgetError> {
        match self {
            WidgetStatus::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// Notification emitted on every observable transition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusChange {
    Widget {
        widget: Widget,
        request: RequestId,
        status: WidgetStatus,
    },
    Rsvp {
        event: EventId,
        status: RsvpStatus,
    },
    /// Periodic refresh of every resource's opening status
    Hours { hours: Vec<ResourceHours> },
}
