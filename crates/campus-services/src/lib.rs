pub mod availability;
pub mod events;
pub mod rsvp;

pub use availability::{
    compute_hours, compute_live_metrics, ResourceAvailability, ResourceHours, ResourceKind,
};
pub use events::{
    campus_events, community_events, filter_events, search, CampusEvent, EventCategory,
    EventFilter, EventId, ExternalEvent, SearchResult, Searchable,
};
pub use rsvp::{RsvpBook, RsvpStatus};
