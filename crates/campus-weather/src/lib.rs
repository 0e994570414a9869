//! Weather synthesis for Campus Life
//!
//! Generates mock weather reports from coordinates and the current time,
//! and defines the geolocation collaborator the UI layer consumes.

pub mod cache;
pub mod location;
pub mod synth;
pub mod types;

pub use cache::LocationCache;
pub use location::{FixedLocation, LocationProvider, UnavailableLocation};
pub use synth::{seasonal_base, synthesize, Season};
pub use types::*;

pub use campus_core::LocationError;
