//! Centralized error types for Campus Life.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for widget display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a message suitable for the view layer.
#[derive(Debug, Error)]
pub enum CampusError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Unknown resource kind: {0}")]
    UnknownResourceKind(String),

    #[error("Unknown event filter: {0}")]
    UnknownFilter(String),
}

impl CampusError {
    /// Returns a user-friendly message suitable for display in a widget.
    pub fn user_message(&self) -> &'static str {
        match self {
            CampusError::InvalidInput(_) => "The supplied coordinates are out of range.",
            CampusError::Location(e) => e.user_message(),
            CampusError::UnknownResourceKind(_) => "Information not available for this resource.",
            CampusError::UnknownFilter(_) => "That event filter is not available.",
        }
    }
}

/// Errors reported by the geolocation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable")]
    PositionUnavailable,

    #[error("Location request timed out")]
    Timeout,
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => {
                "Location access was denied. Please enable location services in your browser settings."
            }
            LocationError::PositionUnavailable => "Location information is currently unavailable.",
            LocationError::Timeout => "Location request timed out. Please try again.",
        }
    }
}

/// Errors loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Configuration serialize error: {0}")]
    Serialize(String),

    #[error("Configuration IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::Serialize(_) | ConfigError::Io(_) => {
                "Configuration file could not be written. Using defaults."
            }
        }
    }
}
