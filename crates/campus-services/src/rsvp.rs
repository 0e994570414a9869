// crates/campus-services/src/rsvp.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::events::EventId;

/// RSVP progress for a single event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    #[default]
    Idle,
    Pending,
    Confirmed,
}

impl RsvpStatus {
    /// Button caption for this state
    pub fn button_label(&self) -> &'static str {
        match self {
            RsvpStatus::Idle => "RSVP",
            RsvpStatus::Pending => "Processing...",
            RsvpStatus::Confirmed => "✓ RSVPed!",
        }
    }
}

/// Per-event RSVP state for the current visitor
#[derive(Debug, Default)]
pub struct RsvpBook {
    entries: HashMap<EventId, RsvpStatus>,
}

impl RsvpBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, id: EventId) -> RsvpStatus {
        self.entries.get(&id).copied().unwrap_or_default()
    }

    /// Move Idle -> Pending. Returns `None` if the event is already
    /// pending or confirmed, leaving it untouched.
    pub fn begin(&mut self, id: EventId) -> Option<RsvpStatus> {
        match self.status(id) {
            RsvpStatus::Idle => {
                self.entries.insert(id, RsvpStatus::Pending);
                Some(RsvpStatus::Pending)
            }
            RsvpStatus::Pending | RsvpStatus::Confirmed => None,
        }
    }

    /// Move Pending -> Confirmed. Returns false if the event was not pending.
    pub fn confirm(&mut self, id: EventId) -> bool {
        match self.status(id) {
            RsvpStatus::Pending => {
                self.entries.insert(id, RsvpStatus::Confirmed);
                true
            }
            _ => false,
        }
    }

    pub fn confirmed(&self) -> Vec<EventId> {
        let mut ids: Vec<EventId> = self
            .entries
            .iter()
            .filter(|(_, s)| **s == RsvpStatus::Confirmed)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    /// Drop every pending RSVP back to Idle so it can be submitted again.
    /// Returns the affected events in id order.
    pub fn abandon_pending(&mut self) -> Vec<EventId> {
        let mut ids: Vec<EventId> = self
            .entries
            .iter()
            .filter(|(_, s)| **s == RsvpStatus::Pending)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        for id in &ids {
            self.entries.remove(id);
        }
        ids
    }
}
