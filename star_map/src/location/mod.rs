//! Location definitions - the nodes of the star map.

mod message_id;

pub use message_id::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::alarm::{AlarmState, AlarmStatus, AlarmView, StatusUpdate};

/// Numeric identifier of a location, as given by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationId(pub u32);

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A location (solar system) on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,

    /// Canonical upper-case name, unique on the map.
    pub name: String,

    /// Directly connected locations. Kept symmetric by the map.
    pub(crate) neighbours: BTreeSet<LocationId>,

    alarm: AlarmStatus,

    /// Messages that referenced this location, oldest first.
    messages: Vec<MessageId>,

    /// Characters currently in this location, in arrival order.
    located_characters: Vec<String>,
}

impl Location {
    /// Create a new location in the `Unknown` state. The name is upper-cased.
    pub fn new(id: LocationId, name: impl AsRef<str>) -> Self {
        Self {
            id,
            name: name.as_ref().trim().to_uppercase(),
            neighbours: BTreeSet::new(),
            alarm: AlarmStatus::new(),
            messages: Vec::new(),
            located_characters: Vec::new(),
        }
    }

    pub fn neighbours(&self) -> &BTreeSet<LocationId> {
        &self.neighbours
    }

    pub fn is_neighbour(&self, other: LocationId) -> bool {
        self.neighbours.contains(&other)
    }

    pub fn alarm_state(&self) -> AlarmState {
        self.alarm.state()
    }

    pub fn last_alarm(&self) -> Option<DateTime<Utc>> {
        self.alarm.last_alarm()
    }

    /// Presentation view (tier, elapsed time, clear intensity) at `now`.
    pub fn alarm_view(&self, now: DateTime<Utc>) -> AlarmView {
        self.alarm.view(now)
    }

    /// Apply a status update. Returns `true` if anything persisted changed.
    pub fn set_status(&mut self, update: StatusUpdate, now: DateTime<Utc>) -> bool {
        let changed = self.alarm.apply(update, now);
        if changed {
            tracing::debug!(location = %self.name, ?update, state = ?self.alarm.state(), "alarm state changed");
        }
        changed
    }

    /// Messages that referenced this location.
    pub fn messages(&self) -> &[MessageId] {
        &self.messages
    }

    /// Back-link a message. Linking the same message twice is a no-op.
    pub fn link_message(&mut self, id: MessageId) -> bool {
        if self.messages.contains(&id) {
            return false;
        }
        self.messages.push(id);
        true
    }

    pub fn located_characters(&self) -> &[String] {
        &self.located_characters
    }

    pub fn has_located_characters(&self) -> bool {
        !self.located_characters.is_empty()
    }

    pub(crate) fn add_located_character(&mut self, name: &str) {
        if !self.located_characters.iter().any(|c| c == name) {
            self.located_characters.push(name.to_string());
        }
    }

    pub(crate) fn remove_located_character(&mut self, name: &str) -> bool {
        let before = self.located_characters.len();
        self.located_characters.retain(|c| c != name);
        self.located_characters.len() != before
    }
}
