//! Alarm Propagation - applies parsed messages to the map.
//!
//! Statuses are written to every referenced location, then the alarm
//! spreads outward (breadth-first, bounded by the alarm distance) to find
//! located characters that should be warned.

mod events;

pub use events::*;

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use star_map::{LocationId, StarMap};

use crate::config::IntelConfig;
use crate::message::{Message, MessageStatus};
use crate::parser::is_system_user;

#[derive(Debug, Clone, Default)]
pub struct AlarmPropagator {
    alarm_distance: u32,
    watched_rooms: HashSet<String>,
    /// Characters whose reports never trigger notifications.
    friendly: HashSet<String>,
}

impl AlarmPropagator {
    pub fn new(alarm_distance: u32) -> Self {
        Self {
            alarm_distance,
            ..Self::default()
        }
    }

    pub fn from_config(config: &IntelConfig) -> Self {
        Self {
            alarm_distance: config.alarm_distance,
            watched_rooms: config.watched_rooms.iter().cloned().collect(),
            friendly: config.friendly_characters.iter().cloned().collect(),
        }
    }

    pub fn alarm_distance(&self) -> u32 {
        self.alarm_distance
    }

    pub fn set_alarm_distance(&mut self, distance: u32) {
        self.alarm_distance = distance;
    }

    pub fn add_friendly(&mut self, character: impl Into<String>) {
        self.friendly.insert(character.into());
    }

    pub fn is_friendly(&self, character: &str) -> bool {
        self.friendly.contains(character)
    }

    /// Apply `message` to `map` and collect the resulting events.
    pub fn apply(&mut self, message: &Message, map: &mut StarMap, now: DateTime<Utc>) -> Vec<IntelEvent> {
        match message.status {
            MessageStatus::LocationChange => return vec![self.move_character(message, map)],
            MessageStatus::KosStatusRequest => return self.kos_check(message).into_iter().collect(),
            MessageStatus::Ignore => return Vec::new(),
            _ => {}
        }
        if is_system_user(&message.user) {
            return Vec::new();
        }

        let update = message.status.status_update();
        let mut events = Vec::new();
        for &origin in &message.locations {
            // Step 1: Persist the reported status
            if let Err(err) = map.set_status(origin, update, now) {
                warn!(%origin, %err, "message references a location missing from the map");
                continue;
            }

            // Step 2: Warn located characters in range
            let distance = match message.status {
                MessageStatus::Alarm => self.alarm_distance,
                MessageStatus::Request => 0,
                _ => continue,
            };
            if self.is_friendly(&message.user) {
                continue;
            }
            events.extend(
                self.candidates(message, origin, distance, map)
                    .into_iter()
                    .map(IntelEvent::Notification),
            );
        }
        events
    }

    fn candidates(
        &self,
        message: &Message,
        origin: LocationId,
        distance: u32,
        map: &StarMap,
    ) -> Vec<NotificationCandidate> {
        map.neighbours(origin, distance)
            .into_iter()
            .filter_map(|(id, hops)| {
                let location = map.get(id)?;
                let characters = location.located_characters();
                if characters.is_empty() || characters.iter().any(|c| *c == message.user) {
                    return None;
                }
                info!(
                    location = %location.name,
                    distance = hops,
                    characters = %characters.join(", "),
                    user = %message.user,
                    "notifying located characters"
                );
                Some(NotificationCandidate {
                    message_id: message.id,
                    user: message.user.clone(),
                    origin,
                    location: id,
                    location_name: location.name.clone(),
                    characters: characters.to_vec(),
                    distance: hops,
                })
            })
            .collect()
    }

    fn move_character(&mut self, message: &Message, map: &mut StarMap) -> IntelEvent {
        let location = message.locations.iter().next().copied();
        self.friendly.insert(message.user.clone());
        map.set_character_location(&message.user, location);
        debug!(character = %message.user, ?location, "character moved");
        IntelEvent::LocationChanged {
            character: message.user.clone(),
            location,
        }
    }

    fn kos_check(&self, message: &Message) -> Option<IntelEvent> {
        if self.watched_rooms.contains(&message.room) {
            return None;
        }
        let names = message.kos_names();
        if names.is_empty() {
            return None;
        }
        Some(IntelEvent::KosCheck {
            room: message.room.clone(),
            user: message.user.clone(),
            names,
        })
    }
}
