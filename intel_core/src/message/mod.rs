//! Intel messages - the structured form of one chat line.

mod rich_text;

pub use rich_text::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use star_map::{LocationId, MessageId, StatusUpdate};

/// Marker that starts a KOS status request, compared upper-cased.
pub const KOS_REQUEST_MARKER: &str = "XXX ";

/// What a message means for the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageStatus {
    /// Hostiles reported (also the default for unclassified mentions).
    Alarm,
    Clear,
    /// Someone asked for the status of a location.
    Request,
    /// Duplicate of a message already seen.
    Ignore,
    /// Request to check a list of pilots.
    KosStatusRequest,
    /// A tracked character changed location (local chat only).
    LocationChange,
}

impl MessageStatus {
    /// The alarm update this status implies for a referenced location.
    pub fn status_update(self) -> StatusUpdate {
        match self {
            MessageStatus::Alarm => StatusUpdate::Alarm,
            MessageStatus::Clear => StatusUpdate::Clear,
            MessageStatus::Request => StatusUpdate::Request,
            MessageStatus::Ignore
            | MessageStatus::KosStatusRequest
            | MessageStatus::LocationChange => StatusUpdate::NoChange,
        }
    }
}

/// Identity of a message: two lines with the same key are the same message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageKey {
    pub room: String,
    pub plain_text: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
}

/// A parsed chat line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,

    /// Chat room the message was posted in.
    pub room: String,

    /// The message text as posted.
    pub plain_text: String,

    /// The text split into recognized and unrecognized spans.
    pub rich_text: RichText,

    /// Game time of the message.
    pub timestamp: DateTime<Utc>,

    pub user: String,

    /// Locations the message refers to.
    pub locations: BTreeSet<LocationId>,

    pub status: MessageStatus,
}

impl Message {
    /// Create a message with no recognized entities yet.
    pub fn new(
        room: impl Into<String>,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
        user: impl Into<String>,
        status: MessageStatus,
    ) -> Self {
        let plain_text = text.into();
        Self {
            id: MessageId::new(),
            room: room.into(),
            rich_text: RichText::new(plain_text.clone()),
            plain_text,
            timestamp,
            user: user.into(),
            locations: BTreeSet::new(),
            status,
        }
    }

    /// Set the referenced locations.
    pub fn with_locations(mut self, locations: impl IntoIterator<Item = LocationId>) -> Self {
        self.locations.extend(locations);
        self
    }

    /// The identity key of this message.
    pub fn key(&self) -> MessageKey {
        MessageKey {
            room: self.room.clone(),
            plain_text: self.plain_text.clone(),
            timestamp: self.timestamp,
            user: self.user.clone(),
        }
    }

    /// Text after the KOS request marker, if this is a KOS request.
    pub fn kos_parameter(&self) -> Option<&str> {
        if self.status != MessageStatus::KosStatusRequest {
            return None;
        }
        Some(
            self.plain_text
                .get(KOS_REQUEST_MARKER.len()..)
                .unwrap_or("")
                .trim(),
        )
    }

    /// Pilot names of a KOS request. Double spaces count as separators.
    pub fn kos_names(&self) -> Vec<String> {
        self.kos_parameter()
            .map(|text| {
                text.replace("  ", ",")
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.room == other.room
            && self.plain_text == other.plain_text
            && self.timestamp == other.timestamp
            && self.user == other.user
    }
}

impl Eq for Message {}

impl Hash for Message {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.room.hash(state);
        self.plain_text.hash(state);
        self.timestamp.hash(state);
        self.user.hash(state);
    }
}
