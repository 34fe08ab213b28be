use serde::{Deserialize, Serialize};

use star_map::{LocationId, MessageId};

/// A located character that should hear about a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationCandidate {
    pub message_id: MessageId,
    /// Author of the message.
    pub user: String,
    /// Location the message refers to.
    pub origin: LocationId,
    /// Location of the characters to notify.
    pub location: LocationId,
    pub location_name: String,
    pub characters: Vec<String>,
    /// Jumps between `origin` and `location`.
    pub distance: u32,
}

/// Something the integration layer may want to act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntelEvent {
    Notification(NotificationCandidate),
    /// Pilots someone asked to have checked.
    KosCheck {
        room: String,
        user: String,
        names: Vec<String>,
    },
    /// A tracked character moved; `None` when the new location is not on the map.
    LocationChanged {
        character: String,
        location: Option<LocationId>,
    },
}
