//! Log-source registry.
//!
//! Tailing files is the caller's job. The registry only knows, per source,
//! which room it belongs to, who is listening (for local chat) and whether
//! the source has been set aside after a decode failure.

mod decode;

pub use decode::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::error::{IntelError, Result};
use crate::parser::parse_timestamp;

/// Names local chat rooms can have, depending on client language.
pub const LOCAL_ROOM_NAMES: [&str; 3] = ["Local", "Lokal", "Локальный"];

/// Length of the `_YYYYMMDD_HHMMSS.txt` suffix of a chat log file name.
const LOG_FILENAME_SUFFIX_LEN: usize = 20;

const LISTENER_HEADER: &str = "Listener:";
const SESSION_STARTED_HEADER: &str = "Session started:";

/// Stable identifier of a log source, typically its path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether `room` is a local chat room.
pub fn is_local_room(room: &str) -> bool {
    LOCAL_ROOM_NAMES.contains(&room)
}

/// Room name of a chat log file, e.g. `Intel.North_20140913_200737.txt`.
pub fn room_from_log_filename(filename: &str) -> Option<&str> {
    let cut = filename.len().checked_sub(LOG_FILENAME_SUFFIX_LEN)?;
    filename.get(..cut).filter(|room| !room.is_empty())
}

/// What the registry knows about one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSource {
    pub room: String,
    /// Character whose client writes this log (local chat only).
    pub listener: Option<String>,
    pub session_start: Option<DateTime<Utc>>,
    pub ignored: bool,
}

impl LogSource {
    fn new(room: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            listener: None,
            session_start: None,
            ignored: false,
        }
    }

    pub fn is_local(&self) -> bool {
        is_local_room(&self.room)
    }

    /// Local chat sources need both header values before their lines make sense.
    pub fn header_complete(&self) -> bool {
        self.listener.is_some() && self.session_start.is_some()
    }
}

/// All known log sources keyed by id.
#[derive(Debug, Clone, Default)]
pub struct LogSources {
    sources: HashMap<SourceId, LogSource>,
}

impl LogSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source for `room`. Re-registering keeps what is known.
    pub fn register(&mut self, id: SourceId, room: impl Into<String>) -> &LogSource {
        let room = room.into();
        self.sources
            .entry(id)
            .and_modify(|source| source.room.clone_from(&room))
            .or_insert_with(|| LogSource::new(room))
    }

    /// Register a source, deriving the room from the log file name.
    pub fn register_file(&mut self, id: SourceId, filename: &str) -> Option<&LogSource> {
        let room = room_from_log_filename(filename)?.to_string();
        Some(self.register(id, room))
    }

    pub fn get(&self, id: &SourceId) -> Option<&LogSource> {
        self.sources.get(id)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Pick up `Listener:` and `Session started:` header values from `lines`.
    ///
    /// Only local chat sources care; other sources are left untouched.
    pub fn read_header<S: AsRef<str>>(&mut self, id: &SourceId, lines: &[S]) -> Result<()> {
        let source = self
            .sources
            .get_mut(id)
            .ok_or_else(|| IntelError::UnknownSource(id.clone()))?;
        if !source.is_local() || source.header_complete() {
            return Ok(());
        }

        for line in lines {
            let line = line.as_ref();
            if let Some(pos) = line.find(LISTENER_HEADER) {
                source.listener = Some(line[pos + LISTENER_HEADER.len()..].trim().to_string());
            } else if let Some(pos) = line.find(SESSION_STARTED_HEADER) {
                let value = line[pos + SESSION_STARTED_HEADER.len()..].trim();
                source.session_start = parse_timestamp(value);
            }
            if source.header_complete() {
                break;
            }
        }
        Ok(())
    }

    /// Decode freshly read bytes of a source into lines.
    ///
    /// A decode failure marks the source ignored and is returned as
    /// [`IntelError::SourceUnreadable`]; later calls fail with
    /// [`IntelError::SourceIgnored`] until [`LogSources::retry`].
    pub fn feed_bytes(&mut self, id: &SourceId, bytes: &[u8]) -> Result<Vec<String>> {
        let source = self
            .sources
            .get_mut(id)
            .ok_or_else(|| IntelError::UnknownSource(id.clone()))?;
        if source.ignored {
            return Err(IntelError::SourceIgnored(id.clone()));
        }

        match decode_log_bytes(bytes) {
            Ok(text) => Ok(text.lines().map(str::to_string).collect()),
            Err(reason) => {
                source.ignored = true;
                warn!(source = %id, %reason, "log source unreadable, ignoring it");
                Err(IntelError::SourceUnreadable {
                    source_id: id.clone(),
                    reason,
                })
            }
        }
    }

    /// Clear the ignored mark of a source.
    pub fn retry(&mut self, id: &SourceId) -> Result<()> {
        let source = self
            .sources
            .get_mut(id)
            .ok_or_else(|| IntelError::UnknownSource(id.clone()))?;
        if source.ignored {
            info!(source = %id, "retrying ignored log source");
        }
        source.ignored = false;
        Ok(())
    }

    pub fn is_ignored(&self, id: &SourceId) -> bool {
        self.sources.get(id).is_some_and(|s| s.ignored)
    }
}
