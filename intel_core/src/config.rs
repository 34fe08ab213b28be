//! Runtime settings of the intel core.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings that shape parsing and alarm propagation.
///
/// Every field has a default, so a TOML document only needs the keys it changes:
///
/// ```toml
/// watched_rooms = ["Intel.North", "Intel.South"]
/// alarm_distance = 2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntelConfig {
    /// Intel rooms whose messages are parsed for locations.
    pub watched_rooms: Vec<String>,

    /// Jumps around an alarmed location within which located characters are notified.
    pub alarm_distance: u32,

    /// How many earlier messages of a room a bare "clear" may answer.
    pub answer_scan_depth: usize,

    /// How long (in message time) a message is remembered for deduplication.
    pub dedup_window_secs: i64,

    /// Maximum number of remembered messages.
    pub dedup_capacity: usize,

    /// Characters that never trigger notifications.
    pub friendly_characters: Vec<String>,
}

impl Default for IntelConfig {
    fn default() -> Self {
        Self {
            watched_rooms: Vec::new(),
            alarm_distance: 0,
            answer_scan_depth: 2,
            dedup_window_secs: 20 * 60,
            dedup_capacity: 4096,
            friendly_characters: Vec::new(),
        }
    }
}

impl IntelConfig {
    /// Parse settings from a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn with_watched_rooms<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.watched_rooms = rooms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_alarm_distance(mut self, distance: u32) -> Self {
        self.alarm_distance = distance;
        self
    }

    pub fn with_answer_scan_depth(mut self, depth: usize) -> Self {
        self.answer_scan_depth = depth;
        self
    }

    pub fn with_dedup_window_secs(mut self, secs: i64) -> Self {
        self.dedup_window_secs = secs;
        self
    }

    pub fn with_friendly_characters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.friendly_characters = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_watched(&self, room: &str) -> bool {
        self.watched_rooms.iter().any(|r| r == room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntelError;

    #[test]
    fn test_defaults() {
        let config = IntelConfig::default();
        assert_eq!(config.alarm_distance, 0);
        assert_eq!(config.answer_scan_depth, 2);
        assert_eq!(config.dedup_window_secs, 1200);
        assert!(config.watched_rooms.is_empty());
    }

    #[test]
    fn test_partial_toml() {
        let config = IntelConfig::from_toml_str(
            r#"
            watched_rooms = ["Intel.North"]
            alarm_distance = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.watched_rooms, vec!["Intel.North"]);
        assert_eq!(config.alarm_distance, 3);
        assert_eq!(config.answer_scan_depth, 2);
        assert!(config.is_watched("Intel.North"));
        assert!(!config.is_watched("Local"));
    }

    #[test]
    fn test_invalid_toml() {
        let result = IntelConfig::from_toml_str("alarm_distance = \"far\"");
        assert!(matches!(result, Err(IntelError::Config(_))));
    }

    #[test]
    fn test_builder() {
        let config = IntelConfig::default()
            .with_watched_rooms(["A", "B"])
            .with_alarm_distance(2)
            .with_answer_scan_depth(4)
            .with_friendly_characters(["Me"]);

        assert_eq!(config.watched_rooms.len(), 2);
        assert_eq!(config.alarm_distance, 2);
        assert_eq!(config.answer_scan_depth, 4);
        assert_eq!(config.friendly_characters, vec!["Me"]);
    }
}
