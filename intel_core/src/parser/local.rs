//! Local chat: the game client reports jumps of the listening character
//! through system messages such as
//! `[ 2015.03.04 20:12:33 ] EVE System > Channel changed to Local : J115-3*`.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Senders of client-generated system messages.
pub const SYSTEM_USERS: [&str; 2] = ["EVE System", "EVE-System"];

pub fn is_system_user(user: &str) -> bool {
    SYSTEM_USERS.contains(&user)
}

/// Location name reported by a system message, upper-cased.
pub fn reported_location(text: &str) -> Option<String> {
    let field = text.split(':').nth(1)?;
    let name: String = field.trim().chars().filter(|&c| c != '*').collect();
    let name = name.trim().to_uppercase();
    (!name.is_empty()).then_some(name)
}

/// Newest location report seen per character.
#[derive(Debug, Clone, Default)]
pub struct LocalTracker {
    last_report: HashMap<String, DateTime<Utc>>,
}

impl LocalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a report for `character`. Returns `false` for reports older
    /// than the last one seen.
    pub fn observe(&mut self, character: &str, timestamp: DateTime<Utc>) -> bool {
        match self.last_report.get(character) {
            Some(&last) if timestamp < last => false,
            _ => {
                self.last_report.insert(character.to_string(), timestamp);
                true
            }
        }
    }

    pub fn last_report(&self, character: &str) -> Option<DateTime<Utc>> {
        self.last_report.get(character).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_reported_location() {
        assert_eq!(
            reported_location("Channel changed to Local : j115-3*").as_deref(),
            Some("J115-3")
        );
        assert_eq!(reported_location("Channel changed to Local"), None);
        assert_eq!(reported_location("Local :  "), None);
        assert_eq!(
            reported_location("Channel changed to Local : F-YH58 : note").as_deref(),
            Some("F-YH58")
        );
    }

    #[test]
    fn test_older_reports_rejected() {
        let mut tracker = LocalTracker::new();
        let t1 = Utc.with_ymd_and_hms(2015, 3, 4, 20, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2015, 3, 4, 20, 5, 0).unwrap();

        assert!(tracker.observe("Alice", t2));
        assert!(!tracker.observe("Alice", t1));
        assert!(tracker.observe("Alice", t2));
        assert!(tracker.observe("Bob", t1));
        assert_eq!(tracker.last_report("Alice"), Some(t2));
    }
}
