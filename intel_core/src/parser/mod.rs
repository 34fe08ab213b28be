//! Message Parser - turns raw chat lines into messages.
//!
//! Intel rooms go through the full pipeline:
//! 1. **Tokenize**: Timestamp, user and text; malformed lines are dropped
//! 2. **Shortcut**: KOS requests skip everything else
//! 3. **Dedup**: A line already seen comes back as `Ignore`
//! 4. **Recognize**: Ships, then URLs, then locations
//! 5. **Classify**: Clear, request or (by default) alarm
//!
//! Local chat only yields location changes of the listening character.

mod line;
mod local;

pub use line::*;
pub use local::*;

use chrono::Duration;
use tracing::{debug, trace};

use star_map::StarMap;

use crate::classifier::classify;
use crate::config::IntelConfig;
use crate::error::Result;
use crate::ledger::DedupLedger;
use crate::message::{Message, MessageStatus, KOS_REQUEST_MARKER};
use crate::recognizer::EntityRecognizer;

/// Lines shorter than this (after trimming) are never parsed.
const MIN_LINE_LEN: usize = 3;

/// Rooms whose every message is a KOS request start with this.
const KOS_ROOM_PREFIX: char = '=';

/// Parses chat lines and remembers what it has already seen.
#[derive(Debug, Clone)]
pub struct ChatParser {
    config: IntelConfig,
    tokenizer: LineTokenizer,
    recognizer: EntityRecognizer,
    ledger: DedupLedger,
    local: LocalTracker,
}

impl ChatParser {
    pub fn new(config: IntelConfig, recognizer: EntityRecognizer) -> Result<Self> {
        let ledger = DedupLedger::new(
            Duration::seconds(config.dedup_window_secs),
            config.dedup_capacity,
        );
        Ok(Self {
            tokenizer: LineTokenizer::new()?,
            config,
            recognizer,
            ledger,
            local: LocalTracker::new(),
        })
    }

    pub fn config(&self) -> &IntelConfig {
        &self.config
    }

    pub fn ledger(&self) -> &DedupLedger {
        &self.ledger
    }

    pub fn local_tracker(&self) -> &LocalTracker {
        &self.local
    }

    /// Parse one line posted in an intel room.
    ///
    /// Returns `None` for malformed lines and for rooms that are not watched.
    /// Referenced locations get a back-link to the new message.
    pub fn parse_line(&mut self, line: &str, room: &str, map: &mut StarMap) -> Option<Message> {
        let raw = self.tokenizer.tokenize(line)?;

        if raw.text.to_uppercase().starts_with(KOS_REQUEST_MARKER) {
            return Some(Message::new(room, raw.text, raw.timestamp, raw.user, MessageStatus::KosStatusRequest));
        }
        if room.starts_with(KOS_ROOM_PREFIX) {
            let text = format!("{KOS_REQUEST_MARKER}{}", raw.text);
            return Some(Message::new(room, text, raw.timestamp, raw.user, MessageStatus::KosStatusRequest));
        }
        if !self.config.is_watched(room) {
            trace!(room, "room not watched");
            return None;
        }

        // Status is provisional until classification below.
        let mut message = Message::new(room, raw.text, raw.timestamp, raw.user, MessageStatus::Alarm);
        if self.ledger.contains(&message.key()) {
            debug!(room, user = %message.user, "duplicate message");
            message.status = MessageStatus::Ignore;
            return Some(message);
        }

        message.locations = self.recognizer.recognize(&mut message.rich_text, map);
        message.status = classify(&message.rich_text).unwrap_or(MessageStatus::Alarm);

        if message.status == MessageStatus::Clear && message.locations.is_empty() {
            let answered = self
                .ledger
                .recent_in_room(room, self.config.answer_scan_depth)
                .find(|entry| entry.status == MessageStatus::Request && !entry.locations.is_empty());
            if let Some(request) = answered {
                message.locations = request.locations.clone();
            }
        }

        self.ledger.record(&message);
        for id in &message.locations {
            if let Some(location) = map.get_mut(*id) {
                location.link_message(message.id);
            }
        }
        Some(message)
    }

    /// Parse newly appended lines of an intel room, in order.
    pub fn parse_lines<S: AsRef<str>>(&mut self, room: &str, lines: &[S], map: &mut StarMap) -> Vec<Message> {
        lines
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|line| line.trim().chars().count() >= MIN_LINE_LEN)
            .filter_map(|line| self.parse_line(line, room, map))
            .collect()
    }

    /// Parse one local chat line of `listener`'s client.
    ///
    /// Only system messages reporting a location change yield a message.
    pub fn parse_local_line(
        &mut self,
        line: &str,
        room: &str,
        listener: &str,
        map: &StarMap,
    ) -> Option<Message> {
        let raw = self.tokenizer.tokenize(line)?;
        if !is_system_user(&raw.user) {
            return None;
        }
        let name = reported_location(&raw.text)?;
        if !self.local.observe(listener, raw.timestamp) {
            debug!(listener, location = %name, "stale location report");
            return None;
        }

        let location = map.location_id(&name);
        if location.is_none() {
            debug!(listener, location = %name, "reported location not in map");
        }
        Some(
            Message::new(room, raw.text, raw.timestamp, listener, MessageStatus::LocationChange)
                .with_locations(location),
        )
    }

    /// Parse newly appended lines of a local chat log, in order.
    pub fn parse_local_lines<S: AsRef<str>>(
        &mut self,
        room: &str,
        listener: &str,
        lines: &[S],
        map: &StarMap,
    ) -> Vec<Message> {
        lines
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|line| line.trim().chars().count() >= MIN_LINE_LEN)
            .filter_map(|line| self.parse_local_line(line, room, listener, map))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::ShipCatalog;
    use chrono::{TimeZone, Utc};
    use star_map::{Location, LocationId};
    use std::collections::BTreeSet;

    const INTEL: &str = "Intel.North";

    fn setup_test_map() -> StarMap {
        let mut map = StarMap::new();
        for (id, name) in [(1, "J115-3"), (2, "I-IOG7"), (3, "F-YH58")] {
            map.add_location(Location::new(LocationId(id), name)).unwrap();
        }
        map
    }

    fn setup_test_parser() -> ChatParser {
        let config = IntelConfig::default().with_watched_rooms([INTEL]);
        ChatParser::new(config, EntityRecognizer::new(ShipCatalog::new(["Drake", "Sabre"]))).unwrap()
    }

    #[test]
    fn test_kos_request() {
        let mut map = setup_test_map();
        let mut parser = setup_test_parser();

        let message = parser
            .parse_line("[2015.03.04 20:12:33] Bob > XXX pilot1, pilot2", "Corp", &mut map)
            .unwrap();

        assert_eq!(message.status, MessageStatus::KosStatusRequest);
        assert_eq!(message.kos_parameter(), Some("pilot1, pilot2"));
        assert_eq!(message.kos_names(), vec!["pilot1", "pilot2"]);
    }

    #[test]
    fn test_kos_room_prefixes_marker() {
        let mut map = setup_test_map();
        let mut parser = setup_test_parser();

        let message = parser
            .parse_line("[ 2015.03.04 20:12:33 ] Bob > pilot1  pilot2", "=KOS", &mut map)
            .unwrap();

        assert_eq!(message.status, MessageStatus::KosStatusRequest);
        assert_eq!(message.kos_names(), vec!["pilot1", "pilot2"]);
    }

    #[test]
    fn test_clear_report() {
        let mut map = setup_test_map();
        let mut parser = setup_test_parser();

        let message = parser
            .parse_line("[2015.03.04 20:12:33] Alice > J115-3 clear", INTEL, &mut map)
            .unwrap();

        assert_eq!(message.status, MessageStatus::Clear);
        assert_eq!(message.locations, BTreeSet::from([LocationId(1)]));
        assert_eq!(map.get(LocationId(1)).unwrap().messages(), &[message.id]);
    }

    #[test]
    fn test_unwatched_room_and_malformed_lines() {
        let mut map = setup_test_map();
        let mut parser = setup_test_parser();

        assert!(parser.parse_line("[2015.03.04 20:12:33] Alice > J115-3", "Trade", &mut map).is_none());
        assert!(parser.parse_line("[2015.03.04] Alice > J115-3", INTEL, &mut map).is_none());
        assert!(parser.parse_line("Alice > J115-3", INTEL, &mut map).is_none());
    }

    #[test]
    fn test_duplicate_is_ignored() {
        let mut map = setup_test_map();
        let mut parser = setup_test_parser();
        let line = "[ 2015.03.04 20:12:33 ] Alice > J115-3 red drake";

        let first = parser.parse_line(line, INTEL, &mut map).unwrap();
        let second = parser.parse_line(line, INTEL, &mut map).unwrap();

        assert_eq!(first.status, MessageStatus::Alarm);
        assert_eq!(second.status, MessageStatus::Ignore);
        assert!(second.locations.is_empty());
        assert_eq!(map.get(LocationId(1)).unwrap().messages().len(), 1);
        assert_eq!(parser.ledger().len(), 1);
    }

    #[test]
    fn test_clear_answers_recent_request() {
        let mut map = setup_test_map();
        let mut parser = setup_test_parser();

        let request = parser
            .parse_line("[ 2015.03.04 20:12:33 ] Bob > F-YH58 status?", INTEL, &mut map)
            .unwrap();
        assert_eq!(request.status, MessageStatus::Request);

        let answer = parser
            .parse_line("[ 2015.03.04 20:12:50 ] Alice > clr", INTEL, &mut map)
            .unwrap();

        assert_eq!(answer.status, MessageStatus::Clear);
        assert_eq!(answer.locations, BTreeSet::from([LocationId(3)]));
        assert_eq!(map.get(LocationId(3)).unwrap().messages().len(), 2);
    }

    #[test]
    fn test_clear_scan_depth_is_bounded() {
        let mut map = setup_test_map();
        let mut parser = setup_test_parser();

        parser.parse_line("[ 2015.03.04 20:12:33 ] Bob > F-YH58 status?", INTEL, &mut map);
        parser.parse_line("[ 2015.03.04 20:12:40 ] Carl > o7", INTEL, &mut map);
        parser.parse_line("[ 2015.03.04 20:12:45 ] Dave > fly safe", INTEL, &mut map);

        let answer = parser
            .parse_line("[ 2015.03.04 20:12:50 ] Alice > clear", INTEL, &mut map)
            .unwrap();

        assert_eq!(answer.status, MessageStatus::Clear);
        assert!(answer.locations.is_empty());
    }

    #[test]
    fn test_plain_text_survives_recognition() {
        let mut map = setup_test_map();
        let mut parser = setup_test_parser();
        let text = "2x sabre on J115-3 gate see https://zkill.example/k/1";

        let message = parser
            .parse_line(&format!("[ 2015.03.04 20:12:33 ] Alice > {text}"), INTEL, &mut map)
            .unwrap();

        assert_eq!(message.plain_text, text);
        assert_eq!(message.rich_text.plain_text(), text);
        assert!(message.rich_text.annotations().count() >= 3);
    }

    #[test]
    fn test_parse_lines_skips_short_lines() {
        let mut map = setup_test_map();
        let mut parser = setup_test_parser();
        let lines = [
            "",
            " x ",
            "[ 2015.03.04 20:12:33 ] Alice > J115-3",
            "[ 2015.03.04 20:12:40 ] Bob > I-IOG7 clr",
        ];

        let messages = parser.parse_lines(INTEL, &lines, &mut map);

        let statuses: Vec<_> = messages.iter().map(|m| m.status).collect();
        assert_eq!(statuses, vec![MessageStatus::Alarm, MessageStatus::Clear]);
    }

    #[test]
    fn test_local_location_change() {
        let map = setup_test_map();
        let mut parser = setup_test_parser();

        let message = parser
            .parse_local_line(
                "[ 2015.03.04 20:12:33 ] EVE System > Channel changed to Local : j115-3*",
                "Local",
                "Alice",
                &map,
            )
            .unwrap();

        assert_eq!(message.status, MessageStatus::LocationChange);
        assert_eq!(message.user, "Alice");
        assert_eq!(message.locations, BTreeSet::from([LocationId(1)]));
        assert_eq!(
            parser.local_tracker().last_report("Alice"),
            Some(Utc.with_ymd_and_hms(2015, 3, 4, 20, 12, 33).unwrap())
        );
    }

    #[test]
    fn test_local_ignores_chatter_and_stale_reports() {
        let map = setup_test_map();
        let mut parser = setup_test_parser();
        let lines = [
            "[ 2015.03.04 20:12:33 ] EVE-System > Channel changed to Local : I-IOG7",
            "[ 2015.03.04 20:10:00 ] EVE System > Channel changed to Local : J115-3",
            "[ 2015.03.04 20:13:00 ] Bob > hi : there",
            "[ 2015.03.04 20:13:10 ] EVE System > no location here",
        ];

        let messages = parser.parse_local_lines("Local", "Alice", &lines, &map);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].locations, BTreeSet::from([LocationId(2)]));
    }
}
