//! Chat line tokenizing.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use tracing::debug;

/// Timestamp format of chat lines and log headers (game time, UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// `[ 2015.03.04 20:12:33 ] User Name > message text`
const LINE_PATTERN: &str = r"^\s*\[\s*([^\]]*?)\s*\]\s*([^>]*?)\s*>\s*(.*?)\s*$";

/// The three fields of a chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub text: String,
}

/// Splits chat lines into timestamp, user and text.
#[derive(Debug, Clone)]
pub struct LineTokenizer {
    pattern: Regex,
}

impl LineTokenizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(LINE_PATTERN)?,
        })
    }

    /// Tokenize `line`. Lines without a valid bracketed timestamp yield `None`.
    pub fn tokenize(&self, line: &str) -> Option<RawLine> {
        let Some(caps) = self.pattern.captures(line) else {
            debug!(line, "skipping line without timestamp");
            return None;
        };
        let stamp = caps.get(1).map_or("", |m| m.as_str());
        let timestamp = match parse_timestamp(stamp) {
            Some(timestamp) => timestamp,
            None => {
                debug!(line, stamp, "skipping line with malformed timestamp");
                return None;
            }
        };
        Some(RawLine {
            timestamp,
            user: caps.get(2).map_or("", |m| m.as_str()).to_string(),
            text: caps.get(3).map_or("", |m| m.as_str()).to_string(),
        })
    }
}

/// Parse a `YYYY.MM.DD HH:MM:SS` game timestamp.
pub fn parse_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(stamp.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_tokenize_line() {
        let tokenizer = LineTokenizer::new().unwrap();
        let raw = tokenizer
            .tokenize("[ 2015.03.04 20:12:33 ] Alice Pilot > J115-3 clear")
            .unwrap();
        assert_eq!(raw.timestamp, Utc.with_ymd_and_hms(2015, 3, 4, 20, 12, 33).unwrap());
        assert_eq!(raw.user, "Alice Pilot");
        assert_eq!(raw.text, "J115-3 clear");
    }

    #[test]
    fn test_tight_brackets() {
        let tokenizer = LineTokenizer::new().unwrap();
        let raw = tokenizer.tokenize("[2015.03.04 20:12:33] Bob > XXX pilot1, pilot2").unwrap();
        assert_eq!(raw.user, "Bob");
        assert_eq!(raw.text, "XXX pilot1, pilot2");
    }

    #[test]
    fn test_text_keeps_later_arrows() {
        let tokenizer = LineTokenizer::new().unwrap();
        let raw = tokenizer.tokenize("[ 2015.03.04 20:12:33 ] Bob > a > b").unwrap();
        assert_eq!(raw.text, "a > b");
    }

    #[test]
    fn test_malformed_lines() {
        let tokenizer = LineTokenizer::new().unwrap();
        assert!(tokenizer.tokenize("no timestamp here").is_none());
        assert!(tokenizer.tokenize("[ yesterday ] Bob > hi").is_none());
        assert!(tokenizer.tokenize("[ 2015.13.04 20:12:33 ] Bob > hi").is_none());
        assert!(tokenizer.tokenize("[ 2015.03.04 20:12:33 ] Bob without arrow").is_none());
    }
}
