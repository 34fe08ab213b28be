//! Entity Recognizer - finds ships, URLs and locations in free text.
//!
//! Every matcher follows the same protocol:
//! 1. **Scan**: Look at the current plain spans only
//! 2. **Rewrite**: On the first hit, wrap it as an annotated span
//! 3. **Report**: Return the recognition, or `None` when nothing matched
//!
//! The caller runs one matcher until it reports `None` before moving on to
//! the next, in the order ships, URLs, locations. Because matched text
//! leaves the plain spans, every loop terminates.

mod locations;
mod ships;
mod urls;

pub use locations::*;
pub use ships::*;
pub use urls::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;

use star_map::{LocationId, StarMap};

use crate::message::{AnnotationKind, RichText};

/// Punctuation ignored when comparing words.
pub const CHARS_TO_IGNORE: [char; 5] = ['*', '?', ',', '!', '.'];

/// A single entity rewritten by a matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recognition {
    pub kind: AnnotationKind,
    /// Canonical value written into the annotation.
    pub payload: String,
    /// Set for location matches.
    pub location: Option<LocationId>,
}

/// A single-kind entity matcher.
pub trait Matcher {
    /// Rewrite at most one match in `text`.
    fn match_once(&self, text: &mut RichText) -> Option<Recognition>;
}

/// Run `matcher` until it stops matching, returning everything it found.
pub fn run_to_exhaustion<M: Matcher + ?Sized>(matcher: &M, text: &mut RichText) -> Vec<Recognition> {
    let mut found = Vec::new();
    while let Some(recognition) = matcher.match_once(text) {
        found.push(recognition);
    }
    found
}

/// Runs the ship, URL and location matchers over a message body.
#[derive(Debug, Clone, Default)]
pub struct EntityRecognizer {
    ships: ShipCatalog,
}

impl EntityRecognizer {
    pub fn new(ships: ShipCatalog) -> Self {
        Self { ships }
    }

    /// Annotate `text` in place and return the referenced locations.
    pub fn recognize(&self, text: &mut RichText, map: &StarMap) -> BTreeSet<LocationId> {
        run_to_exhaustion(&self.ships, text);
        run_to_exhaustion(&UrlMatcher, text);
        run_to_exhaustion(&LocationMatcher::new(map), text)
            .into_iter()
            .filter_map(|r| r.location)
            .collect()
    }
}

/// Whitespace-separated tokens of `text` with their byte ranges.
pub(crate) fn tokens(text: &str) -> Vec<(Range<usize>, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                out.push((s..idx, &text[s..idx]));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push((s..text.len(), &text[s..]));
    }
    out
}

/// `word` with every ignored punctuation character removed.
pub(crate) fn strip_ignored(word: &str) -> String {
    word.chars().filter(|c| !CHARS_TO_IGNORE.contains(c)).collect()
}
