//! Location matcher.
//!
//! Candidate words are tried against the map catalog with rules of falling
//! specificity. The word's shape picks the rule; a rule that finds no name
//! means no match:
//! 1. A word followed by "GATE" (but not "GATE TO") is skipped
//! 2. Ambiguous short words written in lower case are skipped
//! 3. Exact name match
//! 4. 2-4 characters: abbreviation, the start of a name
//! 5. Hyphenated: both hyphen parts start like a name's parts ("I4-IF" for "I43-IF3")
//! 6. Anything longer: the start of a name with its hyphens removed ("FY" for "F-YH58")

use std::ops::Range;

use star_map::{LocationId, StarMap};

use super::{strip_ignored, tokens, Matcher, Recognition, CHARS_TO_IGNORE};
use crate::message::{AnnotationKind, RichText};

/// Words that are also valid abbreviations, skipped unless written upper-case.
const AMBIGUOUS_WORDS: [&str; 3] = ["IN", "IS", "AS"];

const GATE_MARKER: &str = "GATE";
const GATE_TO_MARKER: &str = "TO";

/// A candidate word: its byte range in the span and its normalized form.
struct Word {
    range: Range<usize>,
    /// Punctuation stripped, as written.
    text: String,
    upper: String,
}

fn candidate_words(span: &str) -> Vec<Word> {
    tokens(span)
        .into_iter()
        .filter_map(|(range, token)| {
            let text = strip_ignored(token);
            if text.is_empty() {
                return None;
            }
            // Only the punctuation at the edges falls outside the annotation.
            let lead = token.len() - token.trim_start_matches(CHARS_TO_IGNORE).len();
            let trail = token.len() - token.trim_end_matches(CHARS_TO_IGNORE).len();
            let upper = text.to_uppercase();
            Some(Word {
                range: range.start + lead..range.end - trail,
                text,
                upper,
            })
        })
        .collect()
}

/// Matches words against the location names of a [`StarMap`].
pub struct LocationMatcher<'a> {
    map: &'a StarMap,
}

impl<'a> LocationMatcher<'a> {
    pub fn new(map: &'a StarMap) -> Self {
        Self { map }
    }

    /// Resolve the word at `idx` to a location, following the rule order.
    fn resolve(&self, words: &[Word], idx: usize) -> Option<(LocationId, String)> {
        let word = &words[idx];
        let upper = word.upper.as_str();

        if words.get(idx + 1).is_some_and(|next| next.upper == GATE_MARKER)
            && !words.get(idx + 2).is_some_and(|after| after.upper == GATE_TO_MARKER)
        {
            return None;
        }

        if word.upper != word.text && AMBIGUOUS_WORDS.contains(&upper) {
            return None;
        }

        if let Some(id) = self.map.location_id(upper) {
            return Some((id, upper.to_string()));
        }

        let len = upper.chars().count();
        if (2..=4).contains(&len) {
            self.find_name(|name| name.starts_with(upper))
        } else if upper.contains('-') && len > 2 {
            let parts: Vec<&str> = upper.split('-').collect();
            if !hyphen_parts_valid(&parts) {
                return None;
            }
            self.find_name(|name| {
                let name_parts: Vec<&str> = name.split('-').collect();
                hyphen_parts_valid(&name_parts)
                    && parts[0].chars().next() == name_parts[0].chars().next()
                    && parts[1].chars().next() == name_parts[1].chars().next()
            })
        } else if len > 1 {
            self.find_name(|name| name.replace('-', "").starts_with(upper))
        } else {
            None
        }
    }

    /// First catalog name (in name order) satisfying `predicate`.
    fn find_name<F>(&self, predicate: F) -> Option<(LocationId, String)>
    where
        F: Fn(&str) -> bool,
    {
        self.map
            .names()
            .find(|(name, _)| predicate(name))
            .map(|(name, id)| (id, name.to_string()))
    }
}

/// Exactly two hyphen parts, each longer than one character.
fn hyphen_parts_valid(parts: &[&str]) -> bool {
    parts.len() == 2 && parts.iter().all(|p| p.chars().count() > 1)
}

impl Matcher for LocationMatcher<'_> {
    fn match_once(&self, text: &mut RichText) -> Option<Recognition> {
        let hit = text.plain_spans().find_map(|(idx, span)| {
            let words = candidate_words(span);
            (0..words.len()).find_map(|w| {
                self.resolve(&words, w)
                    .map(|(id, name)| (idx, words[w].range.clone(), id, name))
            })
        });

        let (idx, range, id, name) = hit?;
        if !text.annotate(idx, range, AnnotationKind::Location, name.clone()) {
            return None;
        }
        Some(Recognition {
            kind: AnnotationKind::Location,
            payload: name,
            location: Some(id),
        })
    }
}
