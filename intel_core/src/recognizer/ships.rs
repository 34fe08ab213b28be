//! Ship-name matcher.

use super::{Matcher, Recognition};
use crate::message::{AnnotationKind, RichText};

/// Catalog of canonical ship names; also the ship matcher.
///
/// Names are stored upper-case, longest first, so "Raven Navy Issue" wins
/// over "Raven".
#[derive(Debug, Clone, Default)]
pub struct ShipCatalog {
    names: Vec<String>,
}

impl ShipCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_ascii_uppercase())
            .filter(|n| !n.is_empty())
            .collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        let upper = name.trim().to_ascii_uppercase();
        self.names.iter().any(|n| *n == upper)
    }
}

/// Whether the character before a hit separates it from the previous word.
///
/// A multiplier like "5x" directly in front of the name also counts.
fn leading_boundary(upper: &str, start: usize) -> bool {
    let mut before = upper[..start].chars().rev();
    match before.next() {
        None => true,
        Some('X') => before.next().map_or(true, |c| c.is_ascii_digit() || !c.is_alphanumeric()),
        Some(c) => !c.is_alphanumeric(),
    }
}

/// Whether the text after a hit ends the word, allowing a plural "s".
fn trailing_boundary(upper: &str, end: usize) -> bool {
    let mut after = upper[end..].chars();
    match after.next() {
        None => true,
        Some('S') => after.next().map_or(true, |c| !c.is_alphanumeric()),
        Some(c) => !c.is_alphanumeric(),
    }
}

impl Matcher for ShipCatalog {
    fn match_once(&self, text: &mut RichText) -> Option<Recognition> {
        let hit = text.plain_spans().find_map(|(idx, span)| {
            let upper = span.to_ascii_uppercase();
            self.names.iter().find_map(|name| {
                upper
                    .match_indices(name.as_str())
                    .map(|(start, _)| start..start + name.len())
                    .find(|range| {
                        leading_boundary(&upper, range.start) && trailing_boundary(&upper, range.end)
                    })
                    .map(|range| (idx, range, name.clone()))
            })
        });

        let (idx, range, name) = hit?;
        if !text.annotate(idx, range, AnnotationKind::Ship, name.clone()) {
            return None;
        }
        Some(Recognition {
            kind: AnnotationKind::Ship,
            payload: name,
            location: None,
        })
    }
}
