//! URL matcher.

use super::{Matcher, Recognition};
use crate::message::{AnnotationKind, RichText};

const URL_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Finds `http://` and `https://` links; a link runs to the next whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlMatcher;

impl Matcher for UrlMatcher {
    fn match_once(&self, text: &mut RichText) -> Option<Recognition> {
        let hit = text.plain_spans().find_map(|(idx, span)| {
            let lower = span.to_ascii_lowercase();
            let start = URL_PREFIXES
                .iter()
                .filter_map(|prefix| lower.find(prefix))
                .min()?;
            let end = span[start..]
                .find(char::is_whitespace)
                .map_or(span.len(), |offset| start + offset);
            Some((idx, start..end, span[start..end].to_string()))
        });

        let (idx, range, url) = hit?;
        if !text.annotate(idx, range, AnnotationKind::Url, url.clone()) {
            return None;
        }
        Some(Recognition {
            kind: AnnotationKind::Url,
            payload: url,
            location: None,
        })
    }
}
