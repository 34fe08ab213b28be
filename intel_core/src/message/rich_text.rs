//! Rich text: a message body split into plain and annotated spans.
//!
//! Recognizers only ever look at `Plain` spans. A match splits one plain
//! span into up to three spans (before, annotated, after), so a recognized
//! piece of text can never be matched again.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// What kind of entity an annotated span refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    Ship,
    Url,
    Location,
}

/// One piece of a message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Span {
    Plain(String),
    Annotated {
        kind: AnnotationKind,
        /// The text exactly as written.
        text: String,
        /// Canonical value: ship name, URL, or location name.
        payload: String,
    },
}

impl Span {
    /// The text of this span exactly as written.
    pub fn text(&self) -> &str {
        match self {
            Span::Plain(text) => text,
            Span::Annotated { text, .. } => text,
        }
    }
}

/// An ordered sequence of spans whose texts concatenate to the original message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RichText {
    spans: Vec<Span>,
}

impl RichText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let spans = if text.is_empty() {
            Vec::new()
        } else {
            vec![Span::Plain(text)]
        };
        Self { spans }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Plain spans with their index.
    pub fn plain_spans(&self) -> impl Iterator<Item = (usize, &str)> {
        self.spans.iter().enumerate().filter_map(|(idx, span)| match span {
            Span::Plain(text) => Some((idx, text.as_str())),
            Span::Annotated { .. } => None,
        })
    }

    /// Annotated spans as `(kind, text, payload)`.
    pub fn annotations(&self) -> impl Iterator<Item = (AnnotationKind, &str, &str)> {
        self.spans.iter().filter_map(|span| match span {
            Span::Annotated {
                kind,
                text,
                payload,
            } => Some((*kind, text.as_str(), payload.as_str())),
            Span::Plain(_) => None,
        })
    }

    /// The full text with all markup removed.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }

    /// Wrap `range` (byte offsets) of plain span `span_index` as an annotation.
    ///
    /// Returns `false` without touching anything if the span is not plain or
    /// the range is empty, out of bounds or not on char boundaries.
    pub fn annotate(
        &mut self,
        span_index: usize,
        range: Range<usize>,
        kind: AnnotationKind,
        payload: impl Into<String>,
    ) -> bool {
        let Some(Span::Plain(text)) = self.spans.get(span_index) else {
            return false;
        };
        if range.is_empty()
            || range.end > text.len()
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            return false;
        }

        let before = &text[..range.start];
        let matched = &text[range.clone()];
        let after = &text[range.end..];

        let mut replacement = Vec::with_capacity(3);
        if !before.is_empty() {
            replacement.push(Span::Plain(before.to_string()));
        }
        replacement.push(Span::Annotated {
            kind,
            text: matched.to_string(),
            payload: payload.into(),
        });
        if !after.is_empty() {
            replacement.push(Span::Plain(after.to_string()));
        }

        self.spans.splice(span_index..=span_index, replacement);
        true
    }
}

impl std::fmt::Display for RichText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.plain_text())
    }
}
