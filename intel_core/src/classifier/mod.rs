//! Status Classifier - derives the intent of a message from its plain text.

use crate::message::{MessageStatus, RichText};
use crate::recognizer::strip_ignored;

/// Phrases that on their own mean "only friendlies here".
const ALL_CLEAR_PHRASES: [&str; 5] = ["BLUE", "BLUES ONLY", "ONLY BLUE", "STILL BLUE", "ALL BLUES"];

const CLEAR_WORDS: [&str; 2] = ["CLEAR", "CLR"];
const REQUEST_WORDS: [&str; 2] = ["STAT", "STATUS"];

/// Classify one span. `None` means the span says nothing definitive.
pub fn classify_span(span: &str) -> Option<MessageStatus> {
    let trimmed = span.trim().to_uppercase();
    let stripped = strip_ignored(&trimmed);
    let words: Vec<&str> = stripped.split_whitespace().collect();
    let has_word = |candidates: &[&str]| words.iter().any(|w| candidates.contains(w));

    if has_word(&CLEAR_WORDS) && !trimmed.ends_with('?') {
        Some(MessageStatus::Clear)
    } else if has_word(&REQUEST_WORDS) || trimmed.contains('?') {
        Some(MessageStatus::Request)
    } else if ALL_CLEAR_PHRASES.contains(&trimmed.as_str()) {
        Some(MessageStatus::Clear)
    } else {
        None
    }
}

/// Classify the plain spans of a message in order; the first definitive span wins.
///
/// `None` is "unresolved"; the parser treats that as an alarm.
pub fn classify(text: &RichText) -> Option<MessageStatus> {
    text.plain_spans().find_map(|(_, span)| classify_span(span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::AnnotationKind;

    #[test]
    fn test_clear_words() {
        assert_eq!(classify_span("j115 clear"), Some(MessageStatus::Clear));
        assert_eq!(classify_span("CLR."), Some(MessageStatus::Clear));
        assert_eq!(classify_span("nv clear!"), Some(MessageStatus::Clear));
    }

    #[test]
    fn test_clear_question_is_request() {
        assert_eq!(classify_span("clear?"), Some(MessageStatus::Request));
        assert_eq!(classify_span("is it clr ?"), Some(MessageStatus::Request));
    }

    #[test]
    fn test_request_words() {
        assert_eq!(classify_span("stat"), Some(MessageStatus::Request));
        assert_eq!(classify_span("status pls"), Some(MessageStatus::Request));
        assert_eq!(classify_span("anyone on gate?"), Some(MessageStatus::Request));
    }

    #[test]
    fn test_all_clear_phrases() {
        assert_eq!(classify_span(" blue "), Some(MessageStatus::Clear));
        assert_eq!(classify_span("Still Blue"), Some(MessageStatus::Clear));
        assert_eq!(classify_span("only blue"), Some(MessageStatus::Clear));
        assert_eq!(classify_span("blue and red"), None);
    }

    #[test]
    fn test_whole_words_only() {
        assert_eq!(classify_span("unclear 5 reds"), None);
        assert_eq!(classify_span("statue"), None);
    }

    #[test]
    fn test_unresolved() {
        assert_eq!(classify_span("3 reds on gate"), None);
        assert_eq!(classify_span(""), None);
    }

    #[test]
    fn test_classify_skips_annotated_spans() {
        let mut text = RichText::new("CLEAR 2 reds");
        text.annotate(0, 0..5, AnnotationKind::Location, "CLEAR");
        assert_eq!(classify(&text), None);

        let text = RichText::new("J115 clr");
        assert_eq!(classify(&text), Some(MessageStatus::Clear));
    }
}
