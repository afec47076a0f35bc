//! Delimiter-driven extraction of conversations from free-text model output.
//!
//! Model replies carry no guaranteed structure, so extraction is lossy by
//! design: segments missing a required label or producing an empty field are
//! dropped silently, never surfaced as errors. A conversation is kept only if
//! every exchange parsed; partial conversations are worse than none because
//! downstream formats assume exchange-count symmetry.

use std::sync::LazyLock;

use regex::Regex;

use crate::prompt::{followup_answer_label, followup_label};

const CONVERSATION_DELIMITER: &str = "CONVERSATION";

/// One question/answer turn pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

/// A complete ordered sequence of exchanges extracted from one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub exchanges: Vec<Exchange>,
}

// A whole run of markers ("1. 2) " style leftovers) is stripped at once so
// normalization is a fixpoint.
static ENUMERATION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]+[.)]?\s*)+").expect("enumeration prefix regex must compile")
});

static BLANK_LINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank line regex must compile"));

fn normalize_question(raw: &str) -> String {
    ENUMERATION_PREFIX
        .replace(raw.trim(), "")
        .trim()
        .to_lowercase()
}

fn normalize_answer(raw: &str) -> String {
    BLANK_LINE_RUNS
        .replace_all(raw.trim(), "\n\n")
        .trim()
        .to_owned()
}

/// The ordered label sequence a segment must contain for the configured
/// exchange depth. Mirrors the labels the prompt builder emits.
fn segment_labels(num_exchanges: usize) -> Vec<String> {
    let mut labels = vec!["QUESTION:".to_owned(), "ANSWER:".to_owned()];
    for round in 2..=num_exchanges {
        labels.push(followup_label(round, num_exchanges));
        labels.push(followup_answer_label(round, num_exchanges));
    }
    labels
}

/// Extract every well-formed conversation from a raw model reply.
///
/// Text before the first `CONVERSATION` token is preamble and ignored.
/// `num_exchanges` below 1 is clamped to 1.
#[must_use]
pub fn parse(raw_text: &str, num_exchanges: usize) -> Vec<Conversation> {
    let labels = segment_labels(num_exchanges.max(1));

    raw_text
        .split(CONVERSATION_DELIMITER)
        .skip(1)
        .filter_map(|segment| parse_segment(segment, &labels))
        .collect()
}

/// Ordered label scan: each field is the text between one label and the next,
/// the last field runs to the end of the segment. Any missing label discards
/// the whole segment.
fn parse_segment(segment: &str, labels: &[String]) -> Option<Conversation> {
    let mut fields: Vec<&str> = Vec::with_capacity(labels.len());

    let start = segment.find(labels[0].as_str())?;
    let mut rest = &segment[start + labels[0].len()..];
    for label in &labels[1..] {
        let pos = rest.find(label.as_str())?;
        fields.push(&rest[..pos]);
        rest = &rest[pos + label.len()..];
    }
    fields.push(rest);

    let mut exchanges = Vec::with_capacity(fields.len() / 2);
    for pair in fields.chunks(2) {
        let question = normalize_question(pair[0]);
        let answer = normalize_answer(pair[1]);
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        exchanges.push(Exchange { question, answer });
    }

    Some(Conversation { exchanges })
}
