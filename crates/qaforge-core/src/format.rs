//! Serialization of conversations into fine-tuning record schemas.
//!
//! Each conversation maps to exactly one compact JSON line; the aggregate
//! output is a valid JSONL stream. Unicode passes through unescaped.

use std::fmt;
use std::fmt::Write as _;

use serde_json::{Map, Value, json};

use crate::parser::Conversation;

/// Target training-example schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Gemma,
    Llama,
    ChatMl,
    Messages,
    Alpaca,
    #[default]
    Generic,
}

impl OutputFormat {
    /// Lenient name lookup: unrecognized names fall back to [`Self::Generic`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "gemma" => Self::Gemma,
            "llama" => Self::Llama,
            "chatml" => Self::ChatMl,
            "messages" | "openai" => Self::Messages,
            "alpaca" => Self::Alpaca,
            _ => Self::Generic,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gemma => "gemma",
            Self::Llama => "llama",
            Self::ChatMl => "chatml",
            Self::Messages => "messages",
            Self::Alpaca => "alpaca",
            Self::Generic => "generic",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Gemma,
            Self::Llama,
            Self::ChatMl,
            Self::Messages,
            Self::Alpaca,
            Self::Generic,
        ]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Serialize one conversation as a single JSON line in the target schema.
#[must_use]
pub fn emit(conversation: &Conversation, format: OutputFormat) -> String {
    record(conversation, format).to_string()
}

fn record(conversation: &Conversation, format: OutputFormat) -> Value {
    match format {
        OutputFormat::Gemma => json!({ "text": render_gemma(conversation) }),
        OutputFormat::Llama => json!({ "text": render_llama(conversation) }),
        OutputFormat::ChatMl => json!({ "text": render_chatml(conversation) }),
        OutputFormat::Messages => messages_record(conversation),
        OutputFormat::Alpaca => alpaca_record(conversation),
        OutputFormat::Generic => generic_record(conversation),
    }
}

fn render_gemma(conversation: &Conversation) -> String {
    let mut text = String::new();
    for (i, exchange) in conversation.exchanges.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        let _ = write!(
            text,
            "<start_of_turn>user\n{}<end_of_turn>\n<start_of_turn>model\n{}<end_of_turn>",
            exchange.question, exchange.answer
        );
    }
    text
}

fn render_llama(conversation: &Conversation) -> String {
    let mut text = String::from("<|begin_of_text|>");
    for exchange in &conversation.exchanges {
        let _ = write!(
            text,
            "<|start_header_id|>user<|end_header_id|>\n\n{}<|eot_id|>\
             <|start_header_id|>assistant<|end_header_id|>\n\n{}<|eot_id|>",
            exchange.question, exchange.answer
        );
    }
    text
}

fn render_chatml(conversation: &Conversation) -> String {
    let mut text = String::new();
    for (i, exchange) in conversation.exchanges.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        let _ = write!(
            text,
            "<|im_start|>user\n{}<|im_end|>\n<|im_start|>assistant\n{}<|im_end|>",
            exchange.question, exchange.answer
        );
    }
    text
}

fn messages_record(conversation: &Conversation) -> Value {
    let mut messages = Vec::with_capacity(conversation.exchanges.len() * 2);
    for exchange in &conversation.exchanges {
        messages.push(json!({ "role": "user", "content": exchange.question }));
        messages.push(json!({ "role": "assistant", "content": exchange.answer }));
    }
    json!({ "messages": messages })
}

/// First exchange carries the base `instruction`/`output` fields; the second
/// keeps the unnumbered `follow_up_*` names, later exchanges get a numeric
/// suffix.
fn alpaca_record(conversation: &Conversation) -> Value {
    let mut map = Map::new();
    let Some(first) = conversation.exchanges.first() else {
        return Value::Object(map);
    };
    map.insert("instruction".into(), first.question.clone().into());
    map.insert("input".into(), String::new().into());
    map.insert("output".into(), first.answer.clone().into());

    for (i, exchange) in conversation.exchanges.iter().enumerate().skip(1) {
        let (q_key, a_key) = if i == 1 {
            ("follow_up_instruction".to_owned(), "follow_up_output".to_owned())
        } else {
            (
                format!("follow_up_instruction_{}", i + 1),
                format!("follow_up_output_{}", i + 1),
            )
        };
        map.insert(q_key, exchange.question.clone().into());
        map.insert(a_key, exchange.answer.clone().into());
    }
    Value::Object(map)
}

fn generic_record(conversation: &Conversation) -> Value {
    let mut map = Map::new();
    let Some(first) = conversation.exchanges.first() else {
        return Value::Object(map);
    };
    map.insert("question".into(), first.question.clone().into());
    map.insert("answer".into(), first.answer.clone().into());

    for (i, exchange) in conversation.exchanges.iter().enumerate().skip(1) {
        let (q_key, a_key) = if i == 1 {
            ("followup_question".to_owned(), "followup_answer".to_owned())
        } else {
            (
                format!("followup_question_{}", i + 1),
                format!("followup_answer_{}", i + 1),
            )
        };
        map.insert(q_key, exchange.question.clone().into());
        map.insert(a_key, exchange.answer.clone().into());
    }
    Value::Object(map)
}
