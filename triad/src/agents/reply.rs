use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

/// Thoughts recorded when the model ignored the JSON reply format.
pub const UNSTRUCTURED_THOUGHTS: &str = "Processed the input and structured the response";

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("valid JSON object pattern"));

/// A model reply split into its reasoning and its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    pub thoughts: String,
    pub response: String,
}

impl AgentReply {
    /// Parse a raw model reply.
    ///
    /// Replies are expected to be `{"thoughts": ..., "response": ...}`, possibly
    /// wrapped in other text. Anything that does not parse becomes the response
    /// verbatim (minus control characters).
    pub fn parse(raw: &str) -> Self {
        let cleaned = strip_control_chars(raw.trim());

        let candidate = JSON_OBJECT
            .find(&cleaned)
            .map(|m| m.as_str())
            .unwrap_or(cleaned.as_str());

        match parse_object(candidate) {
            Some(object) => {
                debug!("parsed structured agent reply");
                Self {
                    thoughts: field_text(&object, "thoughts"),
                    response: field_text(&object, "response"),
                }
            }
            None => {
                warn!("agent reply was not valid JSON, using raw text as response");
                Self {
                    thoughts: UNSTRUCTURED_THOUGHTS.to_string(),
                    response: cleaned,
                }
            }
        }
    }
}

fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

/// Parse `text` as a JSON object, retrying with raw whitespace escaped since
/// models often put literal newlines inside string values.
fn parse_object(text: &str) -> Option<serde_json::Map<String, Value>> {
    let parsed = serde_json::from_str::<Value>(text)
        .or_else(|_| serde_json::from_str::<Value>(&escape_raw_whitespace_in_strings(text)));

    match parsed {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn escape_raw_whitespace_in_strings(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            match c {
                _ if escaped => {
                    escaped = false;
                    out.push(c);
                }
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                _ => out.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
        }
    }

    out
}

fn field_text(object: &serde_json::Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_plain_json_reply() {
        let reply = AgentReply::parse(r#"{"thoughts": "think", "response": "answer"}"#);
        assert_eq!(reply.thoughts, "think");
        assert_eq!(reply.response, "answer");
    }

    #[test]
    fn test_extracts_json_wrapped_in_prose() {
        let raw = "Sure, here you go:\n```json\n{\"thoughts\": \"t\", \"response\": \"r\"}\n```";
        let reply = AgentReply::parse(raw);
        assert_eq!(reply.thoughts, "t");
        assert_eq!(reply.response, "r");
    }

    #[test]
    fn test_recovers_literal_newlines_inside_strings() {
        let raw = "{\"thoughts\": \"first\nsecond\", \"response\": \"a\n\tb\"}";
        let reply = AgentReply::parse(raw);
        assert_eq!(reply.thoughts, "first\nsecond");
        assert_eq!(reply.response, "a\n\tb");
    }

    #[test]
    fn test_pretty_printed_reply_with_raw_newlines() {
        let raw = "{\n  \"thoughts\": \"step one\nstep two\",\n  \"response\": \"done\"\n}";
        let reply = AgentReply::parse(raw);
        assert_eq!(reply.thoughts, "step one\nstep two");
        assert_eq!(reply.response, "done");
    }

    #[test]
    fn test_falls_back_to_raw_text() {
        let reply = AgentReply::parse("  Just some prose, no JSON here.  ");
        assert_eq!(reply.thoughts, UNSTRUCTURED_THOUGHTS);
        assert_eq!(reply.response, "Just some prose, no JSON here.");
    }

    #[test]
    fn test_non_object_json_falls_back() {
        let reply = AgentReply::parse("[1, 2, 3]");
        assert_eq!(reply.thoughts, UNSTRUCTURED_THOUGHTS);
        assert_eq!(reply.response, "[1, 2, 3]");
    }

    #[test]
    fn test_missing_and_non_string_fields() {
        let reply = AgentReply::parse(r#"{"response": ["a", "b"]}"#);
        assert_eq!(reply.thoughts, "");
        assert_eq!(reply.response, r#"["a","b"]"#);
    }

    #[test]
    fn test_strips_control_characters_but_keeps_unicode() {
        let reply = AgentReply::parse("caf\u{e9}\u{0007} \u{1F916}");
        assert_eq!(reply.response, "caf\u{e9} \u{1F916}");
    }

    #[test]
    fn test_empty_reply_is_empty_response() {
        let reply = AgentReply::parse("");
        assert_eq!(reply.response, "");
    }
}
