//! Transcript extraction: raw JSONL lines to unclassified events

use crate::text::truncate_chars;
use crate::types::{Event, Outcome, ToolCall, INPUT_SUMMARY_LIMIT};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Input fields that best describe a tool invocation, in preference order
const DESCRIPTIVE_INPUT_FIELDS: &[&str] = &[
    "file_path",
    "notebook_path",
    "command",
    "pattern",
    "path",
    "url",
    "query",
    "description",
];

/// Input fields that name a file the tool touched
const FILE_INPUT_FIELDS: &[&str] = &["file_path", "notebook_path", "path"];

/// Result of one extraction run
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub events: Vec<Event>,
    /// Non-empty lines seen
    pub lines: usize,
    /// Lines that were not valid JSON
    pub skipped: usize,
}

/// Extract one event per agent turn that carries a reasoning excerpt.
///
/// Malformed lines are skipped; extraction never fails.
pub fn extract_events<I, S>(lines: I, session_id: &str) -> Extraction
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extraction = Extraction::default();
    let mut current_prompt = String::new();

    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        extraction.lines += 1;

        let turn = match serde_json::from_str::<Value>(line) {
            Ok(t) => t,
            Err(_) => {
                extraction.skipped += 1;
                continue;
            }
        };

        let turn_type = turn.get("type").and_then(|t| t.as_str()).unwrap_or("");
        match turn_type {
            "human" | "user" => {
                let prompt = extract_prompt(&turn);
                if !prompt.is_empty() {
                    current_prompt = prompt;
                }
            }
            "assistant" => {
                if let Some(event) = event_from_turn(&turn, session_id, &current_prompt) {
                    extraction.events.push(event);
                }
            }
            _ => {}
        }
    }

    tracing::debug!(
        session_id,
        lines = extraction.lines,
        skipped = extraction.skipped,
        events = extraction.events.len(),
        "extracted transcript"
    );
    extraction
}

fn content_of(turn: &Value) -> Option<&Value> {
    turn.pointer("/message/content").or_else(|| turn.get("content"))
}

fn blocks_of<'a>(turn: &'a Value, block_type: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
    content_of(turn)
        .and_then(|c| c.as_array())
        .into_iter()
        .flatten()
        .filter(move |item| item.get("type").and_then(|t| t.as_str()) == Some(block_type))
}

fn joined_text(turn: &Value, block_type: &str, field: &str) -> String {
    blocks_of(turn, block_type)
        .filter_map(|item| item.get(field).and_then(|t| t.as_str()))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Latest user instruction text; tool results are not instructions
fn extract_prompt(turn: &Value) -> String {
    match content_of(turn) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Array(_)) => joined_text(turn, "text", "text"),
        _ => String::new(),
    }
}

fn event_from_turn(turn: &Value, session_id: &str, prompt: &str) -> Option<Event> {
    let reasoning = joined_text(turn, "thinking", "thinking");
    if reasoning.is_empty() {
        return None;
    }

    let timestamp = turn
        .get("timestamp")
        .and_then(|t| t.as_str())
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let mut event = Event::new(session_id, timestamp, reasoning)
        .with_response(joined_text(turn, "text", "text"))
        .with_prompt(prompt);

    if let Some(uuid) = turn.get("uuid").and_then(|u| u.as_str()) {
        if !uuid.is_empty() {
            event = event.with_id(uuid);
        }
    }

    for item in blocks_of(turn, "tool_use") {
        let tool_name = item
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("unknown")
            .to_string();
        let input = item.get("input").cloned().unwrap_or(Value::Null);

        for field in FILE_INPUT_FIELDS {
            if let Some(path) = input.get(*field).and_then(|v| v.as_str()) {
                if !path.is_empty() && !event.touches(path) {
                    event.files_affected.push(path.to_string());
                }
            }
        }

        event.tool_calls.push(ToolCall {
            tool_name,
            input_summary: summarize_input(&input),
            outcome: Outcome::Success,
        });
    }

    Some(event)
}

fn summarize_input(input: &Value) -> String {
    let descriptive = DESCRIPTIVE_INPUT_FIELDS
        .iter()
        .find_map(|field| input.get(*field).and_then(|v| v.as_str()));

    let summary = match descriptive {
        Some(s) => s.to_string(),
        None if input.is_null() => String::new(),
        None => input.to_string(),
    };
    truncate_chars(&summary, INPUT_SUMMARY_LIMIT)
}
