use cairn_core::{Category, Event};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 2, 9, 30, 0).unwrap()
}

/// Two sessions of host transcript lines, oldest first
pub fn session_transcripts() -> Vec<(&'static str, Vec<Value>)> {
    vec![
        (
            "morning",
            vec![
                json!({"type": "user", "message": {"content": "the importer is too slow"}}),
                json!({
                    "type": "assistant",
                    "uuid": "m1",
                    "timestamp": "2025-04-02T09:30:00Z",
                    "message": {"content": [
                        {"type": "thinking", "thinking": "Let me look at how rows are parsed."},
                        {"type": "tool_use", "name": "Read", "input": {"file_path": "src/import.rs"}}
                    ]}
                }),
                json!({
                    "type": "assistant",
                    "uuid": "m2",
                    "timestamp": "2025-04-02T09:40:00Z",
                    "message": {"content": [
                        {"type": "thinking", "thinking": "We'll use a streaming parser instead of loading the whole file."},
                        {"type": "text", "text": "Switched the importer to streaming."},
                        {"type": "tool_use", "name": "Edit", "input": {"file_path": "src/import.rs"}},
                        {"type": "tool_use", "name": "Edit", "input": {"file_path": "src/reader.rs"}}
                    ]}
                }),
                "not json at all".into(),
            ],
        ),
        (
            "afternoon",
            vec![
                json!({"type": "user", "message": {"content": [{"type": "text", "text": "add retries to the uploader"}]}}),
                json!({
                    "type": "assistant",
                    "uuid": "a1",
                    "timestamp": "2025-04-02T14:00:00Z",
                    "message": {"content": [
                        {"type": "thinking", "thinking": "Retries add latency, but the tradeoff is worth it for flaky networks."},
                        {"type": "tool_use", "name": "Edit", "input": {"file_path": "src/upload.rs"}}
                    ]}
                }),
                json!({"type": "user", "message": {"content": [{"type": "tool_result", "content": "ok"}]}}),
                json!({
                    "type": "assistant",
                    "uuid": "a2",
                    "timestamp": "2025-04-02T14:05:00Z",
                    "message": {"content": [
                        {"type": "text", "text": "Done."}
                    ]}
                }),
            ],
        ),
    ]
}

pub fn to_lines(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}

/// Classified events spread over `sessions` sessions and a handful of files
pub fn synthetic_events(count: usize, sessions: usize) -> Vec<Event> {
    (0..count)
        .map(|i| {
            let category = Category::ALL[i % Category::ALL.len()];
            let files: Vec<String> = if i % 4 == 0 {
                Vec::new()
            } else {
                vec![format!("src/module{}.rs", i % 17)]
            };
            Event::new(
                format!("session-{}", i % sessions),
                base_time() + Duration::seconds(i as i64),
                format!("reasoning about module {} and the cache", i % 17),
            )
            .with_id(format!("event-{i}"))
            .with_files(files)
            .with_response(format!("Updated module {}.", i % 17))
            .classified(category, format!("{} choice {}", category, i))
        })
        .collect()
}
