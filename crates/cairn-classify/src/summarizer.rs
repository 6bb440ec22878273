//! External batch summarization

use cairn_core::{truncate_chars, SummarizerConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

const MAX_INPUT_CHARS: usize = 2000;
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// An event awaiting classification, as sent to the service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingEvent {
    pub id: String,
    pub raw_text: String,
}

/// One entry of the service response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummaryItem {
    pub id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub summary: String,
}

/// Failure of a batch summarization call; always recovered by the caller
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("no credential configured")]
    MissingCredential,

    #[error("request failed: {0}")]
    Http(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response is missing {missing} of the pending events")]
    IdMismatch { missing: usize },

    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl From<reqwest::Error> for SummarizeError {
    fn from(err: reqwest::Error) -> Self {
        SummarizeError::Http(err.to_string())
    }
}

/// A service that labels a whole batch of events in one call
pub trait Summarizer {
    fn summarize(&self, pending: &[PendingEvent]) -> Result<Vec<SummaryItem>, SummarizeError>;
}

pub fn build_summary_prompt(pending: &[PendingEvent]) -> String {
    let items: Vec<serde_json::Value> = pending
        .iter()
        .map(|p| {
            serde_json::json!({
                "id": p.id,
                "text": truncate_chars(&p.raw_text, MAX_INPUT_CHARS),
            })
        })
        .collect();

    format!(
        "Classify each reasoning excerpt from a coding agent. \
         Return ONLY a JSON array with one object per excerpt: \
         {{\"id\": \"<id>\", \"category\": \"decision|rejection|tradeoff|exploration|raw\", \
         \"summary\": \"<one sentence, at most 120 characters>\"}}\n\n{}",
        serde_json::Value::Array(items)
    )
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let body = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => return trimmed,
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Parse a response text; it must be an array covering every pending id
pub fn parse_summary_response(
    text: &str,
    pending: &[PendingEvent],
) -> Result<Vec<SummaryItem>, SummarizeError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| SummarizeError::Malformed(e.to_string()))?;

    if !value.is_array() {
        return Err(SummarizeError::Malformed("expected a JSON array".to_string()));
    }

    let items: Vec<SummaryItem> =
        serde_json::from_value(value).map_err(|e| SummarizeError::Malformed(e.to_string()))?;

    let returned: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
    let missing = pending
        .iter()
        .filter(|p| !returned.contains(p.id.as_str()))
        .count();
    if missing > 0 {
        return Err(SummarizeError::IdMismatch { missing });
    }

    Ok(items)
}

/// Summarizer backed by the Anthropic messages API
#[derive(Debug, Clone)]
pub struct AnthropicSummarizer {
    api_key: String,
    config: SummarizerConfig,
}

impl AnthropicSummarizer {
    pub fn new(api_key: impl Into<String>, config: SummarizerConfig) -> Self {
        Self {
            api_key: api_key.into(),
            config,
        }
    }

    /// Build from config; `None` when no credential is present
    pub fn from_config(config: &SummarizerConfig) -> Option<Self> {
        config
            .api_key()
            .map(|key| Self::new(key, config.clone()))
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs.max(1))
    }

    async fn request(&self, pending: &[PendingEvent]) -> Result<Vec<SummaryItem>, SummarizeError> {
        let client = reqwest::Client::builder().timeout(self.timeout()).build()?;
        let prompt = build_summary_prompt(pending);

        let response = client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": self.config.model,
                "max_tokens": self.config.max_tokens,
                "messages": [{"role": "user", "content": prompt}]
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummarizeError::Http(format!("status {}", status)));
        }

        let body: serde_json::Value = response.json().await?;
        let text = body["content"][0]["text"]
            .as_str()
            .ok_or_else(|| SummarizeError::Malformed("no text content in response".to_string()))?;

        parse_summary_response(text, pending)
    }
}

impl Summarizer for AnthropicSummarizer {
    fn summarize(&self, pending: &[PendingEvent]) -> Result<Vec<SummaryItem>, SummarizeError> {
        if self.api_key.is_empty() {
            return Err(SummarizeError::MissingCredential);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let limit = self.timeout();
        runtime.block_on(async {
            match tokio::time::timeout(limit, self.request(pending)).await {
                Ok(result) => result,
                Err(_) => Err(SummarizeError::Timeout(limit)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(ids: &[&str]) -> Vec<PendingEvent> {
        ids.iter()
            .map(|id| PendingEvent {
                id: id.to_string(),
                raw_text: format!("text for {}", id),
            })
            .collect()
    }

    #[test]
    fn test_prompt_contains_ids_and_text() {
        let prompt = build_summary_prompt(&pending(&["e1", "e2"]));
        assert!(prompt.contains("\"e1\""));
        assert!(prompt.contains("text for e2"));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn test_parse_valid_response() {
        let text = r#"[{"id":"e1","category":"decision","summary":"Use LRU"}]"#;
        let items = parse_summary_response(text, &pending(&["e1"])).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, "decision");
        assert_eq!(items[0].summary, "Use LRU");
    }

    #[test]
    fn test_parse_fenced_response() {
        let text = "```json\n[{\"id\":\"e1\",\"category\":\"raw\",\"summary\":\"x\"}]\n```";
        assert!(parse_summary_response(text, &pending(&["e1"])).is_ok());
    }

    #[test]
    fn test_parse_non_array_rejected() {
        let text = r#"{"id":"e1","category":"decision","summary":"x"}"#;
        let err = parse_summary_response(text, &pending(&["e1"])).unwrap_err();
        assert!(matches!(err, SummarizeError::Malformed(_)));
    }

    #[test]
    fn test_parse_garbage_rejected() {
        let err = parse_summary_response("Sure! Here you go", &pending(&["e1"])).unwrap_err();
        assert!(matches!(err, SummarizeError::Malformed(_)));
    }

    #[test]
    fn test_parse_missing_id_rejected() {
        let text = r#"[{"id":"e1","category":"decision","summary":"x"}]"#;
        let err = parse_summary_response(text, &pending(&["e1", "e2"])).unwrap_err();
        assert!(matches!(err, SummarizeError::IdMismatch { missing: 1 }));
    }

    #[test]
    fn test_unreachable_endpoint_fails_without_panicking() {
        let mut config = SummarizerConfig::new();
        config.endpoint = "http://127.0.0.1:9/v1/messages".to_string();
        config.timeout_secs = 2;
        let summarizer = AnthropicSummarizer::new("test-key", config);
        assert!(summarizer.summarize(&pending(&["e1"])).is_err());
    }
}
