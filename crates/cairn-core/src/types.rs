//! Normalized reasoning event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum characters kept in an event summary
pub const SUMMARY_LIMIT: usize = 120;

/// Maximum characters kept in a tool call input summary
pub const INPUT_SUMMARY_LIMIT: usize = 200;

/// Semantic category of a reasoning event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Decision,
    Rejection,
    Tradeoff,
    Exploration,
    /// Unclassified or unknown
    #[default]
    Raw,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Decision,
        Category::Rejection,
        Category::Tradeoff,
        Category::Exploration,
        Category::Raw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Decision => "decision",
            Category::Rejection => "rejection",
            Category::Tradeoff => "tradeoff",
            Category::Exploration => "exploration",
            Category::Raw => "raw",
        }
    }

    /// Parse a category label, coercing anything outside the closed set to `Raw`
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == label)
            .unwrap_or(Category::Raw)
    }

    /// Decision, rejection and tradeoff events carry a committed judgement
    pub fn is_judgement(&self) -> bool {
        matches!(
            self,
            Category::Decision | Category::Rejection | Category::Tradeoff
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded outcome of a tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Success,
    Error,
    Reverted,
}

/// Descriptive record of a tool invocation made during a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    #[serde(default)]
    pub input_summary: String,
    #[serde(default)]
    pub outcome: Outcome,
}

/// One reasoning moment extracted from a single agent turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub summary: String,
    pub raw_text: String,
    #[serde(default)]
    pub response_text: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default)]
    pub files_affected: Vec<String>,
    #[serde(default)]
    pub prompt_context: String,
}

impl Event {
    /// Create an unclassified event with a fresh id
    pub fn new(
        session_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            timestamp,
            category: Category::Raw,
            summary: String::new(),
            raw_text: raw_text.into(),
            response_text: String::new(),
            tool_calls: Vec::new(),
            files_affected: Vec::new(),
            prompt_context: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files_affected = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_response(mut self, response_text: impl Into<String>) -> Self {
        self.response_text = response_text.into();
        self
    }

    pub fn with_prompt(mut self, prompt_context: impl Into<String>) -> Self {
        self.prompt_context = prompt_context.into();
        self
    }

    /// Classified copy of this event; identity and raw text are untouched
    pub fn classified(mut self, category: Category, summary: impl Into<String>) -> Self {
        self.category = category;
        self.summary = summary.into();
        self
    }

    pub fn is_classified(&self) -> bool {
        !self.summary.is_empty()
    }

    /// Events with no affected files belong to the unattributed bucket
    pub fn is_unattributed(&self) -> bool {
        self.files_affected.is_empty()
    }

    pub fn touches(&self, path: &str) -> bool {
        self.files_affected.iter().any(|f| f == path)
    }
}
