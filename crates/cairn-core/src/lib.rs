//! Event model, transcript extraction and configuration for reasoning capture

mod config;
mod error;
mod extract;
mod text;
mod types;

pub use config::{BackendKind, Config, SummarizerConfig, DEFAULT_BUDGET};
pub use error::ConfigError;
pub use extract::{extract_events, Extraction};
pub use text::{collapse_whitespace, truncate_chars};
pub use types::{Category, Event, Outcome, ToolCall, INPUT_SUMMARY_LIMIT, SUMMARY_LIMIT};
