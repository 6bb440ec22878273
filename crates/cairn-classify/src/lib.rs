//! Event classification: heuristic patterns with an optional external summarizer

mod classifier;
mod heuristic;
pub mod summarizer;

pub use classifier::Classifier;
pub use heuristic::{classify_heuristic, first_sentence, EMPTY_SUMMARY};
pub use summarizer::{AnthropicSummarizer, PendingEvent, SummarizeError, Summarizer, SummaryItem};
