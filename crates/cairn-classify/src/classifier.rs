//! Batch classifier with all-or-nothing external augmentation

use crate::heuristic::{classify_heuristic, first_sentence};
use crate::summarizer::{AnthropicSummarizer, PendingEvent, Summarizer, SummaryItem};
use cairn_core::{Category, Event, SummarizerConfig};
use std::collections::HashMap;

/// Assigns a category and summary to every unclassified event
pub struct Classifier {
    summarizer: Option<Box<dyn Summarizer>>,
}

impl Classifier {
    /// Heuristic-only classifier; never touches the network
    pub fn heuristic() -> Self {
        Self { summarizer: None }
    }

    pub fn with_summarizer(summarizer: Box<dyn Summarizer>) -> Self {
        Self {
            summarizer: Some(summarizer),
        }
    }

    /// External mode only when a credential is configured
    pub fn from_config(config: &SummarizerConfig) -> Self {
        match AnthropicSummarizer::from_config(config) {
            Some(summarizer) => Self::with_summarizer(Box::new(summarizer)),
            None => Self::heuristic(),
        }
    }

    pub fn uses_external(&self) -> bool {
        self.summarizer.is_some()
    }

    /// Classify pending events in one batch; already classified events pass through
    pub fn classify(&self, events: Vec<Event>) -> Vec<Event> {
        let pending: Vec<PendingEvent> = events
            .iter()
            .filter(|e| !e.is_classified())
            .map(|e| PendingEvent {
                id: e.id.clone(),
                raw_text: e.raw_text.clone(),
            })
            .collect();

        if pending.is_empty() {
            return events;
        }

        let external = self.summarizer.as_ref().and_then(|summarizer| {
            match summarizer.summarize(&pending) {
                Ok(items) => {
                    tracing::debug!(count = items.len(), "external summaries received");
                    Some(into_lookup(items))
                }
                Err(e) => {
                    tracing::warn!(error = %e, batch = pending.len(), "summarizer failed, using heuristics");
                    None
                }
            }
        });

        events
            .into_iter()
            .map(|event| {
                if event.is_classified() {
                    return event;
                }
                match external.as_ref().and_then(|lookup| lookup.get(&event.id)) {
                    Some(item) => apply_external(event, item),
                    None => {
                        let (category, summary) = classify_heuristic(&event.raw_text);
                        event.classified(category, summary)
                    }
                }
            })
            .collect()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::heuristic()
    }
}

fn into_lookup(items: Vec<SummaryItem>) -> HashMap<String, SummaryItem> {
    items.into_iter().map(|i| (i.id.clone(), i)).collect()
}

fn apply_external(event: Event, item: &SummaryItem) -> Event {
    let category = Category::from_label(&item.category);
    let mut summary = clean_summary(&item.summary);
    if summary.is_empty() {
        summary = first_sentence(&event.raw_text);
    }
    event.classified(category, summary)
}

/// Service summaries may legitimately contain periods; keep them whole
fn clean_summary(summary: &str) -> String {
    let collapsed = cairn_core::collapse_whitespace(summary);
    cairn_core::truncate_chars(&collapsed, cairn_core::SUMMARY_LIMIT)
}
