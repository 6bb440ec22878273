//! Common backend contract

use cairn_core::{BackendKind, Event};

/// Fallback threshold shared by the backends.
///
/// Below this many direct matches a backend widens its search.
pub const MIN_RESULTS: usize = 3;

/// An index organization over ingested events
pub trait Backend {
    fn kind(&self) -> BackendKind;

    /// Add events; an id already present is a no-op
    fn ingest(&mut self, events: &[Event]);

    /// Relevant events for a prompt and a set of hinted files
    fn query(&self, prompt: &str, files_hinted: &[String]) -> Vec<Event>;

    /// Number of retained events
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lowercase whitespace-delimited tokens of at least `min_len` characters
pub fn query_tokens(prompt: &str, min_len: usize) -> Vec<String> {
    prompt
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .filter(|t| t.chars().count() >= min_len)
        .collect()
}
