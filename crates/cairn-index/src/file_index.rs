//! Events filed under each affected path

use crate::backend::{query_tokens, Backend, MIN_RESULTS};
use crate::error::IndexError;
use crate::ledger::Ledger;
use cairn_core::{BackendKind, Event};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved key for events that name no affected files
pub const UNATTRIBUTED: &str = "(unattributed)";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileIndex {
    ledger: Ledger,
    /// Path (or the unattributed key) -> event positions in ingestion order
    by_file: BTreeMap<String, Vec<usize>>,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths with at least one filed event, excluding the unattributed bucket
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.by_file
            .keys()
            .map(String::as_str)
            .filter(|k| *k != UNATTRIBUTED)
    }

    pub(crate) fn validate(&self) -> Result<(), IndexError> {
        self.ledger.validate()?;
        for (path, bucket) in &self.by_file {
            self.ledger.validate_positions(path, bucket)?;
        }
        Ok(())
    }

    fn file_under(&mut self, key: &str, pos: usize) {
        let bucket = self.by_file.entry(key.to_string()).or_default();
        if bucket.last() != Some(&pos) {
            bucket.push(pos);
        }
    }

    fn unattributed_keyword_hits(&self, prompt: &str, hits: &mut Vec<usize>) {
        let keywords = query_tokens(prompt, 3);
        if keywords.is_empty() {
            return;
        }
        let Some(bucket) = self.by_file.get(UNATTRIBUTED) else {
            return;
        };

        for &pos in bucket {
            let event = self.ledger.get(pos);
            let haystack = format!(
                "{} {} {}",
                event.summary, event.raw_text, event.prompt_context
            )
            .to_lowercase();
            if keywords.iter().any(|k| haystack.contains(k.as_str())) {
                hits.push(pos);
            }
        }
    }
}

impl Backend for FileIndex {
    fn kind(&self) -> BackendKind {
        BackendKind::FileIndex
    }

    fn ingest(&mut self, events: &[Event]) {
        for event in events {
            let Some(pos) = self.ledger.insert(event) else {
                continue;
            };
            if event.is_unattributed() {
                self.file_under(UNATTRIBUTED, pos);
            } else {
                for path in &event.files_affected {
                    self.file_under(path, pos);
                }
            }
        }
    }

    fn query(&self, prompt: &str, files_hinted: &[String]) -> Vec<Event> {
        let mut hits: Vec<usize> = files_hinted
            .iter()
            .filter(|f| f.as_str() != UNATTRIBUTED)
            .filter_map(|f| self.by_file.get(f))
            .flatten()
            .copied()
            .collect();
        self.ledger.sort_recent_first(&mut hits);

        if hits.len() < MIN_RESULTS {
            let query = prompt.to_lowercase();
            if !query.trim().is_empty() {
                for path in self.paths() {
                    if query.contains(&path.to_lowercase()) {
                        hits.extend(self.by_file[path].iter().copied());
                    }
                }
            }
            self.unattributed_keyword_hits(prompt, &mut hits);
            self.ledger.sort_recent_first(&mut hits);
        }

        self.ledger.collect(&hits)
    }

    fn len(&self) -> usize {
        self.ledger.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::Category;
    use chrono::{TimeZone, Utc};

    fn event(id: &str, secs: i64, files: &[&str]) -> Event {
        Event::new("s1", Utc.timestamp_opt(secs, 0).unwrap(), format!("raw {}", id))
            .with_id(id)
            .with_files(files.iter().copied())
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_hinted_file_returns_only_its_events() {
        let mut index = FileIndex::new();
        index.ingest(&[
            event("a", 1, &["a.ts"]).classified(Category::Decision, "use a"),
            event("b", 2, &[]).classified(Category::Raw, "something"),
            event("c", 3, &["b.ts"]).classified(Category::Tradeoff, "b costs"),
        ]);

        let results = index.query("", &["a.ts".to_string()]);
        assert_eq!(ids(&results), vec!["a"]);
    }

    #[test]
    fn test_multi_file_event_deduplicated() {
        let mut index = FileIndex::new();
        index.ingest(&[event("a", 1, &["x.rs", "y.rs"])]);
        let results = index.query("", &["x.rs".to_string(), "y.rs".to_string()]);
        assert_eq!(ids(&results), vec!["a"]);
    }

    #[test]
    fn test_path_mentioned_in_prompt() {
        let mut index = FileIndex::new();
        index.ingest(&[
            event("a", 1, &["src/Router.rs"]),
            event("b", 2, &["src/config.rs"]),
        ]);
        let results = index.query("why does src/router.rs retry twice", &[]);
        assert_eq!(ids(&results), vec!["a"]);
    }

    #[test]
    fn test_unattributed_keyword_overlap() {
        let mut index = FileIndex::new();
        index.ingest(&[
            event("a", 1, &[]).with_prompt("speed up the cache"),
            event("b", 2, &[]),
            event("c", 3, &["lib.rs"]),
        ]);
        let results = index.query("cache eviction", &[]);
        assert_eq!(ids(&results), vec!["a"]);

        // Short tokens are ignored
        assert!(index.query("up", &[]).is_empty());
    }

    #[test]
    fn test_fallback_skipped_with_enough_hinted_hits() {
        let mut index = FileIndex::new();
        index.ingest(&[
            event("a", 1, &["m.rs"]),
            event("b", 2, &["m.rs"]),
            event("c", 3, &["m.rs"]),
            event("d", 4, &["other.rs"]),
        ]);
        let results = index.query("look at other.rs", &["m.rs".to_string()]);
        assert_eq!(ids(&results), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sorted_newest_first_with_stable_ties() {
        let mut index = FileIndex::new();
        index.ingest(&[
            event("old", 1, &["f"]),
            event("tie1", 5, &["f"]),
            event("tie2", 5, &["f"]),
        ]);
        let results = index.query("", &["f".to_string()]);
        assert_eq!(ids(&results), vec!["tie1", "tie2", "old"]);
    }

    #[test]
    fn test_ingest_idempotent() {
        let batch = vec![event("a", 1, &["f"]), event("b", 2, &[])];
        let mut once = FileIndex::new();
        once.ingest(&batch);
        let mut twice = once.clone();
        twice.ingest(&batch);
        assert_eq!(once, twice);
        assert_eq!(twice.len(), 2);
    }

    #[test]
    fn test_unattributed_key_not_queryable_as_file() {
        let mut index = FileIndex::new();
        index.ingest(&[event("a", 1, &[])]);
        assert!(index.query("", &[UNATTRIBUTED.to_string()]).is_empty());
        assert_eq!(index.paths().count(), 0);
    }
}
