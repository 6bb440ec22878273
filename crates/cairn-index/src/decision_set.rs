//! Only committed judgements: decisions, rejections and tradeoffs

use crate::backend::{query_tokens, Backend};
use crate::error::IndexError;
use crate::ledger::Ledger;
use cairn_core::{BackendKind, Event};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionSet {
    ledger: Ledger,
}

impl DecisionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn validate(&self) -> Result<(), IndexError> {
        self.ledger.validate()?;
        match self.ledger.events().find(|e| !e.category.is_judgement()) {
            Some(event) => Err(IndexError::Inconsistent(format!(
                "decision set holds {} event {}",
                event.category, event.id
            ))),
            None => Ok(()),
        }
    }

    fn matches(event: &Event, tokens: &[String], files_hinted: &[String]) -> bool {
        if files_hinted.iter().any(|f| event.touches(f)) {
            return true;
        }
        if tokens.is_empty() {
            return false;
        }
        let haystack = format!("{}{}", event.summary, event.raw_text).to_lowercase();
        tokens.iter().any(|t| haystack.contains(t.as_str()))
    }
}

impl Backend for DecisionSet {
    fn kind(&self) -> BackendKind {
        BackendKind::DecisionSet
    }

    fn ingest(&mut self, events: &[Event]) {
        for event in events.iter().filter(|e| e.category.is_judgement()) {
            self.ledger.insert(event);
        }
    }

    /// Matching judgements newest first; with no match, every retained judgement
    fn query(&self, prompt: &str, files_hinted: &[String]) -> Vec<Event> {
        let tokens = query_tokens(prompt, 3);

        let mut hits: Vec<usize> = self
            .ledger
            .positions()
            .filter(|&pos| Self::matches(self.ledger.get(pos), &tokens, files_hinted))
            .collect();

        if hits.is_empty() {
            hits = self.ledger.positions().collect();
        }

        self.ledger.sort_recent_first(&mut hits);
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

    fn event(id: &str, secs: i64, category: Category, summary: &str) -> Event {
        Event::new("s", Utc.timestamp_opt(secs, 0).unwrap(), format!("raw {}", id))
            .with_id(id)
            .classified(category, summary)
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_only_judgements_retained() {
        let mut set = DecisionSet::new();
        set.ingest(&[
            event("d", 1, Category::Decision, "use lru"),
            event("e", 2, Category::Exploration, "look around"),
            event("r", 3, Category::Rejection, "no mutex"),
            event("w", 4, Category::Raw, "noise"),
            event("t", 5, Category::Tradeoff, "memory vs speed"),
        ]);
        assert_eq!(set.len(), 3);

        let results = set.query("", &[]);
        assert_eq!(ids(&results), vec!["t", "r", "d"]);
        assert!(results.iter().all(|e| e.category.is_judgement()));
    }

    #[test]
    fn test_token_match() {
        let mut set = DecisionSet::new();
        set.ingest(&[
            event("a", 1, Category::Decision, "use LRU cache"),
            event("b", 2, Category::Decision, "split the parser"),
        ]);
        // "to" is too short to count
        let results = set.query("switch to lru", &[]);
        assert_eq!(ids(&results), vec!["a"]);
    }

    #[test]
    fn test_file_match() {
        let mut set = DecisionSet::new();
        set.ingest(&[
            event("a", 1, Category::Decision, "x").with_files(["db.rs"]),
            event("b", 2, Category::Tradeoff, "y"),
        ]);
        let results = set.query("", &["db.rs".to_string()]);
        assert_eq!(ids(&results), vec!["a"]);
    }

    #[test]
    fn test_no_match_falls_back_to_all() {
        let mut set = DecisionSet::new();
        set.ingest(&[
            event("a", 1, Category::Decision, "x"),
            event("b", 1, Category::Rejection, "y"),
        ]);
        let results = set.query("completely unrelated words", &[]);
        assert_eq!(ids(&results), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_set_returns_nothing() {
        let set = DecisionSet::new();
        assert!(set.query("anything", &[]).is_empty());
    }
}
