//! The active index: one of the backends behind a tagged state format

use crate::backend::Backend;
use crate::decision_set::DecisionSet;
use crate::error::IndexError;
use crate::file_index::FileIndex;
use crate::session_chain::SessionChain;
use cairn_core::{BackendKind, Event};
use serde::{Deserialize, Serialize};

/// Serialized form carries a `backend` discriminator naming the producer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum EventIndex {
    FileIndex(FileIndex),
    SessionChain(SessionChain),
    DecisionSet(DecisionSet),
}

impl EventIndex {
    pub fn new(kind: BackendKind) -> Self {
        match kind {
            BackendKind::FileIndex => EventIndex::FileIndex(FileIndex::new()),
            BackendKind::SessionChain => EventIndex::SessionChain(SessionChain::new()),
            BackendKind::DecisionSet => EventIndex::DecisionSet(DecisionSet::new()),
        }
    }

    /// Replay an event log, in order, into a fresh index
    pub fn rebuild(kind: BackendKind, events: &[Event]) -> Self {
        let mut index = Self::new(kind);
        index.ingest(events);
        tracing::debug!(backend = %kind, replayed = events.len(), indexed = index.len(), "rebuilt index");
        index
    }

    fn backend(&self) -> &dyn Backend {
        match self {
            EventIndex::FileIndex(b) => b,
            EventIndex::SessionChain(b) => b,
            EventIndex::DecisionSet(b) => b,
        }
    }

    fn backend_mut(&mut self) -> &mut dyn Backend {
        match self {
            EventIndex::FileIndex(b) => b,
            EventIndex::SessionChain(b) => b,
            EventIndex::DecisionSet(b) => b,
        }
    }

    pub fn serialize_state(&self) -> Result<String, IndexError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a state produced by any backend; positions and ids must agree
    pub fn from_state(state: &str) -> Result<Self, IndexError> {
        let index: Self = serde_json::from_str(state)?;
        index.validate()?;
        Ok(index)
    }

    /// Parse a state and require that `kind` produced it
    pub fn restore(kind: BackendKind, state: &str) -> Result<Self, IndexError> {
        let index = Self::from_state(state)?;
        index.ensure_kind(kind)?;
        Ok(index)
    }

    /// Check the internal consistency of a deserialized index
    pub fn validate(&self) -> Result<(), IndexError> {
        match self {
            EventIndex::FileIndex(b) => b.validate(),
            EventIndex::SessionChain(b) => b.validate(),
            EventIndex::DecisionSet(b) => b.validate(),
        }
    }

    pub fn ensure_kind(&self, kind: BackendKind) -> Result<(), IndexError> {
        if self.kind() != kind {
            return Err(IndexError::BackendMismatch {
                expected: kind,
                found: self.kind(),
            });
        }
        Ok(())
    }

    /// Replace this index with a serialized state.
    ///
    /// Malformed or inconsistent state leaves an empty index of the current backend.
    pub fn deserialize_state(&mut self, state: &str) {
        match Self::from_state(state) {
            Ok(index) => *self = index,
            Err(e) => {
                tracing::warn!(error = %e, backend = %self.kind(), "discarding malformed index state");
                *self = Self::new(self.kind());
            }
        }
    }
}

impl Backend for EventIndex {
    fn kind(&self) -> BackendKind {
        self.backend().kind()
    }

    fn ingest(&mut self, events: &[Event]) {
        self.backend_mut().ingest(events)
    }

    fn query(&self, prompt: &str, files_hinted: &[String]) -> Vec<Event> {
        self.backend().query(prompt, files_hinted)
    }

    fn len(&self) -> usize {
        self.backend().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::Category;
    use chrono::Utc;

    fn sample() -> Vec<Event> {
        vec![
            Event::new("s1", Utc::now(), "I'll use a queue.")
                .with_id("a")
                .with_files(["q.rs"])
                .classified(Category::Decision, "use a queue"),
            Event::new("s1", Utc::now(), "Let me look.")
                .with_id("b")
                .classified(Category::Exploration, "look"),
        ]
    }

    #[test]
    fn test_state_carries_discriminator() {
        for kind in BackendKind::ALL {
            let state = EventIndex::rebuild(kind, &sample()).serialize_state().unwrap();
            let value: serde_json::Value = serde_json::from_str(&state).unwrap();
            assert_eq!(value["backend"], kind.as_str());
        }
    }

    #[test]
    fn test_restore_roundtrip() {
        let index = EventIndex::rebuild(BackendKind::SessionChain, &sample());
        let state = index.serialize_state().unwrap();
        let restored = EventIndex::restore(BackendKind::SessionChain, &state).unwrap();
        assert_eq!(restored, index);
    }

    #[test]
    fn test_restore_rejects_other_backend() {
        let state = EventIndex::rebuild(BackendKind::DecisionSet, &sample())
            .serialize_state()
            .unwrap();
        let err = EventIndex::restore(BackendKind::FileIndex, &state).unwrap_err();
        assert!(matches!(
            err,
            IndexError::BackendMismatch {
                expected: BackendKind::FileIndex,
                found: BackendKind::DecisionSet
            }
        ));
    }

    #[test]
    fn test_deserialize_malformed_resets() {
        let mut index = EventIndex::rebuild(BackendKind::FileIndex, &sample());
        index.deserialize_state("{\"backend\": \"file_index\", \"ledger\": 7}");
        assert_eq!(index.kind(), BackendKind::FileIndex);
        assert!(index.is_empty());

        let mut index = EventIndex::rebuild(BackendKind::DecisionSet, &sample());
        index.deserialize_state("not json at all");
        assert_eq!(index.kind(), BackendKind::DecisionSet);
        assert!(index.is_empty());
    }

    #[test]
    fn test_from_state_rejects_inconsistent_positions() {
        let state = r#"{"backend":"session_chain","ledger":{"events":[],"ids":{}},"sessions":[{"session_id":"s","started_at":"2025-01-01T00:00:00Z","events":[0]}]}"#;
        assert!(matches!(
            EventIndex::from_state(state),
            Err(IndexError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_decision_set_drops_exploration() {
        let index = EventIndex::rebuild(BackendKind::DecisionSet, &sample());
        assert_eq!(index.len(), 1);
    }
}
