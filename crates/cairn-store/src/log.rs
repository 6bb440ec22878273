//! Append-only event log

use crate::io::{append_jsonl, read_jsonl};
use cairn_core::Event;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Append-only JSONL log of classified events.
///
/// Index state is always rebuildable by replaying this log in order.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All logged events in append order
    pub fn read_all(&self) -> std::io::Result<Vec<Event>> {
        read_jsonl(&self.path)
    }

    /// Append events whose ids are not already logged; returns the appended events
    pub fn append_new(&self, events: &[Event]) -> std::io::Result<Vec<Event>> {
        let mut known: HashSet<String> = self.read_all()?.into_iter().map(|e| e.id).collect();

        let fresh: Vec<Event> = events
            .iter()
            .filter(|e| known.insert(e.id.clone()))
            .cloned()
            .collect();

        if !fresh.is_empty() {
            append_jsonl(&self.path, &fresh)?;
        }
        Ok(fresh)
    }

    /// Ids already present in the log
    pub fn known_ids(&self) -> std::io::Result<HashSet<String>> {
        Ok(self.read_all()?.into_iter().map(|e| e.id).collect())
    }
}
