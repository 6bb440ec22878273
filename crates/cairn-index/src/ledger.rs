//! Ingestion-ordered event storage with id deduplication

use crate::error::IndexError;
use cairn_core::Event;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Ledger {
    /// Events in ingestion order; positions are stable
    events: Vec<Event>,
    /// Event id -> position
    ids: BTreeMap<String, usize>,
}

impl Ledger {
    /// Store a copy of the event; `None` if the id is already present
    pub fn insert(&mut self, event: &Event) -> Option<usize> {
        if self.ids.contains_key(&event.id) {
            return None;
        }
        let pos = self.events.len();
        self.ids.insert(event.id.clone(), pos);
        self.events.push(event.clone());
        Some(pos)
    }

    pub fn get(&self, pos: usize) -> &Event {
        &self.events[pos]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn positions(&self) -> std::ops::Range<usize> {
        0..self.events.len()
    }

    /// Sort positions newest first; equal timestamps keep ingestion order
    pub fn sort_recent_first(&self, positions: &mut Vec<usize>) {
        positions.sort_unstable();
        positions.dedup();
        positions.sort_by(|a, b| self.events[*b].timestamp.cmp(&self.events[*a].timestamp));
    }

    pub fn collect(&self, positions: &[usize]) -> Vec<Event> {
        positions.iter().map(|&p| self.events[p].clone()).collect()
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Every event's id must map back to its own position
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.ids.len() != self.events.len() {
            return Err(IndexError::Inconsistent(format!(
                "{} ids for {} events",
                self.ids.len(),
                self.events.len()
            )));
        }
        for (pos, event) in self.events.iter().enumerate() {
            if self.ids.get(&event.id) != Some(&pos) {
                return Err(IndexError::Inconsistent(format!(
                    "id {} is not mapped to position {}",
                    event.id, pos
                )));
            }
        }
        Ok(())
    }

    /// Positions held by `owner` must all refer to stored events
    pub fn validate_positions(&self, owner: &str, positions: &[usize]) -> Result<(), IndexError> {
        match positions.iter().find(|&&p| p >= self.events.len()) {
            Some(p) => Err(IndexError::Inconsistent(format!(
                "{} refers to position {} of {} events",
                owner,
                p,
                self.events.len()
            ))),
            None => Ok(()),
        }
    }
}
