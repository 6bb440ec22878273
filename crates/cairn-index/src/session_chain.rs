//! Events grouped per session, walked most recent session first

use crate::backend::{query_tokens, Backend, MIN_RESULTS};
use crate::error::IndexError;
use crate::ledger::Ledger;
use cairn_core::{BackendKind, Event};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One session's events, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLink {
    pub session_id: String,
    /// Earliest event timestamp in the session
    pub started_at: DateTime<Utc>,
    events: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionChain {
    ledger: Ledger,
    /// Ordered by `started_at`; ties keep first-seen order
    sessions: Vec<SessionLink>,
}

impl SessionChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> &[SessionLink] {
        &self.sessions
    }

    pub(crate) fn validate(&self) -> Result<(), IndexError> {
        self.ledger.validate()?;
        for link in &self.sessions {
            self.ledger.validate_positions(&link.session_id, &link.events)?;
            if let Some(&pos) = link
                .events
                .iter()
                .find(|&&pos| self.ledger.get(pos).session_id != link.session_id)
            {
                return Err(IndexError::Inconsistent(format!(
                    "session {} links an event of session {}",
                    link.session_id,
                    self.ledger.get(pos).session_id
                )));
            }
        }
        Ok(())
    }

    fn link(&mut self, pos: usize) {
        let event = self.ledger.get(pos);
        let (session_id, timestamp) = (event.session_id.clone(), event.timestamp);

        match self.sessions.iter_mut().find(|s| s.session_id == session_id) {
            Some(link) => {
                link.events.push(pos);
                link.started_at = link.started_at.min(timestamp);
            }
            None => self.sessions.push(SessionLink {
                session_id,
                started_at: timestamp,
                events: vec![pos],
            }),
        }
    }

    /// Event positions in walk order: newest session first, newest event first
    fn walk(&self) -> Vec<usize> {
        let mut order: Vec<&SessionLink> = self.sessions.iter().collect();
        order.sort_by(|a, b| b.started_at.cmp(&a.started_at));

        order
            .into_iter()
            .flat_map(|link| {
                let mut positions = link.events.clone();
                self.ledger.sort_recent_first(&mut positions);
                positions
            })
            .collect()
    }

    fn matches(&self, pos: usize, tokens: &[String], files_hinted: &[String]) -> bool {
        let event = self.ledger.get(pos);
        if files_hinted.iter().any(|f| event.touches(f)) {
            return true;
        }
        if tokens.is_empty() {
            return false;
        }
        let summary = event.summary.to_lowercase();
        let raw = event.raw_text.to_lowercase();
        tokens
            .iter()
            .any(|t| summary.contains(t.as_str()) || raw.contains(t.as_str()))
    }
}

impl Backend for SessionChain {
    fn kind(&self) -> BackendKind {
        BackendKind::SessionChain
    }

    fn ingest(&mut self, events: &[Event]) {
        let mut added = false;
        for event in events {
            if let Some(pos) = self.ledger.insert(event) {
                self.link(pos);
                added = true;
            }
        }
        if added {
            for link in &mut self.sessions {
                let ledger = &self.ledger;
                link.events
                    .sort_by(|a, b| ledger.get(*a).timestamp.cmp(&ledger.get(*b).timestamp));
            }
            self.sessions.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        }
    }

    fn query(&self, prompt: &str, files_hinted: &[String]) -> Vec<Event> {
        let tokens = query_tokens(prompt, 1);
        let walk = self.walk();

        let (mut included, rest): (Vec<usize>, Vec<usize>) = walk
            .into_iter()
            .partition(|&pos| self.matches(pos, &tokens, files_hinted));

        if included.len() < MIN_RESULTS {
            included.extend(rest);
        }

        self.ledger.collect(&included)
    }

    fn len(&self) -> usize {
        self.ledger.len()
    }
}
