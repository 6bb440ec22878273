//! Greedy prefix selection under a cost budget

use crate::cost::estimate_cost;
use cairn_core::{Event, DEFAULT_BUDGET};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retriever {
    budget: usize,
}

impl Retriever {
    pub fn new(budget: usize) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Longest prefix of `events` whose cumulative cost stays within budget.
    ///
    /// Selection stops at the first event that does not fit; later, smaller
    /// events are never pulled forward.
    pub fn select<'a>(&self, events: &'a [Event]) -> &'a [Event] {
        let mut used = 0;
        let mut end = 0;
        for event in events {
            let cost = estimate_cost(event);
            if used + cost > self.budget {
                break;
            }
            used += cost;
            end += 1;
        }

        if end < events.len() {
            tracing::debug!(
                selected = end,
                dropped = events.len() - end,
                used,
                budget = self.budget,
                "retrieval budget reached"
            );
        }
        &events[..end]
    }
}

impl Default for Retriever {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET)
    }
}
