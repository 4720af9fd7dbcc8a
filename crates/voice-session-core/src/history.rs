//! Bounded transition history for diagnostics

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::reconcile::AppliedTransition;
use crate::state_table::Action;
use crate::types::{CallState, Vsid};

/// Result of a recorded transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionResult {
    Ok,
    Failed(String),
}

/// One recorded transition attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Monotonic sequence number, never reused
    pub sequence: u64,
    pub vsid: Vsid,
    pub from: CallState,
    pub to: CallState,
    pub action: Action,
    pub result: TransitionResult,
}

/// Ring buffer of the most recent transitions
#[derive(Debug, Clone)]
pub struct TransitionHistory {
    capacity: usize,
    records: VecDeque<TransitionRecord>,
    next_sequence: u64,
}

impl TransitionHistory {
    /// Capacity 0 disables recording
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    pub fn record(&mut self, applied: &AppliedTransition) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(TransitionRecord {
            sequence,
            vsid: applied.vsid,
            from: applied.from,
            to: applied.to,
            action: applied.action,
            result: match &applied.error {
                Some(err) => TransitionResult::Failed(err.to_string()),
                None => TransitionResult::Ok,
            },
        });
    }

    pub fn record_all<'a>(&mut self, applied: impl IntoIterator<Item = &'a AppliedTransition>) {
        for transition in applied {
            self.record(transition);
        }
    }

    /// Records from oldest to newest
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total transitions seen, including evicted ones
    pub fn total_transitions(&self) -> u64 {
        self.next_sequence
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
