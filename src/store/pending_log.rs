//! Pending Change Log
//!
//! Holds at most one speculative change per position, plus the monotonic
//! token counters used to detect stale responses. Counters outlive the
//! changes they numbered: a token is only ever current while its change
//! is still the latest intent for that position.

use std::collections::HashMap;

use crate::domain::{GridPosition, MutationPhase, PendingChange};

#[derive(Debug, Clone, Default)]
pub struct PendingChangeLog {
    changes: HashMap<GridPosition, PendingChange>,
    tokens: HashMap<GridPosition, u64>,
}

impl PendingChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next token for a position
    pub fn next_token(&mut self, position: GridPosition) -> u64 {
        let counter = self.tokens.entry(position).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Record a change, superseding any change already pending there
    pub fn record(&mut self, change: PendingChange) {
        self.changes.insert(change.position, change);
    }

    pub fn get(&self, position: GridPosition) -> Option<&PendingChange> {
        self.changes.get(&position)
    }

    pub fn is_pending(&self, position: GridPosition) -> bool {
        self.changes.contains_key(&position)
    }

    /// True while `token` still identifies the latest intent for `position`
    pub fn is_current(&self, position: GridPosition, token: u64) -> bool {
        self.changes
            .get(&position)
            .map(|change| change.token == token)
            .unwrap_or(false)
    }

    /// Remove and return the pending change, but only if `token` is still
    /// current. Stale callers get `None` and must discard their response.
    pub fn take_if_current(&mut self, position: GridPosition, token: u64) -> Option<PendingChange> {
        if self.is_current(position, token) {
            self.changes.remove(&position)
        } else {
            None
        }
    }

    pub fn phase(&self, position: GridPosition) -> MutationPhase {
        match self.changes.get(&position) {
            Some(change) => MutationPhase::Pending(change.kind),
            None => MutationPhase::Idle,
        }
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChangeKind, GridSlot};

    fn change(position: GridPosition, kind: ChangeKind, token: u64) -> PendingChange {
        PendingChange {
            kind,
            position,
            next: GridSlot::Empty,
            previous: GridSlot::Empty,
            token,
        }
    }

    #[test]
    fn test_tokens_are_monotonic_per_position() {
        let mut log = PendingChangeLog::new();
        let a = GridPosition::new(1, 1, 1);
        let b = GridPosition::new(1, 1, 2);
        assert_eq!(log.next_token(a), 1);
        assert_eq!(log.next_token(a), 2);
        assert_eq!(log.next_token(b), 1);
    }

    #[test]
    fn test_newer_intent_supersedes() {
        let mut log = PendingChangeLog::new();
        let pos = GridPosition::new(1, 1, 1);
        let first = log.next_token(pos);
        log.record(change(pos, ChangeKind::Add, first));
        let second = log.next_token(pos);
        log.record(change(pos, ChangeKind::Remove, second));

        assert_eq!(log.len(), 1);
        assert!(!log.is_current(pos, first));
        assert!(log.is_current(pos, second));
        assert_eq!(log.phase(pos), MutationPhase::Pending(ChangeKind::Remove));
    }

    #[test]
    fn test_stale_take_is_rejected() {
        let mut log = PendingChangeLog::new();
        let pos = GridPosition::new(1, 1, 1);
        let first = log.next_token(pos);
        log.record(change(pos, ChangeKind::Add, first));
        let second = log.next_token(pos);
        log.record(change(pos, ChangeKind::Replace, second));

        assert!(log.take_if_current(pos, first).is_none());
        assert!(log.take_if_current(pos, second).is_some());
        assert_eq!(log.phase(pos), MutationPhase::Idle);
        // counters survive the change they numbered
        assert_eq!(log.next_token(pos), 3);
    }
}
