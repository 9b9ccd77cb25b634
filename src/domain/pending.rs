//! Pending Change
//!
//! A speculative, unconfirmed mutation awaiting a terminal server response.
//! At most one exists per position; a newer intent supersedes, never stacks.

use serde::{Deserialize, Serialize};

use super::entry::GridSlot;
use super::position::GridPosition;

/// Kind of speculative change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Add,
    Replace,
    Remove,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Add => "add",
            ChangeKind::Replace => "replace",
            ChangeKind::Remove => "remove",
        }
    }

    /// Add and Replace project an occupant into the view
    pub fn occupies(&self) -> bool {
        matches!(self, ChangeKind::Add | ChangeKind::Replace)
    }
}

/// A speculative change for one position
///
/// `token` is a monotonic per-position counter; a response carrying a token
/// older than the position's current one is stale and must be discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingChange {
    pub kind: ChangeKind,
    pub position: GridPosition,
    /// Slot projected into the view while this change is in flight
    pub next: GridSlot,
    /// Committed slot captured when the change was issued
    pub previous: GridSlot,
    pub token: u64,
}

/// Per-position mutation state
///
/// Transitions: Idle -> Pending(kind) -> Idle, terminating in either a
/// commit or a rollback reported through the mutation's own future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationPhase {
    Idle,
    Pending(ChangeKind),
}

/// Terminal outcome of an optimistic mutation
///
/// A rollback is reported as the error that caused it, not as an outcome.
/// `Superseded` means a newer intent on the same position/list took over
/// and this mutation's response was discarded under the token rule.
/// `Noop` marks inputs that by contract must not touch any state, such as
/// a drop-on-self with zero displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationOutcome {
    Committed,
    Superseded,
    Noop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_kind_projection() {
        assert!(ChangeKind::Add.occupies());
        assert!(ChangeKind::Replace.occupies());
        assert!(!ChangeKind::Remove.occupies());
    }

    #[test]
    fn test_change_kind_labels() {
        assert_eq!(ChangeKind::Replace.as_str(), "replace");
    }
}
