//! Reconciliation Resolver
//!
//! Merges committed and pending state into one renderable view. Pending
//! always shadows committed: a slot with an in-flight change renders its
//! projection, whatever the grid says underneath.

use serde::{Deserialize, Serialize};

use crate::domain::{ChangeKind, GridPosition, GridSlot, PageLayout};
use crate::store::{PendingChangeLog, PositionGrid};

/// What one slot renders as, after reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderDescriptor {
    pub position: GridPosition,
    pub slot: GridSlot,
    /// Set while a speculative change shadows this slot
    pub pending: Option<ChangeKind>,
}

impl RenderDescriptor {
    pub fn is_speculative(&self) -> bool {
        self.pending.is_some()
    }
}

/// Pure merge of committed + pending state
///
/// Pointwise O(1); resolving a full page is O(slots per page). Idempotent
/// absent intervening mutation.
pub struct ReconciliationResolver;

impl ReconciliationResolver {
    pub fn resolve(
        grid: &PositionGrid,
        pending: &PendingChangeLog,
        position: GridPosition,
    ) -> RenderDescriptor {
        match pending.get(position) {
            Some(change) => RenderDescriptor {
                position,
                slot: change.next.clone(),
                pending: Some(change.kind),
            },
            None => RenderDescriptor {
                position,
                slot: grid.slot(position),
                pending: None,
            },
        }
    }

    /// Resolve every slot of one page, row-major
    pub fn resolve_page(
        grid: &PositionGrid,
        pending: &PendingChangeLog,
        layout: PageLayout,
        page: u32,
    ) -> Vec<RenderDescriptor> {
        layout
            .page_positions(page)
            .into_iter()
            .map(|position| Self::resolve(grid, pending, position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CollectionEntry, PendingChange};

    #[test]
    fn test_pending_shadows_committed() {
        let mut grid = PositionGrid::new();
        let mut log = PendingChangeLog::new();
        let pos = GridPosition::new(1, 1, 1);
        grid.set(pos, GridSlot::Entry(CollectionEntry::new(1, "old")));

        let token = log.next_token(pos);
        log.record(PendingChange {
            kind: ChangeKind::Remove,
            position: pos,
            next: GridSlot::Empty,
            previous: grid.slot(pos),
            token,
        });

        let view = ReconciliationResolver::resolve(&grid, &log, pos);
        assert!(view.slot.is_empty());
        assert_eq!(view.pending, Some(ChangeKind::Remove));
    }

    #[test]
    fn test_resolve_falls_back_to_committed() {
        let mut grid = PositionGrid::new();
        let log = PendingChangeLog::new();
        let pos = GridPosition::new(1, 2, 2);
        grid.set(pos, GridSlot::Backplaceholder);

        let view = ReconciliationResolver::resolve(&grid, &log, pos);
        assert!(view.slot.is_backplaceholder());
        assert!(!view.is_speculative());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let grid = PositionGrid::new();
        let log = PendingChangeLog::new();
        let pos = GridPosition::new(1, 1, 2);
        let first = ReconciliationResolver::resolve(&grid, &log, pos);
        let second = ReconciliationResolver::resolve(&grid, &log, pos);
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_page_covers_layout() {
        let grid = PositionGrid::new();
        let log = PendingChangeLog::new();
        let layout = PageLayout::new(2, 3);
        let views = ReconciliationResolver::resolve_page(&grid, &log, layout, 1);
        assert_eq!(views.len(), 6);
        assert!(views.iter().all(|view| view.slot.is_empty()));
    }
}
