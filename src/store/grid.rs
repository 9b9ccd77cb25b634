//! Position Grid
//!
//! Committed album state keyed by (page, row, column). Only terminal
//! server responses write here; speculative edits live in the
//! PendingChangeLog until they commit.

use std::collections::HashMap;

use crate::domain::{GridPosition, GridSlot};

/// Committed slot contents of the album
#[derive(Debug, Clone, Default)]
pub struct PositionGrid {
    slots: HashMap<GridPosition, GridSlot>,
}

impl PositionGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed slot at a position; absent positions are empty
    pub fn slot(&self, position: GridPosition) -> GridSlot {
        self.slots.get(&position).cloned().unwrap_or_default()
    }

    pub fn set(&mut self, position: GridPosition, slot: GridSlot) {
        if slot.is_empty() {
            self.slots.remove(&position);
        } else {
            self.slots.insert(position, slot);
        }
    }

    pub fn clear(&mut self, position: GridPosition) {
        self.slots.remove(&position);
    }

    /// Number of occupied (non-empty) slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CollectionEntry;

    #[test]
    fn test_absent_positions_are_empty() {
        let grid = PositionGrid::new();
        assert!(grid.slot(GridPosition::new(1, 1, 1)).is_empty());
    }

    #[test]
    fn test_set_and_clear() {
        let mut grid = PositionGrid::new();
        let pos = GridPosition::new(1, 2, 3);
        grid.set(pos, GridSlot::Entry(CollectionEntry::new(1, "item-1")));
        assert_eq!(grid.slot(pos).entry().unwrap().id, 1);
        assert_eq!(grid.len(), 1);

        grid.clear(pos);
        assert!(grid.slot(pos).is_empty());
        assert!(grid.is_empty());
    }

    #[test]
    fn test_setting_empty_removes_the_slot() {
        let mut grid = PositionGrid::new();
        let pos = GridPosition::new(2, 1, 1);
        grid.set(pos, GridSlot::Backplaceholder);
        grid.set(pos, GridSlot::Empty);
        assert!(grid.is_empty());
    }
}
