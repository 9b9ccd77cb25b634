//! Grid Position
//!
//! Addresses a single slot in the album: (page, row, column), all 1-indexed.
//! Page 0 is the cover and never accepts edits.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};

/// Address of a slot in the album grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub page: u32,
    pub row: u32,
    pub column: u32,
}

impl GridPosition {
    pub fn new(page: u32, row: u32, column: u32) -> Self {
        Self { page, row, column }
    }

    /// Page 0 is the non-editable cover
    pub fn is_cover(&self) -> bool {
        self.page == 0
    }
}

impl std::fmt::Display for GridPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.page, self.row, self.column)
    }
}

/// Slot layout of a single album page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    pub rows: u32,
    pub columns: u32,
}

impl PageLayout {
    pub fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    pub fn slots_per_page(&self) -> u32 {
        self.rows * self.columns
    }

    /// Check that a position's row/column fall inside this layout
    pub fn contains(&self, position: GridPosition) -> bool {
        (1..=self.rows).contains(&position.row) && (1..=self.columns).contains(&position.column)
    }

    /// Reject cover-page and out-of-bounds positions before any dispatch
    pub fn validate(&self, position: GridPosition) -> EngineResult<()> {
        if position.is_cover() {
            return Err(EngineError::InvalidInput(format!(
                "position {} is on the cover page",
                position
            )));
        }
        if !self.contains(position) {
            return Err(EngineError::InvalidInput(format!(
                "position {} outside {}x{} page layout",
                position, self.rows, self.columns
            )));
        }
        Ok(())
    }

    /// All positions of one page, row-major
    pub fn page_positions(&self, page: u32) -> Vec<GridPosition> {
        let mut positions = Vec::with_capacity(self.slots_per_page() as usize);
        for row in 1..=self.rows {
            for column in 1..=self.columns {
                positions.push(GridPosition::new(page, row, column));
            }
        }
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_detection() {
        assert!(GridPosition::new(0, 1, 1).is_cover());
        assert!(!GridPosition::new(1, 1, 1).is_cover());
    }

    #[test]
    fn test_layout_validation() {
        let layout = PageLayout::new(3, 4);
        assert!(layout.validate(GridPosition::new(1, 1, 1)).is_ok());
        assert!(layout.validate(GridPosition::new(2, 3, 4)).is_ok());
        assert!(layout.validate(GridPosition::new(0, 1, 1)).is_err());
        assert!(layout.validate(GridPosition::new(1, 4, 1)).is_err());
        assert!(layout.validate(GridPosition::new(1, 1, 5)).is_err());
        assert!(layout.validate(GridPosition::new(1, 0, 1)).is_err());
    }

    #[test]
    fn test_page_positions_row_major() {
        let layout = PageLayout::new(2, 2);
        let positions = layout.page_positions(3);
        assert_eq!(positions.len(), 4);
        assert_eq!(positions[0], GridPosition::new(3, 1, 1));
        assert_eq!(positions[1], GridPosition::new(3, 1, 2));
        assert_eq!(positions[3], GridPosition::new(3, 2, 2));
    }
}
