//! Collection Entry
//!
//! A placed card occupying a grid slot, and the slot states themselves.

use serde::{Deserialize, Serialize};

/// Free-form card data rendered by the UI (caption, crop, styling, ...)
pub type DisplayFields = serde_json::Map<String, serde_json::Value>;

/// A placed card/item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    /// Backing id, assigned by the server (0 until committed)
    pub id: u64,
    /// Reference to the catalog item this card shows
    pub item_ref: String,
    /// Free-form display data
    pub display_fields: DisplayFields,
    /// Unix millis, set by the server on create
    pub created_at: Option<i64>,
    /// Unix millis, stamped on each commit
    pub updated_at: Option<i64>,
}

impl CollectionEntry {
    /// Create a new entry with default values
    pub fn new(id: u64, item_ref: impl Into<String>) -> Self {
        Self {
            id,
            item_ref: item_ref.into(),
            display_fields: DisplayFields::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_fields(mut self, display_fields: DisplayFields) -> Self {
        self.display_fields = display_fields;
        self
    }
}

/// What a grid slot holds
///
/// A Backplaceholder is a decorative marker and never coexists with a real
/// entry at the same position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entry")]
pub enum GridSlot {
    #[default]
    Empty,
    Entry(CollectionEntry),
    Backplaceholder,
}

impl GridSlot {
    pub fn is_empty(&self) -> bool {
        matches!(self, GridSlot::Empty)
    }

    pub fn is_backplaceholder(&self) -> bool {
        matches!(self, GridSlot::Backplaceholder)
    }

    pub fn entry(&self) -> Option<&CollectionEntry> {
        match self {
            GridSlot::Entry(entry) => Some(entry),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_states_are_exclusive() {
        let slot = GridSlot::Entry(CollectionEntry::new(7, "item-7"));
        assert!(!slot.is_empty());
        assert!(!slot.is_backplaceholder());
        assert_eq!(slot.entry().unwrap().id, 7);

        assert!(GridSlot::Backplaceholder.entry().is_none());
        assert!(GridSlot::Empty.is_empty());
    }
}
