//! Ranked Variant
//!
//! Items of the linearly ordered variant list. Confirmed ranks are always
//! exactly {1..N}: no gaps, no duplicates.

use serde::{Deserialize, Serialize};

use super::entry::DisplayFields;

/// Identity of a ranked variant
///
/// A `Temporary` id exists only in this session; it is promoted to
/// `Durable` on the first successful persist or discarded, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum VariantId {
    Temporary(u64),
    Durable(u64),
}

impl VariantId {
    pub fn is_temporary(&self) -> bool {
        matches!(self, VariantId::Temporary(_))
    }

    pub fn is_durable(&self) -> bool {
        matches!(self, VariantId::Durable(_))
    }

    /// Remote id, if this variant has been persisted
    pub fn durable(&self) -> Option<u64> {
        match self {
            VariantId::Durable(id) => Some(*id),
            VariantId::Temporary(_) => None,
        }
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariantId::Temporary(id) => write!(f, "tmp:{}", id),
            VariantId::Durable(id) => write!(f, "dur:{}", id),
        }
    }
}

/// A variant in the ranked list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    /// 1-based rank within the list
    pub rank: i32,
    /// Reference to the catalog item this variant derives from
    pub item_ref: String,
    /// Free-form variant data
    pub fields: DisplayFields,
}

impl Variant {
    pub fn new(id: VariantId, rank: i32, item_ref: impl Into<String>) -> Self {
        Self {
            id,
            rank,
            item_ref: item_ref.into(),
            fields: DisplayFields::new(),
        }
    }

    pub fn with_fields(mut self, fields: DisplayFields) -> Self {
        self.fields = fields;
        self
    }
}

/// Full rank assignment submitted to the remote, all-or-nothing
///
/// Carries durable ids only; temporary variants never reach the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub ranks: Vec<(u64, i32)>,
}

impl ReorderRequest {
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_id_promotion_surface() {
        let temp = VariantId::Temporary(3);
        assert!(temp.is_temporary());
        assert_eq!(temp.durable(), None);

        let durable = VariantId::Durable(99);
        assert!(durable.is_durable());
        assert_eq!(durable.durable(), Some(99));
    }

    #[test]
    fn test_variant_id_display() {
        assert_eq!(VariantId::Temporary(1).to_string(), "tmp:1");
        assert_eq!(VariantId::Durable(2).to_string(), "dur:2");
    }
}
