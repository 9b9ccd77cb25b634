//! Ranked Collection
//!
//! The ordered variant list. The working order reflects optimistic edits;
//! callers capture snapshots before mutating and restore them wholesale on
//! failure, never merging old and new order.

use crate::domain::{DisplayFields, EngineError, EngineResult, Variant, VariantId};

#[derive(Debug, Clone, Default)]
pub struct RankedCollection {
    items: Vec<Variant>,
    next_local_id: u64,
    /// Bumped on every optimistic mutation; dispatched requests capture it
    /// and discard their response if the list moved on underneath them
    generation: u64,
}

impl RankedCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Variant] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn index_of(&self, id: VariantId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn get(&self, id: VariantId) -> Option<&Variant> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Seed the list from confirmed server state (initial load)
    pub fn load(&mut self, mut items: Vec<Variant>) {
        items.sort_by_key(|item| item.rank);
        self.items = items;
        self.renumber();
        self.generation += 1;
    }

    /// Insert a new temporary variant at the next sequential rank
    pub fn insert_temporary(&mut self, item_ref: impl Into<String>, fields: DisplayFields) -> VariantId {
        self.next_local_id += 1;
        let id = VariantId::Temporary(self.next_local_id);
        let rank = self.items.len() as i32 + 1;
        self.items.push(Variant::new(id, rank, item_ref).with_fields(fields));
        self.generation += 1;
        id
    }

    /// Replace a variant in place: same index, same rank, new identity
    /// and fields. This is how a Temporary becomes Durable.
    pub fn promote(&mut self, id: VariantId, mut replacement: Variant) -> EngineResult<()> {
        let index = self
            .index_of(id)
            .ok_or_else(|| EngineError::NotFound(format!("variant {} not in list", id)))?;
        replacement.rank = self.items[index].rank;
        self.items[index] = replacement;
        self.generation += 1;
        Ok(())
    }

    /// Overwrite a variant's fields without moving it
    pub fn update_fields(&mut self, id: VariantId, fields: DisplayFields) -> EngineResult<()> {
        let index = self
            .index_of(id)
            .ok_or_else(|| EngineError::NotFound(format!("variant {} not in list", id)))?;
        self.items[index].fields = fields;
        self.generation += 1;
        Ok(())
    }

    /// Remove a variant and close the rank gap it leaves
    pub fn remove(&mut self, id: VariantId) -> Option<Variant> {
        let index = self.index_of(id)?;
        let removed = self.items.remove(index);
        self.renumber();
        self.generation += 1;
        Some(removed)
    }

    /// Replace the whole working order (optimistic reorder apply/restore)
    pub fn set_order(&mut self, items: Vec<Variant>) {
        self.items = items;
        self.generation += 1;
    }

    /// Renumber every rank sequentially 1..N in current order
    pub fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.rank = index as i32 + 1;
        }
    }

    /// Verify ranks form exactly {1..N}
    pub fn check_contiguous(items: &[Variant]) -> EngineResult<()> {
        for (index, item) in items.iter().enumerate() {
            let expected = index as i32 + 1;
            if item.rank != expected {
                return Err(EngineError::Internal(format!(
                    "rank {} at index {} breaks 1..{} contiguity",
                    item.rank,
                    index,
                    items.len()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection_of(n: usize) -> RankedCollection {
        let mut collection = RankedCollection::new();
        let items = (1..=n)
            .map(|i| Variant::new(VariantId::Durable(i as u64), i as i32, format!("item-{}", i)))
            .collect();
        collection.load(items);
        collection
    }

    #[test]
    fn test_temporary_insert_takes_next_rank() {
        let mut collection = collection_of(3);
        let id = collection.insert_temporary("draft", DisplayFields::new());
        assert!(id.is_temporary());
        assert_eq!(collection.len(), 4);
        assert_eq!(collection.get(id).unwrap().rank, 4);
        RankedCollection::check_contiguous(collection.items()).unwrap();
    }

    #[test]
    fn test_promote_keeps_index_and_rank() {
        let mut collection = collection_of(2);
        let temp = collection.insert_temporary("draft", DisplayFields::new());
        let index = collection.index_of(temp).unwrap();

        let durable = Variant::new(VariantId::Durable(50), 99, "draft");
        collection.promote(temp, durable).unwrap();

        assert_eq!(collection.index_of(VariantId::Durable(50)), Some(index));
        assert_eq!(collection.items()[index].rank, 3);
        assert!(collection.get(temp).is_none());
    }

    #[test]
    fn test_remove_closes_rank_gap() {
        let mut collection = collection_of(3);
        collection.remove(VariantId::Durable(2)).unwrap();
        assert_eq!(collection.len(), 2);
        RankedCollection::check_contiguous(collection.items()).unwrap();
        assert_eq!(collection.items()[1].id, VariantId::Durable(3));
        assert_eq!(collection.items()[1].rank, 2);
    }

    #[test]
    fn test_contiguity_check_catches_gaps_and_duplicates() {
        let mut items = vec![
            Variant::new(VariantId::Durable(1), 1, "a"),
            Variant::new(VariantId::Durable(2), 3, "b"),
        ];
        assert!(RankedCollection::check_contiguous(&items).is_err());
        items[1].rank = 1;
        assert!(RankedCollection::check_contiguous(&items).is_err());
        items[1].rank = 2;
        assert!(RankedCollection::check_contiguous(&items).is_ok());
    }

    #[test]
    fn test_load_sorts_by_rank() {
        let mut collection = RankedCollection::new();
        collection.load(vec![
            Variant::new(VariantId::Durable(2), 2, "b"),
            Variant::new(VariantId::Durable(1), 1, "a"),
            Variant::new(VariantId::Durable(3), 3, "c"),
        ]);
        let ids: Vec<_> = collection.items().iter().map(|v| v.id).collect();
        assert_eq!(
            ids,
            vec![
                VariantId::Durable(1),
                VariantId::Durable(2),
                VariantId::Durable(3)
            ]
        );
    }
}
