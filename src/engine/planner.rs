//! Batch Reorder Planner
//!
//! Turns a drag move (source index -> target index) into one atomic
//! reorder: remove, reinsert, renumber every rank 1..N, then verify
//! contiguity before anything is submitted.

use crate::domain::{EngineError, EngineResult, ReorderRequest, Variant};
use crate::store::RankedCollection;

/// A computed reorder: the full new local order plus the wire request
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderPlan {
    /// Complete new order, every rank renumbered sequentially
    pub items: Vec<Variant>,
    /// Durable-only rank assignment submitted to the remote
    pub request: ReorderRequest,
}

pub struct BatchReorderPlanner;

impl BatchReorderPlanner {
    /// Plan moving the element at `source` to `target`
    ///
    /// Every item is renumbered, not just the moved one. Temporary
    /// variants keep their place in the local order but are left out of
    /// the wire request; the durable subset is renumbered contiguously so
    /// the server-side rank invariant holds.
    pub fn plan_move(items: &[Variant], source: usize, target: usize) -> EngineResult<ReorderPlan> {
        if source >= items.len() {
            return Err(EngineError::InvalidInput(format!(
                "source index {} out of bounds for {} items",
                source,
                items.len()
            )));
        }
        if target >= items.len() {
            return Err(EngineError::InvalidInput(format!(
                "target index {} out of bounds for {} items",
                target,
                items.len()
            )));
        }

        let mut next = items.to_vec();
        let moved = next.remove(source);
        next.insert(target, moved);
        for (index, item) in next.iter_mut().enumerate() {
            item.rank = index as i32 + 1;
        }

        // Unreachable by construction; abort rather than submit bad ranks.
        RankedCollection::check_contiguous(&next)?;

        Ok(ReorderPlan {
            request: Self::wire_request(&next),
            items: next,
        })
    }

    /// Durable-only assignment, renumbered 1..M in list order
    pub fn wire_request(items: &[Variant]) -> ReorderRequest {
        let ranks = items
            .iter()
            .filter_map(|item| item.id.durable())
            .enumerate()
            .map(|(index, id)| (id, index as i32 + 1))
            .collect();
        ReorderRequest { ranks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VariantId;

    fn durable(id: u64, rank: i32) -> Variant {
        Variant::new(VariantId::Durable(id), rank, format!("item-{}", id))
    }

    #[test]
    fn test_move_renumbers_every_rank() {
        let items = vec![durable(1, 1), durable(2, 2), durable(3, 3)];
        let plan = BatchReorderPlanner::plan_move(&items, 1, 0).unwrap();

        let order: Vec<_> = plan.items.iter().map(|v| (v.id, v.rank)).collect();
        assert_eq!(
            order,
            vec![
                (VariantId::Durable(2), 1),
                (VariantId::Durable(1), 2),
                (VariantId::Durable(3), 3)
            ]
        );
        // the request carries all three ranks, not just the moved item
        assert_eq!(plan.request.ranks, vec![(2, 1), (1, 2), (3, 3)]);
    }

    #[test]
    fn test_move_to_end() {
        let items = vec![durable(1, 1), durable(2, 2), durable(3, 3)];
        let plan = BatchReorderPlanner::plan_move(&items, 0, 2).unwrap();
        assert_eq!(plan.request.ranks, vec![(2, 1), (3, 2), (1, 3)]);
    }

    #[test]
    fn test_out_of_bounds_is_rejected_before_dispatch() {
        let items = vec![durable(1, 1)];
        assert!(matches!(
            BatchReorderPlanner::plan_move(&items, 1, 0),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            BatchReorderPlanner::plan_move(&items, 0, 5),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_temporaries_stay_local() {
        let items = vec![
            durable(1, 1),
            Variant::new(VariantId::Temporary(9), 2, "draft"),
            durable(2, 3),
        ];
        let plan = BatchReorderPlanner::plan_move(&items, 2, 0).unwrap();

        // local order keeps the temporary, ranks contiguous over all three
        let ids: Vec<_> = plan.items.iter().map(|v| v.id).collect();
        assert_eq!(
            ids,
            vec![
                VariantId::Durable(2),
                VariantId::Durable(1),
                VariantId::Temporary(9)
            ]
        );
        RankedCollection::check_contiguous(&plan.items).unwrap();

        // the wire sees durables only, renumbered contiguously
        assert_eq!(plan.request.ranks, vec![(2, 1), (1, 2)]);
    }
}
