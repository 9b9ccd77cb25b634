//! Variant Coordinator
//!
//! Lifecycle of the ranked variant list: temporary create/clone, confirm
//! (promote or update), cancel, delete, and batch reordering. Dispatches
//! are serialized behind one list gate; optimistic applies are immediate.
//!
//! A Temporary variant never touches the server until it is confirmed: it
//! is promoted in place on the first successful persist, and removed
//! entirely (never server-deleted) on cancel or a failed confirm.

use std::sync::Arc;

use crate::domain::{
    DisplayFields, EngineError, EngineResult, MutationOutcome, Variant, VariantId,
};
use crate::remote::RemoteAlbum;

use super::events::{ChangeEvent, Events};
use super::planner::BatchReorderPlanner;
use super::state::SharedState;

/// Optimistic mutation sequencing for the ranked variant list
#[derive(Clone)]
pub struct VariantCoordinator {
    state: SharedState,
    remote: Arc<dyn RemoteAlbum>,
    events: Events,
}

impl VariantCoordinator {
    pub(crate) fn new(state: SharedState, remote: Arc<dyn RemoteAlbum>, events: Events) -> Self {
        Self {
            state,
            remote,
            events,
        }
    }

    /// Seed the list from confirmed server state
    pub async fn load(&self, items: Vec<Variant>) {
        let mut st = self.state.lock().await;
        st.ranked.load(items);
        drop(st);
        self.events.emit(ChangeEvent::VariantsCommitted);
    }

    /// Current working order (optimistic edits included)
    pub async fn list(&self) -> Vec<Variant> {
        self.state.lock().await.ranked.items().to_vec()
    }

    /// Synthesize a new Temporary variant at the next sequential rank
    ///
    /// Purely local; nothing is persisted until the variant is confirmed.
    pub async fn create_variant(
        &self,
        item_ref: impl Into<String>,
        fields: DisplayFields,
    ) -> VariantId {
        let id = {
            let mut st = self.state.lock().await;
            st.ranked.insert_temporary(item_ref, fields)
        };
        self.events.emit(ChangeEvent::VariantsPending);
        log::debug!("created temporary variant {}", id);
        id
    }

    /// Clone an existing variant into a new Temporary at the end
    pub async fn clone_variant(&self, source: VariantId) -> EngineResult<VariantId> {
        let id = {
            let mut st = self.state.lock().await;
            let item = st
                .ranked
                .get(source)
                .cloned()
                .ok_or_else(|| EngineError::NotFound(format!("variant {} not in list", source)))?;
            st.ranked.insert_temporary(item.item_ref, item.fields)
        };
        self.events.emit(ChangeEvent::VariantsPending);
        log::debug!("cloned {} into temporary variant {}", source, id);
        Ok(id)
    }

    /// Confirm a variant's fields
    ///
    /// Temporary: first persist; on success the item is replaced in place
    /// (same index, same rank) by its durable form. On failure it is
    /// removed entirely. Durable: an update at the current rank; no
    /// reordering occurs either way.
    pub async fn confirm_variant(
        &self,
        id: VariantId,
        fields: DisplayFields,
    ) -> EngineResult<MutationOutcome> {
        match id {
            VariantId::Temporary(_) => self.confirm_temporary(id, fields).await,
            VariantId::Durable(_) => self.confirm_durable(id, fields).await,
        }
    }

    async fn confirm_temporary(
        &self,
        id: VariantId,
        fields: DisplayFields,
    ) -> EngineResult<MutationOutcome> {
        let (payload, gate) = {
            let mut st = self.state.lock().await;
            let index = st
                .ranked
                .index_of(id)
                .ok_or_else(|| EngineError::NotFound(format!("variant {} not in list", id)))?;
            st.ranked.update_fields(id, fields)?;
            let mut payload = st.ranked.items()[index].clone();
            // Rank on the wire counts durables only; the server list does
            // not contain this item's temporary siblings.
            payload.rank = st.ranked.items()[..index]
                .iter()
                .filter(|item| item.id.is_durable())
                .count() as i32
                + 1;
            (payload, st.list_gate())
        };
        self.events.emit(ChangeEvent::VariantsPending);
        log::debug!("confirming temporary variant {}", id);

        let _turn = gate.lock().await;
        if self.state.lock().await.ranked.get(id).is_none() {
            // cancelled while waiting its turn
            return Ok(MutationOutcome::Superseded);
        }

        match self.remote.create_variant(&payload).await {
            Ok(durable) => {
                let mut st = self.state.lock().await;
                if st.ranked.get(id).is_none() {
                    drop(st);
                    log::debug!("stale confirm of {} discarded", id);
                    return Ok(MutationOutcome::Superseded);
                }
                st.ranked.promote(id, durable)?;
                drop(st);
                self.events.emit(ChangeEvent::VariantsCommitted);
                Ok(MutationOutcome::Committed)
            }
            Err(err) => {
                // first persist failed: the temporary is discarded whole
                let mut st = self.state.lock().await;
                let removed = st.ranked.remove(id).is_some();
                drop(st);
                if removed {
                    log::warn!("confirm of temporary {} failed, discarded: {}", id, err);
                    self.events.emit(ChangeEvent::VariantsRolledBack);
                    Err(err)
                } else {
                    Ok(MutationOutcome::Superseded)
                }
            }
        }
    }

    async fn confirm_durable(
        &self,
        id: VariantId,
        fields: DisplayFields,
    ) -> EngineResult<MutationOutcome> {
        let (payload, before, gate, generation) = {
            let mut st = self.state.lock().await;
            let item = st
                .ranked
                .get(id)
                .cloned()
                .ok_or_else(|| EngineError::NotFound(format!("variant {} not in list", id)))?;
            let before = item.fields.clone();
            st.ranked.update_fields(id, fields.clone())?;
            let mut payload = item;
            payload.fields = fields;
            (payload, before, st.list_gate(), st.ranked.generation())
        };
        self.events.emit(ChangeEvent::VariantsPending);
        log::debug!("updating durable variant {}", id);

        let _turn = gate.lock().await;
        if self.state.lock().await.ranked.get(id).is_none() {
            return Ok(MutationOutcome::Superseded);
        }

        match self.remote.update_variant(&payload).await {
            Ok(echoed) => {
                let mut st = self.state.lock().await;
                if st.ranked.generation() == generation && st.ranked.get(id).is_some() {
                    st.ranked.update_fields(id, echoed.fields)?;
                }
                drop(st);
                self.events.emit(ChangeEvent::VariantsCommitted);
                Ok(MutationOutcome::Committed)
            }
            Err(err) => {
                let mut st = self.state.lock().await;
                if st.ranked.generation() == generation && st.ranked.get(id).is_some() {
                    st.ranked.update_fields(id, before)?;
                    drop(st);
                    log::warn!("update of {} failed, rolled back: {}", id, err);
                    self.events.emit(ChangeEvent::VariantsRolledBack);
                    Err(err)
                } else {
                    log::debug!("stale update failure of {} discarded", id);
                    Ok(MutationOutcome::Superseded)
                }
            }
        }
    }

    /// Discard a Temporary without persisting it; a no-op for Durables
    pub async fn cancel_variant(&self, id: VariantId) -> EngineResult<()> {
        if id.is_durable() {
            // nothing staged engine-side for durable edits
            return Ok(());
        }
        let removed = {
            let mut st = self.state.lock().await;
            st.ranked.remove(id)
        };
        match removed {
            Some(_) => {
                log::debug!("cancelled temporary variant {}", id);
                self.events.emit(ChangeEvent::VariantsCommitted);
                Ok(())
            }
            None => Err(EngineError::NotFound(format!("variant {} not in list", id))),
        }
    }

    /// Delete a variant
    ///
    /// Durable: optimistic removal with full-order restore on failure.
    /// Temporary: local discard, never a server delete.
    pub async fn delete_variant(&self, id: VariantId) -> EngineResult<MutationOutcome> {
        let Some(remote_id) = id.durable() else {
            self.cancel_variant(id).await?;
            return Ok(MutationOutcome::Committed);
        };

        let (before, gate, generation) = {
            let mut st = self.state.lock().await;
            let before = st.ranked.items().to_vec();
            if st.ranked.remove(id).is_none() {
                return Err(EngineError::NotFound(format!("variant {} not in list", id)));
            }
            (before, st.list_gate(), st.ranked.generation())
        };
        self.events.emit(ChangeEvent::VariantsPending);
        log::debug!("deleting durable variant {}", id);

        let _turn = gate.lock().await;
        match self.remote.delete_variant(remote_id).await {
            Ok(()) => {
                self.events.emit(ChangeEvent::VariantsCommitted);
                Ok(MutationOutcome::Committed)
            }
            Err(err) => {
                let mut st = self.state.lock().await;
                if st.ranked.generation() == generation {
                    st.ranked.set_order(before);
                    drop(st);
                    self.events.emit(ChangeEvent::VariantsRolledBack);
                } else {
                    log::warn!("delete rollback of {} skipped, list moved on", id);
                }
                log::warn!("delete of {} failed: {}", id, err);
                Err(err)
            }
        }
    }

    /// Move the variant at `source` to `target` and submit the whole new
    /// rank assignment atomically
    ///
    /// On failure the order reverts to the exact pre-move snapshot, never
    /// a partial merge of old and new.
    pub async fn move_variant(
        &self,
        source: usize,
        target: usize,
    ) -> EngineResult<MutationOutcome> {
        if source == target {
            return Ok(MutationOutcome::Noop);
        }

        let (plan, before, gate, generation) = {
            let mut st = self.state.lock().await;
            let plan = BatchReorderPlanner::plan_move(st.ranked.items(), source, target)?;
            let before = st.ranked.items().to_vec();
            st.ranked.set_order(plan.items.clone());
            (plan, before, st.list_gate(), st.ranked.generation())
        };
        self.events.emit(ChangeEvent::VariantsPending);
        log::debug!("reorder: move index {} -> {}", source, target);

        let _turn = gate.lock().await;
        if self.state.lock().await.ranked.generation() != generation {
            log::debug!("reorder superseded before dispatch");
            return Ok(MutationOutcome::Superseded);
        }

        if plan.request.is_empty() {
            // nothing durable on the wire; the local order is the whole truth
            self.events.emit(ChangeEvent::VariantsCommitted);
            return Ok(MutationOutcome::Committed);
        }

        match self.remote.reorder(&plan.request).await {
            Ok(()) => {
                self.events.emit(ChangeEvent::VariantsCommitted);
                Ok(MutationOutcome::Committed)
            }
            Err(err) => {
                let mut st = self.state.lock().await;
                if st.ranked.generation() == generation {
                    st.ranked.set_order(before);
                    drop(st);
                    log::warn!("reorder failed, order restored: {}", err);
                    self.events.emit(ChangeEvent::VariantsRolledBack);
                    Err(err)
                } else {
                    log::debug!("stale reorder failure discarded");
                    Ok(MutationOutcome::Superseded)
                }
            }
        }
    }
}
