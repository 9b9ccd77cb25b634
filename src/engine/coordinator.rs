//! Mutation Coordinator
//!
//! Sequences every grid mutation through the same optimistic discipline:
//! apply to the view instantly, dispatch the network call, then commit or
//! roll back on the terminal response. Dispatches on one position are
//! serialized behind that position's gate, but the rendered view always
//! reflects the newest intent the instant it is issued. A response whose
//! token is no longer current is discarded, never applied.
//!
//! Replace is nonatomic against the remote unless the session is
//! configured for a combined replace endpoint: the new entry is added
//! first and a follow-up deletion is issued for the replaced entry's
//! backing id. A failed follow-up leaves a server-side orphan that only
//! the next refresh resolves; this is a documented gap, not silently
//! "fixed" here.

use std::sync::Arc;

use crate::domain::{
    ChangeKind, CollectionEntry, EngineError, EngineResult, GridPosition, GridSlot,
    MutationOutcome, PendingChange,
};
use crate::remote::RemoteAlbum;

use super::events::{ChangeEvent, Events};
use super::resolver::ReconciliationResolver;
use super::session::SessionConfig;
use super::state::SharedState;

/// Optimistic mutation sequencing for the position grid
#[derive(Clone)]
pub struct MutationCoordinator {
    state: SharedState,
    remote: Arc<dyn RemoteAlbum>,
    config: SessionConfig,
    events: Events,
}

impl MutationCoordinator {
    pub(crate) fn new(
        state: SharedState,
        remote: Arc<dyn RemoteAlbum>,
        config: SessionConfig,
        events: Events,
    ) -> Self {
        Self {
            state,
            remote,
            config,
            events,
        }
    }

    /// Place an entry at a position: Add on an empty slot, Replace on an
    /// occupied one (committed or pending). The view shows the new entry
    /// immediately; failure reverts it to the last committed value.
    pub async fn place(
        &self,
        position: GridPosition,
        entry: CollectionEntry,
    ) -> EngineResult<MutationOutcome> {
        self.config.validate_position(position)?;

        let (token, gate, kind) = {
            let mut st = self.state.lock().await;
            let view = ReconciliationResolver::resolve(&st.grid, &st.pending, position);
            let kind = match view.slot {
                GridSlot::Entry(_) => ChangeKind::Replace,
                GridSlot::Backplaceholder => {
                    return Err(EngineError::InvalidInput(format!(
                        "position {} holds a backplaceholder",
                        position
                    )));
                }
                GridSlot::Empty => ChangeKind::Add,
            };
            let previous = st.grid.slot(position);
            let token = st.pending.next_token(position);
            st.pending.record(PendingChange {
                kind,
                position,
                next: GridSlot::Entry(entry.clone()),
                previous,
                token,
            });
            (token, st.gate(position), kind)
        };
        self.events.emit(ChangeEvent::SlotPending { position });
        log::debug!("place {} as {} (token {})", position, kind.as_str(), token);

        let _turn = gate.lock().await;
        if !self.is_current(position, token).await {
            log::debug!("place {} superseded before dispatch (token {})", position, token);
            return Ok(MutationOutcome::Superseded);
        }

        let result = if kind == ChangeKind::Replace && self.config.atomic_replace {
            self.remote.replace(position, &entry).await
        } else {
            self.remote.add(&entry, position).await
        };

        match result {
            Ok(mut committed) => {
                let mut st = self.state.lock().await;
                let Some(change) = st.pending.take_if_current(position, token) else {
                    drop(st);
                    log::debug!("stale success at {} discarded (token {})", position, token);
                    return Ok(MutationOutcome::Superseded);
                };
                committed.updated_at = Some(chrono::Utc::now().timestamp_millis());
                st.grid.set(position, GridSlot::Entry(committed));
                drop(st);
                self.events.emit(ChangeEvent::SlotCommitted { position });

                if kind == ChangeKind::Replace && !self.config.atomic_replace {
                    if let GridSlot::Entry(replaced) = change.previous {
                        if let Err(err) = self.remote.remove(replaced.id).await {
                            log::warn!(
                                "follow-up delete of replaced entry {} failed: {}",
                                replaced.id,
                                err
                            );
                        }
                    }
                }
                Ok(MutationOutcome::Committed)
            }
            Err(err) => self.rollback_slot(position, token, err).await,
        }
    }

    /// Remove the entry at a position, optimistically
    pub async fn remove(&self, position: GridPosition) -> EngineResult<MutationOutcome> {
        self.config.validate_position(position)?;

        let (token, gate) = {
            let mut st = self.state.lock().await;
            let view = ReconciliationResolver::resolve(&st.grid, &st.pending, position);
            match view.slot {
                GridSlot::Entry(_) => {}
                GridSlot::Backplaceholder => {
                    return Err(EngineError::InvalidInput(format!(
                        "position {} holds a backplaceholder, toggle it instead",
                        position
                    )));
                }
                GridSlot::Empty => {
                    return Err(EngineError::NotFound(format!("no entry at {}", position)));
                }
            }
            let previous = st.grid.slot(position);
            let token = st.pending.next_token(position);
            st.pending.record(PendingChange {
                kind: ChangeKind::Remove,
                position,
                next: GridSlot::Empty,
                previous,
                token,
            });
            (token, st.gate(position))
        };
        self.events.emit(ChangeEvent::SlotPending { position });
        log::debug!("remove {} (token {})", position, token);

        let _turn = gate.lock().await;
        if !self.is_current(position, token).await {
            return Ok(MutationOutcome::Superseded);
        }

        // Backing id comes from committed state now that prior traffic on
        // this position is terminal.
        let backing = {
            let st = self.state.lock().await;
            st.grid.slot(position).entry().map(|entry| entry.id)
        };
        let Some(id) = backing else {
            // The entry this removal targeted never got committed (its add
            // failed or was superseded); the optimistic removal already
            // matches committed truth.
            let mut st = self.state.lock().await;
            if st.pending.take_if_current(position, token).is_some() {
                drop(st);
                self.events.emit(ChangeEvent::SlotCommitted { position });
                return Ok(MutationOutcome::Committed);
            }
            return Ok(MutationOutcome::Superseded);
        };

        match self.remote.remove(id).await {
            Ok(()) => {
                let mut st = self.state.lock().await;
                if st.pending.take_if_current(position, token).is_none() {
                    drop(st);
                    log::debug!("stale success at {} discarded (token {})", position, token);
                    return Ok(MutationOutcome::Superseded);
                }
                st.grid.clear(position);
                drop(st);
                self.events.emit(ChangeEvent::SlotCommitted { position });
                Ok(MutationOutcome::Committed)
            }
            Err(err) => self.rollback_slot(position, token, err).await,
        }
    }

    /// Relocate an entry between slots
    ///
    /// Runs as add-at-target then delete-at-source, the same nonatomic
    /// discipline as Replace. The target must be visually empty.
    pub async fn move_entry(
        &self,
        from: GridPosition,
        to: GridPosition,
    ) -> EngineResult<MutationOutcome> {
        self.config.validate_position(from)?;
        self.config.validate_position(to)?;
        if from == to {
            return Ok(MutationOutcome::Noop);
        }

        let (entry, from_token, to_token, first_gate, second_gate) = {
            let mut st = self.state.lock().await;
            let from_view = ReconciliationResolver::resolve(&st.grid, &st.pending, from);
            let entry = match from_view.slot {
                GridSlot::Entry(entry) => entry,
                GridSlot::Backplaceholder => {
                    return Err(EngineError::InvalidInput(format!(
                        "position {} holds a backplaceholder",
                        from
                    )));
                }
                GridSlot::Empty => {
                    return Err(EngineError::NotFound(format!("no entry at {}", from)));
                }
            };
            let to_view = ReconciliationResolver::resolve(&st.grid, &st.pending, to);
            if !to_view.slot.is_empty() {
                return Err(EngineError::InvalidInput(format!(
                    "target {} is occupied",
                    to
                )));
            }

            let from_previous = st.grid.slot(from);
            let from_token = st.pending.next_token(from);
            st.pending.record(PendingChange {
                kind: ChangeKind::Remove,
                position: from,
                next: GridSlot::Empty,
                previous: from_previous,
                token: from_token,
            });
            let to_previous = st.grid.slot(to);
            let to_token = st.pending.next_token(to);
            st.pending.record(PendingChange {
                kind: ChangeKind::Add,
                position: to,
                next: GridSlot::Entry(entry.clone()),
                previous: to_previous,
                token: to_token,
            });

            // Stable gate order so a concurrent reverse move cannot deadlock
            let (first, second) = if from <= to {
                (st.gate(from), st.gate(to))
            } else {
                (st.gate(to), st.gate(from))
            };
            (entry, from_token, to_token, first, second)
        };
        self.events.emit(ChangeEvent::SlotPending { position: from });
        self.events.emit(ChangeEvent::SlotPending { position: to });
        log::debug!("move entry {} -> {}", from, to);

        let _first = first_gate.lock().await;
        let _second = second_gate.lock().await;

        let (from_ok, to_ok) = {
            let st = self.state.lock().await;
            (
                st.pending.is_current(from, from_token),
                st.pending.is_current(to, to_token),
            )
        };
        if !from_ok || !to_ok {
            // One half was superseded; withdraw the other half too.
            self.withdraw_pair(from, from_token, to, to_token).await;
            return Ok(MutationOutcome::Superseded);
        }

        let backing = {
            let st = self.state.lock().await;
            st.grid.slot(from).entry().map(|entry| entry.id)
        };

        match self.remote.add(&entry, to).await {
            Ok(mut committed) => {
                let mut st = self.state.lock().await;
                let to_committed = st.pending.take_if_current(to, to_token).is_some();
                if to_committed {
                    committed.updated_at = Some(chrono::Utc::now().timestamp_millis());
                    st.grid.set(to, GridSlot::Entry(committed));
                }
                drop(st);
                if to_committed {
                    self.events.emit(ChangeEvent::SlotCommitted { position: to });
                }

                if let Some(id) = backing {
                    if let Err(err) = self.remote.remove(id).await {
                        log::warn!("follow-up delete of moved entry {} failed: {}", id, err);
                    }
                }
                let mut st = self.state.lock().await;
                let from_committed = st.pending.take_if_current(from, from_token).is_some();
                if from_committed {
                    st.grid.clear(from);
                }
                drop(st);
                if from_committed {
                    self.events.emit(ChangeEvent::SlotCommitted { position: from });
                }

                if to_committed {
                    Ok(MutationOutcome::Committed)
                } else {
                    Ok(MutationOutcome::Superseded)
                }
            }
            Err(err) => {
                let withdrew = self.withdraw_pair(from, from_token, to, to_token).await;
                if withdrew {
                    log::warn!("move {} -> {} failed, rolled back: {}", from, to, err);
                    Err(err)
                } else {
                    Ok(MutationOutcome::Superseded)
                }
            }
        }
    }

    /// Toggle the decorative backplaceholder at a position
    ///
    /// Only legal while the slot holds neither an entry nor a pending
    /// Add/Replace; toggling never displaces a real entry.
    pub async fn toggle_backplaceholder(
        &self,
        position: GridPosition,
    ) -> EngineResult<MutationOutcome> {
        self.config.validate_position(position)?;

        let (token, gate, kind, desired) = {
            let mut st = self.state.lock().await;
            let view = ReconciliationResolver::resolve(&st.grid, &st.pending, position);
            let (kind, desired) = match view.slot {
                GridSlot::Entry(_) => {
                    return Err(EngineError::InvalidInput(format!(
                        "position {} holds an entry",
                        position
                    )));
                }
                GridSlot::Backplaceholder => (ChangeKind::Remove, GridSlot::Empty),
                GridSlot::Empty => (ChangeKind::Add, GridSlot::Backplaceholder),
            };
            let previous = st.grid.slot(position);
            let token = st.pending.next_token(position);
            st.pending.record(PendingChange {
                kind,
                position,
                next: desired.clone(),
                previous,
                token,
            });
            (token, st.gate(position), kind, desired)
        };
        self.events.emit(ChangeEvent::SlotPending { position });
        log::debug!(
            "toggle backplaceholder {} -> {} (token {})",
            position,
            kind.as_str(),
            token
        );

        let _turn = gate.lock().await;
        if !self.is_current(position, token).await {
            return Ok(MutationOutcome::Superseded);
        }

        // Re-read committed truth now that the slot is quiet; the prior
        // in-flight toggle may have landed either way.
        let committed = {
            let st = self.state.lock().await;
            st.grid.slot(position)
        };
        if committed == desired {
            let mut st = self.state.lock().await;
            if st.pending.take_if_current(position, token).is_some() {
                drop(st);
                self.events.emit(ChangeEvent::SlotCommitted { position });
                return Ok(MutationOutcome::Committed);
            }
            return Ok(MutationOutcome::Superseded);
        }
        if committed.entry().is_some() {
            return self
                .rollback_slot(
                    position,
                    token,
                    EngineError::Conflict(format!("an entry landed at {}", position)),
                )
                .await;
        }

        let result = match kind {
            ChangeKind::Remove => self.remote.remove_backplaceholder(position).await,
            _ => self.remote.add_backplaceholder(position).await,
        };
        match result {
            Ok(()) => {
                let mut st = self.state.lock().await;
                if st.pending.take_if_current(position, token).is_none() {
                    return Ok(MutationOutcome::Superseded);
                }
                st.grid.set(position, desired);
                drop(st);
                self.events.emit(ChangeEvent::SlotCommitted { position });
                Ok(MutationOutcome::Committed)
            }
            Err(err) => self.rollback_slot(position, token, err).await,
        }
    }

    /// Merge authoritative server state for one page
    ///
    /// Slots with an in-flight pending change are left untouched: pending
    /// wins visually until its own terminal response lands.
    pub async fn refresh_page(&self, page: u32) -> EngineResult<()> {
        if page == 0 || page > self.config.pages {
            return Err(EngineError::InvalidInput(format!(
                "page {} outside album of {} pages",
                page, self.config.pages
            )));
        }
        let slots = self.remote.read_page(self.config.album_id, page).await?;

        let mut st = self.state.lock().await;
        let mut skipped = 0usize;
        for position in self.config.layout.page_positions(page) {
            if st.pending.is_pending(position) {
                skipped += 1;
                continue;
            }
            let slot = slots.get(&position).cloned().unwrap_or_default();
            st.grid.set(position, slot);
        }
        drop(st);
        log::info!("refreshed page {} ({} slots pending, skipped)", page, skipped);
        self.events.emit(ChangeEvent::PageRefreshed { page });
        Ok(())
    }

    async fn is_current(&self, position: GridPosition, token: u64) -> bool {
        self.state.lock().await.pending.is_current(position, token)
    }

    /// Drop the pending change and report the failure, unless a newer
    /// intent already superseded it (then the response is stale and the
    /// error is swallowed per the token rule).
    async fn rollback_slot(
        &self,
        position: GridPosition,
        token: u64,
        err: EngineError,
    ) -> EngineResult<MutationOutcome> {
        let mut st = self.state.lock().await;
        if st.pending.take_if_current(position, token).is_some() {
            drop(st);
            log::warn!("mutation at {} failed, rolled back: {}", position, err);
            self.events.emit(ChangeEvent::SlotRolledBack { position });
            Err(err)
        } else {
            log::debug!("stale failure at {} discarded (token {})", position, token);
            Ok(MutationOutcome::Superseded)
        }
    }

    /// Withdraw both halves of a two-position mutation; true if any half
    /// was still current
    async fn withdraw_pair(
        &self,
        from: GridPosition,
        from_token: u64,
        to: GridPosition,
        to_token: u64,
    ) -> bool {
        let mut st = self.state.lock().await;
        let took_from = st.pending.take_if_current(from, from_token).is_some();
        let took_to = st.pending.take_if_current(to, to_token).is_some();
        drop(st);
        if took_from {
            self.events.emit(ChangeEvent::SlotRolledBack { position: from });
        }
        if took_to {
            self.events.emit(ChangeEvent::SlotRolledBack { position: to });
        }
        took_from || took_to
    }
}
