//! Edit Session
//!
//! Session-owned glue: one session owns its stores, its remote handle and
//! its event channel. No ambient globals; two sessions never share state,
//! which keeps them independently testable and concurrently usable.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::domain::{
    CollectionEntry, DisplayFields, EngineResult, GridPosition, MutationOutcome, MutationPhase,
    PageLayout, Variant, VariantId,
};
use crate::remote::RemoteAlbum;

use super::coordinator::MutationCoordinator;
use super::events::{ChangeEvent, Events};
use super::resolver::{ReconciliationResolver, RenderDescriptor};
use super::state::{new_shared_state, SharedState};
use super::variants::VariantCoordinator;

/// Session parameters
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Album being edited
    pub album_id: u64,
    /// Slot layout of every content page
    pub layout: PageLayout,
    /// Number of content pages (page 0 is the cover, pages 1..=pages edit)
    pub pages: u32,
    /// Use the remote's combined replace endpoint instead of add + delete
    pub atomic_replace: bool,
    /// Buffer size of the change-event channel
    pub event_capacity: usize,
}

impl SessionConfig {
    pub fn new(album_id: u64, pages: u32, layout: PageLayout) -> Self {
        Self {
            album_id,
            layout,
            pages,
            atomic_replace: false,
            event_capacity: 64,
        }
    }

    /// Full position check: layout bounds, cover page, page range
    pub fn validate_position(&self, position: GridPosition) -> EngineResult<()> {
        self.layout.validate(position)?;
        if position.page > self.pages {
            return Err(crate::domain::EngineError::InvalidInput(format!(
                "position {} outside album of {} pages",
                position, self.pages
            )));
        }
        Ok(())
    }
}

/// One user's editing session over one album
///
/// Cheap to clone; clones share the same state and event channel.
#[derive(Clone)]
pub struct EditSession {
    state: SharedState,
    config: SessionConfig,
    events: Events,
    coordinator: MutationCoordinator,
    variants: VariantCoordinator,
}

impl EditSession {
    pub fn new(remote: Arc<dyn RemoteAlbum>, config: SessionConfig) -> Self {
        let state = new_shared_state();
        let events = Events::new(config.event_capacity);
        let coordinator = MutationCoordinator::new(
            state.clone(),
            remote.clone(),
            config.clone(),
            events.clone(),
        );
        let variants = VariantCoordinator::new(state.clone(), remote, events.clone());
        Self {
            state,
            config,
            events,
            coordinator,
            variants,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The grid mutation coordinator
    pub fn coordinator(&self) -> &MutationCoordinator {
        &self.coordinator
    }

    /// The variant list coordinator
    pub fn variants(&self) -> &VariantCoordinator {
        &self.variants
    }

    /// Committed-state change stream; the re-render trigger
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    /// Merged (committed + pending) view of one slot
    pub async fn resolve(&self, position: GridPosition) -> RenderDescriptor {
        let st = self.state.lock().await;
        ReconciliationResolver::resolve(&st.grid, &st.pending, position)
    }

    /// Merged view of every slot on a page, row-major
    pub async fn resolve_page(&self, page: u32) -> Vec<RenderDescriptor> {
        let st = self.state.lock().await;
        ReconciliationResolver::resolve_page(&st.grid, &st.pending, self.config.layout, page)
    }

    /// Typed mutation state of one position
    pub async fn phase(&self, position: GridPosition) -> MutationPhase {
        self.state.lock().await.pending.phase(position)
    }

    /// Number of in-flight pending changes on the grid
    pub async fn pending_len(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    /// Current working order of the variant list
    pub async fn variant_list(&self) -> Vec<Variant> {
        self.variants.list().await
    }

    // ------------------------------------------------------------------
    // Grid mutations
    // ------------------------------------------------------------------

    pub async fn place(
        &self,
        position: GridPosition,
        entry: CollectionEntry,
    ) -> EngineResult<MutationOutcome> {
        self.coordinator.place(position, entry).await
    }

    pub async fn remove(&self, position: GridPosition) -> EngineResult<MutationOutcome> {
        self.coordinator.remove(position).await
    }

    pub async fn move_entry(
        &self,
        from: GridPosition,
        to: GridPosition,
    ) -> EngineResult<MutationOutcome> {
        self.coordinator.move_entry(from, to).await
    }

    pub async fn toggle_backplaceholder(
        &self,
        position: GridPosition,
    ) -> EngineResult<MutationOutcome> {
        self.coordinator.toggle_backplaceholder(position).await
    }

    pub async fn refresh_page(&self, page: u32) -> EngineResult<()> {
        self.coordinator.refresh_page(page).await
    }

    // ------------------------------------------------------------------
    // Variant mutations
    // ------------------------------------------------------------------

    pub async fn load_variants(&self, items: Vec<Variant>) {
        self.variants.load(items).await
    }

    pub async fn create_variant(
        &self,
        item_ref: impl Into<String>,
        fields: DisplayFields,
    ) -> VariantId {
        self.variants.create_variant(item_ref, fields).await
    }

    pub async fn clone_variant(&self, source: VariantId) -> EngineResult<VariantId> {
        self.variants.clone_variant(source).await
    }

    pub async fn confirm_variant(
        &self,
        id: VariantId,
        fields: DisplayFields,
    ) -> EngineResult<MutationOutcome> {
        self.variants.confirm_variant(id, fields).await
    }

    pub async fn cancel_variant(&self, id: VariantId) -> EngineResult<()> {
        self.variants.cancel_variant(id).await
    }

    pub async fn delete_variant(&self, id: VariantId) -> EngineResult<MutationOutcome> {
        self.variants.delete_variant(id).await
    }

    pub async fn move_variant(
        &self,
        source: usize,
        target: usize,
    ) -> EngineResult<MutationOutcome> {
        self.variants.move_variant(source, target).await
    }
}
