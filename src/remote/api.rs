//! Remote Album API
//!
//! The read/write contract of the persistence service. All calls are
//! asynchronous, independent across positions/items, and terminal: they
//! either confirm or fail, with no mid-flight cancellation.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{
    CollectionEntry, EngineResult, GridPosition, GridSlot, ReorderRequest, Variant,
};

/// Authoritative slot contents of one page, as returned by `read_page`
pub type SlotMap = HashMap<GridPosition, GridSlot>;

/// Persistence collaborator for one album and its variant list
///
/// The engine treats every call as all-or-nothing. In particular `reorder`
/// is atomic by contract: the caller never interprets partial success.
#[async_trait]
pub trait RemoteAlbum: Send + Sync {
    /// Persist a new entry at a position; returns the committed entry
    /// with its server-assigned id
    async fn add(&self, entry: &CollectionEntry, position: GridPosition)
        -> EngineResult<CollectionEntry>;

    /// Delete an entry by backing id
    async fn remove(&self, id: u64) -> EngineResult<()>;

    /// Atomically swap the entry at a position for a new one
    ///
    /// Some services implement this as delete-then-add internally; the
    /// coordinator only calls it when configured as atomic-capable.
    async fn replace(
        &self,
        position: GridPosition,
        entry: &CollectionEntry,
    ) -> EngineResult<CollectionEntry>;

    /// Apply a full rank assignment, all-or-nothing
    async fn reorder(&self, request: &ReorderRequest) -> EngineResult<()>;

    /// Fetch the authoritative slot contents of one page (refresh only)
    async fn read_page(&self, album_id: u64, page: u32) -> EngineResult<SlotMap>;

    /// Place a decorative backplaceholder at an empty position
    async fn add_backplaceholder(&self, position: GridPosition) -> EngineResult<()>;

    /// Remove the backplaceholder at a position
    async fn remove_backplaceholder(&self, position: GridPosition) -> EngineResult<()>;

    /// Persist a new variant; returns it with a durable id and
    /// server-echoed fields
    async fn create_variant(&self, variant: &Variant) -> EngineResult<Variant>;

    /// Update an existing durable variant at its current rank
    async fn update_variant(&self, variant: &Variant) -> EngineResult<Variant>;

    /// Delete a durable variant by remote id
    async fn delete_variant(&self, id: u64) -> EngineResult<()>;
}
