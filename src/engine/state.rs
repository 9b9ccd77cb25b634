//! Shared Engine State
//!
//! One lock guards the stores; it is never held across an await. Dispatch
//! ordering is enforced separately by per-position gates (and one gate for
//! the variant list), which ARE held across the network call so that a
//! position never has two requests in flight.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::GridPosition;
use crate::store::{PendingChangeLog, PositionGrid, RankedCollection};

#[derive(Debug, Default)]
pub(crate) struct AlbumState {
    pub grid: PositionGrid,
    pub pending: PendingChangeLog,
    pub ranked: RankedCollection,
    gates: HashMap<GridPosition, Arc<Mutex<()>>>,
    list_gate: Option<Arc<Mutex<()>>>,
}

impl AlbumState {
    /// Dispatch gate for one position; created on first use
    pub fn gate(&mut self, position: GridPosition) -> Arc<Mutex<()>> {
        self.gates
            .entry(position)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Dispatch gate for the variant list as a whole
    pub fn list_gate(&mut self) -> Arc<Mutex<()>> {
        self.list_gate
            .get_or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Cheap-to-clone handle to the session's state
pub(crate) type SharedState = Arc<Mutex<AlbumState>>;

pub(crate) fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(AlbumState::default()))
}
