//! Change Events
//!
//! Broadcast stream of state-change notifications, the re-render trigger
//! for whatever is drawing the album. Optimistic applications emit too:
//! the view must repaint the moment an intent is issued, not only when
//! the server answers.

use tokio::sync::broadcast;

use crate::domain::GridPosition;

/// State-change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A speculative change was applied to the slot's rendered view
    SlotPending { position: GridPosition },
    /// The slot's pending change was confirmed into committed state
    SlotCommitted { position: GridPosition },
    /// The slot's pending change failed and the view reverted
    SlotRolledBack { position: GridPosition },
    /// The variant list changed speculatively
    VariantsPending,
    /// A variant mutation was confirmed
    VariantsCommitted,
    /// A variant mutation failed and the order reverted
    VariantsRolledBack,
    /// Authoritative server state was merged in for a page
    PageRefreshed { page: u32 },
}

/// Shared event hub; cheap to clone
#[derive(Debug, Clone)]
pub(crate) struct Events {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Events {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit to whoever listens; lagging or absent receivers are fine
    pub fn emit(&self, event: ChangeEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}
