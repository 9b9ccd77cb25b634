//! Album Edit Engine
//!
//! Optimistic editing over a remotely-persisted album (a position-addressed
//! grid of slots) and a ranked variant list. Edits show instantly; writes
//! commit asynchronously and may fail, arrive out of order, or race with
//! further edits. The engine keeps one always-renderable view that merges
//! confirmed server state with speculative local edits, rolls a failed edit
//! back exactly to its last known-good value, and applies bulk reorders
//! atomically.
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - remote: Abstract persistence collaborator interface
//! - store: In-memory committed and speculative state
//! - engine: Reconciliation, mutation coordination, reordering, drag

pub mod domain;
pub mod engine;
pub mod remote;
pub mod store;

pub use domain::{
    ChangeKind, CollectionEntry, DisplayFields, EngineError, EngineResult, GridPosition,
    GridSlot, MutationOutcome, MutationPhase, PageLayout, PendingChange, ReorderRequest,
    Variant, VariantId,
};
pub use engine::{
    BatchReorderPlanner, ChangeEvent, DragInteractionController, DragOrigin, DragPayload,
    DropTarget, EditSession, MutationCoordinator, ReconciliationResolver, RenderDescriptor,
    ReorderPlan, SessionConfig, VariantCoordinator,
};
pub use remote::{RemoteAlbum, SlotMap};
