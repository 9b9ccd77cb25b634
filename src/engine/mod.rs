//! Engine Layer
//!
//! Operation layer bridging callers to the stores and the remote service:
//! reconciliation, optimistic mutation coordination, batch reordering,
//! the variant lifecycle, and drag interaction.

mod coordinator;
mod drag;
mod events;
mod planner;
mod resolver;
mod session;
mod state;
mod variants;


pub use coordinator::MutationCoordinator;
pub use drag::{DragInteractionController, DragOrigin, DragPayload, DropTarget};
pub use events::ChangeEvent;
pub use planner::{BatchReorderPlanner, ReorderPlan};
pub use resolver::{ReconciliationResolver, RenderDescriptor};
pub use session::{EditSession, SessionConfig};
pub use variants::VariantCoordinator;
