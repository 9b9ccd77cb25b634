//! Store Layer
//!
//! In-memory state containers: committed grid slots, the ordered variant
//! list, and the speculative change log.

mod grid;
mod pending_log;
mod ranked;

pub use grid::PositionGrid;
pub use pending_log::PendingChangeLog;
pub use ranked::RankedCollection;
