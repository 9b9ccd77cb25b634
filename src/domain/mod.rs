//! Domain Layer
//!
//! Contains all domain entities and core business rules.
//! This layer has NO external dependencies (except serde for serialization).

mod error;
mod position;
mod entry;
mod variant;
mod pending;

pub use error::{EngineError, EngineResult};
pub use position::{GridPosition, PageLayout};
pub use entry::{CollectionEntry, DisplayFields, GridSlot};
pub use variant::{ReorderRequest, Variant, VariantId};
pub use pending::{ChangeKind, MutationOutcome, MutationPhase, PendingChange};
