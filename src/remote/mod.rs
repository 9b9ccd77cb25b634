//! Remote Layer
//!
//! Abstract interface to the external persistence collaborator.
//! Implementations own the wire protocol; the engine only sees this trait.

mod api;

pub use api::{RemoteAlbum, SlotMap};
