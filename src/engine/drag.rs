//! Drag Interaction Controller
//!
//! Tracks the pick-up / hover / drop lifecycle and dispatches a valid
//! drop to the right mutation path. An invalid drop — no hover target, or
//! a drop on the picked-up spot with zero displacement — is a pure no-op:
//! it creates, mutates, and clears nothing.

use serde::{Deserialize, Serialize};

use crate::domain::{
    CollectionEntry, DisplayFields, EngineResult, GridPosition, MutationOutcome,
};

use super::session::EditSession;

/// Where a drag started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragOrigin {
    /// The item palette outside both stores
    Palette,
    /// An occupied album slot
    GridSlot(GridPosition),
    /// An index in the ranked variant list
    ListIndex(usize),
}

/// Candidate drop target under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget {
    GridSlot(GridPosition),
    ListIndex(usize),
}

/// What is being carried
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPayload {
    pub item_ref: String,
    pub display_fields: DisplayFields,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    payload: DragPayload,
    origin: DragOrigin,
    hover: Option<DropTarget>,
}

/// Pick-up/drop lifecycle over one edit session
pub struct DragInteractionController {
    session: EditSession,
    active: Option<ActiveDrag>,
}

impl DragInteractionController {
    pub fn new(session: EditSession) -> Self {
        Self {
            session,
            active: None,
        }
    }

    /// Begin a drag; replaces any drag already in progress
    pub fn pick_up(&mut self, payload: DragPayload, origin: DragOrigin) {
        log::debug!("pick up {:?} from {:?}", payload.item_ref, origin);
        self.active = Some(ActiveDrag {
            payload,
            origin,
            hover: None,
        });
    }

    /// Update the candidate target under the pointer
    pub fn hover(&mut self, target: Option<DropTarget>) {
        if let Some(drag) = self.active.as_mut() {
            drag.hover = target;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn hover_target(&self) -> Option<DropTarget> {
        self.active.as_ref().and_then(|drag| drag.hover)
    }

    /// Abandon the drag without dispatching anything
    pub fn cancel_drag(&mut self) {
        self.active = None;
    }

    /// Drop on the current hover target and end the drag
    pub async fn end_drag(&mut self) -> EngineResult<MutationOutcome> {
        let Some(drag) = self.active.take() else {
            return Ok(MutationOutcome::Noop);
        };
        let Some(target) = drag.hover else {
            log::debug!("drop with no target, ignored");
            return Ok(MutationOutcome::Noop);
        };

        match (drag.origin, target) {
            // cross-store: palette item placed into the grid
            (DragOrigin::Palette, DropTarget::GridSlot(position)) => {
                let entry = CollectionEntry::new(0, drag.payload.item_ref)
                    .with_fields(drag.payload.display_fields);
                self.session.place(position, entry).await
            }
            // same-store, grid internal
            (DragOrigin::GridSlot(from), DropTarget::GridSlot(to)) if from == to => {
                Ok(MutationOutcome::Noop)
            }
            (DragOrigin::GridSlot(from), DropTarget::GridSlot(to)) => {
                self.session.move_entry(from, to).await
            }
            // same-store, list internal
            (DragOrigin::ListIndex(source), DropTarget::ListIndex(target))
                if source == target =>
            {
                Ok(MutationOutcome::Noop)
            }
            (DragOrigin::ListIndex(source), DropTarget::ListIndex(target)) => {
                self.session.move_variant(source, target).await
            }
            // every other combination is not a supported move
            _ => {
                log::debug!("unsupported drop {:?} -> {:?}, ignored", drag.origin, target);
                Ok(MutationOutcome::Noop)
            }
        }
    }
}
