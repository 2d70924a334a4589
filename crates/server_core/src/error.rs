//! Rejection taxonomy for intents and mutations.
//!
//! All variants are recoverable by design: a rejected intent is
//! dropped with no state change. Duplicate damage-event delivery is
//! not represented here because it is a silent no-op, not an error
//! surfaced to the caller.

use crate::actor::{EntityId, Lifecycle};

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Reject {
    #[error("mutation attempted by non-authoritative caller")]
    NotAuthorized,
    #[error("entity {id:?} is {state:?}; action not permitted")]
    InvalidTransition { id: EntityId, state: Lifecycle },
    #[error("cooldown not elapsed; ready in {ready_in_s}s")]
    OnCooldown { ready_in_s: f32 },
    #[error("unknown entity {0:?}")]
    NotFound(EntityId),
}
