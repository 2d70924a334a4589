//! server_core: authoritative combat-resolution and respawn core.
//!
//! One `Session` per match is the single serialization point: remote
//! participants submit intents, the session validates and applies them
//! in arrival order, and timed effects (stun, respawn) go through the
//! session clock so cancellation is explicit. Rendering, input, and
//! UI live outside; they consume `net_core` events.

pub mod actor;
pub mod clock;
pub mod combat;
pub mod error;
pub mod knockback;
pub mod registry;
pub mod respawn;
pub mod session;
pub mod telemetry;

pub use actor::{Entity, EntityId, EntityKind, Health, Lifecycle, ParticipantId};
pub use clock::{SessionClock, TimerToken};
pub use combat::DamageEvent;
pub use error::Reject;
pub use registry::Registry;
pub use session::{Session, SessionIntent};
