//! Authoritative combatant records and basic types.

use glam::Vec2;

use crate::clock::TimerToken;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// A session participant (a connected client or the authority itself).
/// Each entity is owned by exactly one participant; only the owner and
/// the authority may issue intents for it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParticipantId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Ai,
}

/// Lifecycle of a combatant. `Despawned` is terminal for the record;
/// `Eliminated` is terminal for the respawn machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Spawning,
    Alive,
    Stunned,
    Dead,
    RespawnPending,
    Eliminated,
    Despawned,
}

impl Lifecycle {
    /// Wire encoding for `net_core::event::LifecycleChanged`.
    #[must_use]
    pub fn wire(self) -> u8 {
        match self {
            Lifecycle::Spawning => net_core::event::LIFECYCLE_SPAWNING,
            Lifecycle::Alive => net_core::event::LIFECYCLE_ALIVE,
            Lifecycle::Stunned => net_core::event::LIFECYCLE_STUNNED,
            Lifecycle::Dead => net_core::event::LIFECYCLE_DEAD,
            Lifecycle::RespawnPending => net_core::event::LIFECYCLE_RESPAWN_PENDING,
            Lifecycle::Eliminated => net_core::event::LIFECYCLE_ELIMINATED,
            Lifecycle::Despawned => net_core::event::LIFECYCLE_DESPAWNED,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Health {
    pub hp: i32,
    pub max: i32,
}

impl Health {
    #[must_use]
    pub fn full(max: i32) -> Self {
        Self { hp: max, max }
    }
    #[inline]
    #[must_use]
    pub fn alive(&self) -> bool {
        self.hp > 0
    }
    /// Keep hp inside `[0, max]`; inconsistencies are clamped, never
    /// propagated, since the core must not take down a live match.
    #[inline]
    pub fn clamp(&mut self) {
        self.hp = self.hp.clamp(0, self.max);
    }
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub owner: ParticipantId,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: Health,
    pub lifecycle: Lifecycle,
    pub defending: bool,
    /// Presentation mirror only; combat logic never gates on it.
    pub grounded: bool,
    /// Respawns remaining. Negative means eliminated.
    pub lives: i32,
    /// Session-stable index assigned at registration; drives
    /// round-robin spawn-point selection.
    pub spawn_index: usize,
    /// Set atomically with the Dead transition so a death is
    /// processed exactly once.
    pub death_processed: bool,
    // Absolute clock times (seconds) gating the next action.
    pub attack_ready_at: f64,
    pub defend_ready_at: f64,
    /// Last time a hit landed on this entity (hit-stun gate).
    pub last_hit_at: f64,
    // Outstanding timers, cancelled explicitly on death/removal.
    pub stun_timer: Option<TimerToken>,
    pub respawn_timer: Option<TimerToken>,
    // Scoreboard.
    pub kills: u32,
    pub deaths: u32,
    pub score: i32,
}

impl Entity {
    /// Can this entity be hit by an attack? Stunned combatants are
    /// still damageable; dead and despawned ones are not.
    #[inline]
    #[must_use]
    pub fn damageable(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Alive | Lifecycle::Stunned)
    }

    /// Can this entity act (attack, defend)? Only while strictly Alive.
    #[inline]
    #[must_use]
    pub fn can_act(&self) -> bool {
        self.lifecycle == Lifecycle::Alive
    }
}
