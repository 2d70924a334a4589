//! Authoritative entity store with single-writer enforcement.
//!
//! Exactly one participant per session (the resolver node) may mutate
//! entity records; everyone else goes through intents. Records are
//! retained after despawn so win-condition accounting can still see
//! every entity that ever joined the match.

use glam::Vec2;

use crate::actor::{Entity, EntityId, EntityKind, Health, Lifecycle, ParticipantId};
use crate::error::Reject;

#[derive(Debug)]
pub struct Registry {
    authority: ParticipantId,
    next_id: u32,
    ents: Vec<Entity>,
}

impl Registry {
    #[must_use]
    pub fn new(authority: ParticipantId) -> Self {
        Self {
            authority,
            next_id: 1,
            ents: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn authority(&self) -> ParticipantId {
        self.authority
    }

    /// Entities ever registered, despawned included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ents.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ents.is_empty()
    }

    /// Register a combatant. New entities start `Spawning`; the
    /// session activates them once placed.
    pub fn register(
        &mut self,
        who: ParticipantId,
        kind: EntityKind,
        owner: ParticipantId,
        pos: Vec2,
        radius: f32,
        max_hp: i32,
        lives: i32,
    ) -> Result<EntityId, Reject> {
        self.check_authority(who)?;
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let spawn_index = self.ents.len();
        self.ents.push(Entity {
            id,
            kind,
            owner,
            pos,
            radius,
            hp: Health::full(max_hp),
            lifecycle: Lifecycle::Spawning,
            defending: false,
            grounded: true,
            lives,
            spawn_index,
            death_processed: false,
            attack_ready_at: 0.0,
            defend_ready_at: 0.0,
            last_hit_at: f64::NEG_INFINITY,
            stun_timer: None,
            respawn_timer: None,
            kills: 0,
            deaths: 0,
            score: 0,
        });
        Ok(id)
    }

    pub fn get(&self, id: EntityId) -> Result<&Entity, Reject> {
        self.ents
            .iter()
            .find(|e| e.id == id)
            .ok_or(Reject::NotFound(id))
    }

    /// Mutable access for the resolver/knockback/respawn code paths.
    /// Crate-internal: external mutation goes through the checked
    /// setters below.
    pub(crate) fn get_mut(&mut self, id: EntityId) -> Result<&mut Entity, Reject> {
        self.ents
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(Reject::NotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.ents.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.ents.iter_mut()
    }

    /// Set health, clamped to `[0, max]`. Rejected on despawned
    /// entities and for non-authoritative callers.
    ///
    /// This is a raw setter: zeroing health here does NOT transition
    /// lifecycle. The Dead transition (with its exactly-once guard
    /// and kill credit) belongs to the combat resolver, which is the
    /// only path that processes deaths.
    pub fn set_health(&mut self, who: ParticipantId, id: EntityId, value: i32) -> Result<(), Reject> {
        self.check_authority(who)?;
        let e = self.get_mut(id)?;
        if e.lifecycle == Lifecycle::Despawned {
            return Err(Reject::InvalidTransition {
                id,
                state: Lifecycle::Despawned,
            });
        }
        e.hp.hp = value;
        e.hp.clamp();
        Ok(())
    }

    /// Transition lifecycle, validating against the transition table.
    pub fn set_lifecycle(
        &mut self,
        who: ParticipantId,
        id: EntityId,
        state: Lifecycle,
    ) -> Result<(), Reject> {
        self.check_authority(who)?;
        let e = self.get_mut(id)?;
        if !can_transition(e.lifecycle, state) {
            return Err(Reject::InvalidTransition {
                id,
                state: e.lifecycle,
            });
        }
        e.lifecycle = state;
        Ok(())
    }

    /// Retire a record. The entry stays in the table as `Despawned`
    /// so scoreboard and win accounting keep seeing it.
    pub fn remove(&mut self, who: ParticipantId, id: EntityId) -> Result<(), Reject> {
        self.check_authority(who)?;
        let e = self.get_mut(id)?;
        if e.lifecycle == Lifecycle::Despawned {
            return Err(Reject::InvalidTransition {
                id,
                state: Lifecycle::Despawned,
            });
        }
        e.lifecycle = Lifecycle::Despawned;
        e.defending = false;
        Ok(())
    }

    /// Ids of damageable entities within `range` of `origin`,
    /// excluding `exclude` by id comparison (so self-overlap never
    /// double-counts). Radius sums as in a circle-vs-circle test.
    #[must_use]
    pub fn query_circle(&self, origin: Vec2, range: f32, exclude: EntityId) -> Vec<EntityId> {
        self.ents
            .iter()
            .filter(|e| e.id != exclude && e.damageable())
            .filter(|e| {
                let r = range + e.radius;
                (e.pos - origin).length_squared() <= r * r
            })
            .map(|e| e.id)
            .collect()
    }

    fn check_authority(&self, who: ParticipantId) -> Result<(), Reject> {
        if who == self.authority {
            Ok(())
        } else {
            Err(Reject::NotAuthorized)
        }
    }
}

/// Lifecycle transition table. Dead is left only via the respawn
/// controller; Despawned is terminal.
#[must_use]
fn can_transition(from: Lifecycle, to: Lifecycle) -> bool {
    use Lifecycle::*;
    match (from, to) {
        (Despawned, _) => false,
        (_, Despawned) => true,
        (Spawning, Alive) => true,
        (Alive, Stunned | Dead) => true,
        (Stunned, Alive | Dead) => true,
        (Dead, RespawnPending | Eliminated) => true,
        (RespawnPending, Alive) => true,
        _ => false,
    }
}
