//! Combat resolver: attack/defend validation and damage application.
//!
//! Attacks resolve as a circular hit test around the attacker against
//! every damageable non-self entity in range. Each hit produces one
//! `DamageEvent` with a session-unique id; applying an id twice is a
//! silent no-op so duplicate delivery cannot double-mutate health.

use std::collections::HashSet;

use data_runtime::configs::weapon::WeaponCfg;

use crate::actor::{EntityId, Lifecycle};
use crate::error::Reject;
use crate::registry::Registry;

/// Resolved outcome of one hit. Doubles as the audit record for
/// at-most-once application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub event_id: u64,
    pub attacker: EntityId,
    pub target: EntityId,
    pub raw: i32,
    pub defended: bool,
    /// Final damage after the defense modifier.
    pub amount: i32,
    pub hp_after: i32,
    pub fatal: bool,
}

#[derive(Debug, Default)]
pub struct CombatResolver {
    next_event_id: u64,
    applied: HashSet<u64>,
}

impl CombatResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and resolve an attack at session time `now`.
    ///
    /// Rejected while Dead/Stunned/Defending and while the attack
    /// cooldown runs. Acceptance arms the cooldown before the hit
    /// test, so a rejected swing never consumes it.
    pub fn submit_attack(
        &mut self,
        reg: &mut Registry,
        cfg: &WeaponCfg,
        now: f64,
        attacker: EntityId,
    ) -> Result<Vec<DamageEvent>, Reject> {
        let (origin, ready_at) = {
            let a = reg.get(attacker)?;
            if !a.can_act() {
                return Err(Reject::InvalidTransition {
                    id: attacker,
                    state: a.lifecycle,
                });
            }
            if a.defending {
                return Err(Reject::InvalidTransition {
                    id: attacker,
                    state: a.lifecycle,
                });
            }
            (a.pos, a.attack_ready_at)
        };
        if now < ready_at {
            #[allow(clippy::cast_possible_truncation)]
            return Err(Reject::OnCooldown {
                ready_in_s: (ready_at - now) as f32,
            });
        }
        reg.get_mut(attacker)?.attack_ready_at = now + f64::from(cfg.attack_cooldown_s);

        let mut events = Vec::new();
        for target in reg.query_circle(origin, cfg.range_m, attacker) {
            let (defending, last_hit_at) = {
                let t = reg.get(target)?;
                (t.defending, t.last_hit_at)
            };
            if cfg.hit_stun_s > 0.0 && now - last_hit_at < f64::from(cfg.hit_stun_s) {
                continue;
            }
            let amount = if defending {
                cfg.damage / cfg.defense_divisor.max(1)
            } else {
                cfg.damage
            };
            let mut ev = DamageEvent {
                event_id: self.fresh_event_id(),
                attacker,
                target,
                raw: cfg.damage,
                defended: defending,
                amount,
                hp_after: 0,
                fatal: false,
            };
            if self.apply(reg, now, &mut ev) {
                events.push(ev);
            }
        }
        Ok(events)
    }

    /// Apply a damage event at most once per event id. Returns true
    /// if health was mutated; duplicates and dead targets return
    /// false with no state change.
    pub fn apply(&mut self, reg: &mut Registry, now: f64, ev: &mut DamageEvent) -> bool {
        if !self.applied.insert(ev.event_id) {
            log::debug!("duplicate damage event {} dropped", ev.event_id);
            return false;
        }
        // Re-fetch by id; never act on a stale copy.
        let Ok(t) = reg.get_mut(ev.target) else {
            return false;
        };
        if !t.damageable() {
            return false;
        }
        t.hp.hp = (t.hp.hp - ev.amount).max(0);
        t.hp.clamp();
        t.last_hit_at = now;
        ev.hp_after = t.hp.hp;
        // A hit landing the same tick health reaches exactly 0 is a
        // kill, not a no-op. The flag makes the Dead transition fire
        // exactly once.
        if t.hp.hp == 0 && !t.death_processed {
            t.death_processed = true;
            t.lifecycle = Lifecycle::Dead;
            t.defending = false;
            t.deaths += 1;
            ev.fatal = true;
        }
        if let Ok(a) = reg.get_mut(ev.attacker) {
            a.score += ev.amount;
            if ev.fatal {
                a.kills += 1;
            }
        }
        true
    }

    /// Toggle the defend stance. Rejected while Dead or Stunned;
    /// releasing the stance arms the defense cooldown.
    pub fn submit_defend(
        &mut self,
        reg: &mut Registry,
        cfg: &WeaponCfg,
        now: f64,
        entity: EntityId,
        active: bool,
    ) -> Result<(), Reject> {
        let e = reg.get(entity)?;
        if !e.can_act() {
            return Err(Reject::InvalidTransition {
                id: entity,
                state: e.lifecycle,
            });
        }
        if active {
            if e.defending {
                return Ok(());
            }
            if now < e.defend_ready_at {
                #[allow(clippy::cast_possible_truncation)]
                return Err(Reject::OnCooldown {
                    ready_in_s: (e.defend_ready_at - now) as f32,
                });
            }
            reg.get_mut(entity)?.defending = true;
        } else if e.defending {
            let e = reg.get_mut(entity)?;
            e.defending = false;
            e.defend_ready_at = now + f64::from(cfg.defense_cooldown_s);
        }
        Ok(())
    }

    /// Heal, clamped to max health. Dead entities are not healed.
    pub fn heal(&mut self, reg: &mut Registry, entity: EntityId, amount: i32) -> Result<i32, Reject> {
        let e = reg.get(entity)?;
        if !e.damageable() {
            return Err(Reject::InvalidTransition {
                id: entity,
                state: e.lifecycle,
            });
        }
        let e = reg.get_mut(entity)?;
        e.hp.hp += amount.max(0);
        e.hp.clamp();
        Ok(e.hp.hp)
    }

    fn fresh_event_id(&mut self) -> u64 {
        self.next_event_id = self.next_event_id.wrapping_add(1);
        self.next_event_id
    }
}
