//! Per-match session: ordered intent queue, tick pipeline, timers,
//! and outbound notifications.
//!
//! One `Session` is constructed per match and passed by reference to
//! whoever drives it; there are no process-wide singletons. All
//! mutations to entities and match state pass through `tick`, one
//! intent at a time, in arrival order.

use std::collections::VecDeque;

use data_runtime::configs::knockback::KnockbackCfg;
use data_runtime::configs::match_rules::MatchRulesCfg;
use data_runtime::configs::weapon::WeaponCfg;
use glam::Vec2;
use net_core::event::Event;

use crate::actor::{EntityId, EntityKind, Lifecycle, ParticipantId};
use crate::clock::SessionClock;
use crate::combat::CombatResolver;
use crate::error::Reject;
use crate::knockback;
use crate::registry::Registry;
use crate::respawn::{DeathOutcome, RespawnController};

/// Payload of a scheduled callback. The dispatch site re-checks
/// entity state before mutating; a stale timer is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Unstun(EntityId),
    Respawn(EntityId),
}

/// A validated-later request from a participant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionIntent {
    Attack { attacker: EntityId, at: f64 },
    Defend { entity: EntityId, active: bool },
    Move {
        entity: EntityId,
        pos: Vec2,
        grounded: bool,
    },
}

impl From<net_core::command::Intent> for SessionIntent {
    fn from(cmd: net_core::command::Intent) -> Self {
        use net_core::command::Intent as Cmd;
        match cmd {
            Cmd::Attack { attacker, at } => SessionIntent::Attack {
                attacker: EntityId(attacker),
                at,
            },
            Cmd::Defend { entity, active } => SessionIntent::Defend {
                entity: EntityId(entity),
                active,
            },
            Cmd::Move {
                entity,
                pos,
                grounded,
            } => SessionIntent::Move {
                entity: EntityId(entity),
                pos: Vec2::new(pos[0], pos[1]),
                grounded,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub rules: MatchRulesCfg,
    pub weapon: WeaponCfg,
    pub knockback: KnockbackCfg,
}

pub struct Session {
    authority: ParticipantId,
    cfg: SessionConfig,
    reg: Registry,
    clock: SessionClock<TimerKind>,
    resolver: CombatResolver,
    respawn: RespawnController,
    queue: VecDeque<(ParticipantId, SessionIntent)>,
    events: Vec<Event>,
    started: bool,
    winner: Option<EntityId>,
}

impl Session {
    #[must_use]
    pub fn new(authority: ParticipantId, cfg: SessionConfig) -> Self {
        let spawn_points = cfg
            .rules
            .spawn_points
            .iter()
            .map(|p| Vec2::new(p[0], p[1]))
            .collect();
        Self {
            authority,
            cfg,
            reg: Registry::new(authority),
            clock: SessionClock::new(),
            resolver: CombatResolver::new(),
            respawn: RespawnController::new(spawn_points),
            queue: VecDeque::new(),
            events: Vec::new(),
            started: false,
            winner: None,
        }
    }

    // ---- authority-side operations -------------------------------

    /// Spawn a player combatant owned by `owner` and place it at its
    /// round-robin spawn point.
    pub fn spawn_player(
        &mut self,
        owner: ParticipantId,
        radius: f32,
        max_hp: i32,
    ) -> Result<EntityId, Reject> {
        self.spawn(EntityKind::Player, owner, radius, max_hp)
    }

    /// Spawn an AI combatant owned by the authority itself.
    pub fn spawn_ai(&mut self, radius: f32, max_hp: i32) -> Result<EntityId, Reject> {
        self.spawn(EntityKind::Ai, self.authority, radius, max_hp)
    }

    fn spawn(
        &mut self,
        kind: EntityKind,
        owner: ParticipantId,
        radius: f32,
        max_hp: i32,
    ) -> Result<EntityId, Reject> {
        let id = self.reg.register(
            self.authority,
            kind,
            owner,
            Vec2::ZERO,
            radius,
            max_hp,
            self.cfg.rules.starting_lives,
        )?;
        let spawn_index = self.reg.get(id)?.spawn_index;
        let point = self.respawn.point_for(spawn_index);
        self.reg.get_mut(id)?.pos = point;
        self.reg.set_lifecycle(self.authority, id, Lifecycle::Alive)?;
        self.events.push(Event::LifecycleChanged {
            entity: id.0,
            state: Lifecycle::Alive.wire(),
        });
        self.events.push(Event::HealthChanged {
            entity: id.0,
            hp: max_hp,
            max: max_hp,
        });
        log::info!("spawned {kind:?} {id:?} at {point} for {owner:?}");
        Ok(id)
    }

    /// Mark the match started. Win evaluation stays off before this
    /// so a lone early joiner is not declared winner.
    pub fn mark_started(&mut self) {
        self.started = true;
    }

    /// Authority-side heal (pickups, scripted regen).
    pub fn heal(&mut self, id: EntityId, amount: i32) -> Result<i32, Reject> {
        let hp = self.resolver.heal(&mut self.reg, id, amount)?;
        let max = self.reg.get(id)?.hp.max;
        self.events.push(Event::HealthChanged {
            entity: id.0,
            hp,
            max,
        });
        Ok(hp)
    }

    /// Retire an entity (participant left). Outstanding timers are
    /// cancelled explicitly so nothing fires against the record.
    pub fn remove(&mut self, id: EntityId) -> Result<(), Reject> {
        let (stun, respawn) = {
            let e = self.reg.get(id)?;
            (e.stun_timer, e.respawn_timer)
        };
        if let Some(t) = stun {
            self.clock.cancel(t);
        }
        if let Some(t) = respawn {
            self.clock.cancel(t);
        }
        self.reg.remove(self.authority, id)?;
        self.events.push(Event::LifecycleChanged {
            entity: id.0,
            state: Lifecycle::Despawned.wire(),
        });
        Ok(())
    }

    /// Session teardown: cancel every outstanding timer.
    pub fn teardown(&mut self) {
        self.clock.cancel_all();
        self.queue.clear();
    }

    // ---- participant boundary ------------------------------------

    /// Enqueue an intent. Validation happens during `tick`, in
    /// arrival order; rejected intents are dropped silently.
    pub fn submit(&mut self, from: ParticipantId, intent: SessionIntent) {
        self.queue.push_back((from, intent));
    }

    /// Run one authoritative step: drain intents, fire due timers,
    /// evaluate the win condition.
    pub fn tick(&mut self, dt: f64) {
        let t0 = std::time::Instant::now();
        while let Some((from, intent)) = self.queue.pop_front() {
            self.process_intent(from, intent);
        }
        for (_token, kind) in self.clock.advance(dt) {
            self.dispatch_timer(kind);
        }
        self.evaluate_win();
        let ms = t0.elapsed().as_secs_f64() * 1000.0;
        metrics::histogram!("session.tick_ms").record(ms);
    }

    /// Drain the outbound notification buffer.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ---- accessors ------------------------------------------------

    #[must_use]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.reg
    }

    pub fn entity(&self, id: EntityId) -> Result<&crate::actor::Entity, Reject> {
        self.reg.get(id)
    }

    #[must_use]
    pub fn winner(&self) -> Option<EntityId> {
        self.winner
    }

    // ---- internals -------------------------------------------------

    fn process_intent(&mut self, from: ParticipantId, intent: SessionIntent) {
        metrics::counter!("session.intents_total").increment(1);
        let subject = match intent {
            SessionIntent::Attack { attacker, .. } => attacker,
            SessionIntent::Defend { entity, .. } | SessionIntent::Move { entity, .. } => entity,
        };
        match self.reg.get(subject) {
            Ok(e) if e.owner == from || from == self.authority => {}
            Ok(_) => {
                metrics::counter!("session.intents_rejected_total", "why" => "not_owner")
                    .increment(1);
                log::debug!("{from:?} is not the owner of {subject:?}; intent dropped");
                return;
            }
            Err(_) => {
                metrics::counter!("session.intents_rejected_total", "why" => "not_found")
                    .increment(1);
                return;
            }
        }
        let now = self.clock.now();
        let result = match intent {
            SessionIntent::Attack { attacker, at } => {
                if now - at > self.cfg.rules.max_intent_age_s {
                    metrics::counter!("session.intents_rejected_total", "why" => "stale")
                        .increment(1);
                    return;
                }
                self.process_attack(attacker, now)
            }
            SessionIntent::Defend { entity, active } => self
                .resolver
                .submit_defend(&mut self.reg, &self.cfg.weapon, now, entity, active),
            SessionIntent::Move {
                entity,
                pos,
                grounded,
            } => self.process_move(entity, pos, grounded),
        };
        if let Err(reject) = result {
            metrics::counter!("session.intents_rejected_total", "why" => "invalid").increment(1);
            log::debug!("intent from {from:?} rejected: {reject}");
        }
    }

    fn process_attack(&mut self, attacker: EntityId, now: f64) -> Result<(), Reject> {
        let hits = self
            .resolver
            .submit_attack(&mut self.reg, &self.cfg.weapon, now, attacker)?;
        for ev in hits {
            self.events.push(Event::DamageDealt {
                event_id: ev.event_id,
                attacker: ev.attacker.0,
                target: ev.target.0,
                amount: ev.amount,
                fatal: ev.fatal,
            });
            let max = self.reg.get(ev.target).map(|e| e.hp.max).unwrap_or(0);
            self.events.push(Event::HealthChanged {
                entity: ev.target.0,
                hp: ev.hp_after,
                max,
            });
            if ev.fatal {
                self.process_death(ev.target);
            } else if !ev.defended {
                // Blocked hits take (quartered) damage but no impulse.
                let source = self.reg.get(ev.attacker).map(|a| a.pos).unwrap_or(Vec2::ZERO);
                if let Ok(Some(out)) = knockback::apply_knockback(
                    &mut self.reg,
                    &mut self.clock,
                    &self.cfg.knockback,
                    ev.target,
                    source,
                ) {
                    self.events.push(Event::KnockbackApplied {
                        entity: out.entity.0,
                        dir: [out.dir.x, out.dir.y],
                        force: out.force,
                        duration: out.duration_s,
                    });
                    self.events.push(Event::LifecycleChanged {
                        entity: out.entity.0,
                        state: Lifecycle::Stunned.wire(),
                    });
                }
            }
        }
        Ok(())
    }

    fn process_death(&mut self, id: EntityId) {
        // The stun timer (if any) must not fire against the corpse.
        if let Ok(e) = self.reg.get(id) {
            if let Some(t) = e.stun_timer {
                self.clock.cancel(t);
            }
        }
        if let Ok(e) = self.reg.get_mut(id) {
            e.stun_timer = None;
        }
        self.events.push(Event::LifecycleChanged {
            entity: id.0,
            state: Lifecycle::Dead.wire(),
        });
        match self
            .respawn
            .on_death(&mut self.reg, &mut self.clock, &self.cfg.rules, id)
        {
            Ok(DeathOutcome::RespawnScheduled { eta_s }) => {
                self.events.push(Event::RespawnScheduled {
                    entity: id.0,
                    eta_s,
                });
                self.events.push(Event::LifecycleChanged {
                    entity: id.0,
                    state: Lifecycle::RespawnPending.wire(),
                });
            }
            Ok(DeathOutcome::Eliminated) => {
                metrics::counter!("session.eliminations_total").increment(1);
                self.events.push(Event::LifecycleChanged {
                    entity: id.0,
                    state: Lifecycle::Eliminated.wire(),
                });
            }
            Err(reject) => {
                // Death processing raced a removal; nothing to do.
                log::debug!("death processing for {id:?} skipped: {reject}");
            }
        }
    }

    fn process_move(&mut self, entity: EntityId, pos: Vec2, grounded: bool) -> Result<(), Reject> {
        let e = self.reg.get(entity)?;
        if !e.can_act() {
            // Stunned/dead entities are authority-positioned.
            return Err(Reject::InvalidTransition {
                id: entity,
                state: e.lifecycle,
            });
        }
        let e = self.reg.get_mut(entity)?;
        e.pos = pos;
        e.grounded = grounded;
        Ok(())
    }

    fn dispatch_timer(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Unstun(id) => {
                if let Some(state) = knockback::on_unstun(&mut self.reg, id) {
                    self.events.push(Event::LifecycleChanged {
                        entity: id.0,
                        state: state.wire(),
                    });
                }
            }
            TimerKind::Respawn(id) => {
                if self.respawn.on_respawn_timer(&mut self.reg, id).is_some() {
                    let (hp, max) = self
                        .reg
                        .get(id)
                        .map(|e| (e.hp.hp, e.hp.max))
                        .unwrap_or((0, 0));
                    self.events.push(Event::LifecycleChanged {
                        entity: id.0,
                        state: Lifecycle::Alive.wire(),
                    });
                    self.events.push(Event::HealthChanged {
                        entity: id.0,
                        hp,
                        max,
                    });
                }
            }
        }
    }

    fn evaluate_win(&mut self) {
        if self.winner.is_some() {
            return;
        }
        if let Some(winner) =
            RespawnController::evaluate_win(&self.reg, &self.cfg.rules, self.started)
        {
            self.winner = Some(winner);
            self.events.push(Event::MatchEnded { winner: winner.0 });
            log::info!("match ended; winner {winner:?}");
        }
    }
}
