//! Respawn and lives: death bookkeeping, spawn-point assignment,
//! elimination, and win evaluation.
//!
//! Per entity: `Alive -> Dead -> (RespawnPending -> Alive) | Eliminated`.
//! Lives only ever decrease outside a match reset; once negative the
//! entity is permanently eliminated.

use data_runtime::configs::match_rules::{MatchRulesCfg, WinMode};
use glam::Vec2;

use crate::actor::{EntityId, Lifecycle};
use crate::clock::SessionClock;
use crate::error::Reject;
use crate::registry::Registry;
use crate::session::TimerKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeathOutcome {
    RespawnScheduled { eta_s: f32 },
    Eliminated,
}

#[derive(Debug)]
pub struct RespawnController {
    spawn_points: Vec<Vec2>,
}

impl RespawnController {
    #[must_use]
    pub fn new(spawn_points: Vec<Vec2>) -> Self {
        let spawn_points = if spawn_points.is_empty() {
            // A match with no configured points still has to place
            // respawns somewhere.
            vec![Vec2::ZERO]
        } else {
            spawn_points
        };
        Self { spawn_points }
    }

    /// Process a death: decrement lives, then either schedule a
    /// respawn or eliminate. Only valid on an entity already Dead.
    pub fn on_death(
        &self,
        reg: &mut Registry,
        clock: &mut SessionClock<TimerKind>,
        cfg: &MatchRulesCfg,
        id: EntityId,
    ) -> Result<DeathOutcome, Reject> {
        let e = reg.get(id)?;
        if e.lifecycle != Lifecycle::Dead {
            return Err(Reject::InvalidTransition {
                id,
                state: e.lifecycle,
            });
        }
        let lives = e.lives - 1;
        if lives >= 0 {
            let token = clock.after(f64::from(cfg.respawn_delay_s), TimerKind::Respawn(id));
            let e = reg.get_mut(id)?;
            e.lives = lives;
            e.lifecycle = Lifecycle::RespawnPending;
            e.respawn_timer = Some(token);
            log::info!("entity {id:?} died; {lives} lives left, respawn in {}s", cfg.respawn_delay_s);
            Ok(DeathOutcome::RespawnScheduled {
                eta_s: cfg.respawn_delay_s,
            })
        } else {
            let e = reg.get_mut(id)?;
            e.lives = lives;
            e.lifecycle = Lifecycle::Eliminated;
            log::info!("entity {id:?} eliminated");
            Ok(DeathOutcome::Eliminated)
        }
    }

    /// Respawn callback. Fires via the session clock; places the
    /// entity only if it is still RespawnPending.
    pub fn on_respawn_timer(&self, reg: &mut Registry, id: EntityId) -> Option<Vec2> {
        let e = reg.get_mut(id).ok()?;
        e.respawn_timer = None;
        if e.lifecycle != Lifecycle::RespawnPending {
            return None;
        }
        let point = self.spawn_points[e.spawn_index % self.spawn_points.len()];
        e.pos = point;
        e.hp.hp = e.hp.max;
        e.lifecycle = Lifecycle::Alive;
        e.defending = false;
        e.grounded = true;
        e.death_processed = false;
        Some(point)
    }

    /// Spawn point for an entity's first placement (same round-robin
    /// policy as respawns).
    #[must_use]
    pub fn point_for(&self, spawn_index: usize) -> Vec2 {
        self.spawn_points[spawn_index % self.spawn_points.len()]
    }

    /// Evaluate the win condition. Returns the winner once it is
    /// decided; never before the match has been marked started.
    #[must_use]
    pub fn evaluate_win(reg: &Registry, cfg: &MatchRulesCfg, started: bool) -> Option<EntityId> {
        if !started {
            return None;
        }
        match cfg.win {
            WinMode::LastStanding => {
                let mut standing = reg.iter().filter(|e| {
                    !matches!(e.lifecycle, Lifecycle::Eliminated | Lifecycle::Despawned)
                });
                let first = standing.next()?;
                if standing.next().is_none() {
                    Some(first.id)
                } else {
                    None
                }
            }
            WinMode::ScoreThreshold => reg
                .iter()
                .find(|e| e.score >= cfg.score_to_win)
                .map(|e| e.id),
        }
    }
}
