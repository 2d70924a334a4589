//! Knockback and stun: displacement impulse + timed action lock.
//!
//! A knockback request against an already stunned target is dropped,
//! not queued; the unstun timer keeps the duration of the first hit.
//! The displacement direction gets a minimum upward component so a
//! grounded target separates instead of sliding along the floor.

use data_runtime::configs::knockback::KnockbackCfg;
use glam::Vec2;

use crate::actor::{EntityId, Lifecycle};
use crate::clock::SessionClock;
use crate::error::Reject;
use crate::registry::Registry;
use crate::session::TimerKind;

/// Outcome of an accepted knockback, for notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnockbackOutcome {
    pub entity: EntityId,
    pub dir: Vec2,
    pub force: f32,
    pub duration_s: f32,
}

/// Apply a knockback from `source_pos` against `target`.
///
/// Returns `Ok(None)` when the request is dropped (target already
/// stunned, or not in a hittable state); errors only for unknown ids.
pub fn apply_knockback(
    reg: &mut Registry,
    clock: &mut SessionClock<TimerKind>,
    cfg: &KnockbackCfg,
    target: EntityId,
    source_pos: Vec2,
) -> Result<Option<KnockbackOutcome>, Reject> {
    let t = reg.get(target)?;
    if t.lifecycle != Lifecycle::Alive {
        // No stacking while Stunned; dead/respawning targets are
        // dropped too.
        return Ok(None);
    }
    let mut dir = (t.pos - source_pos).normalize_or_zero();
    if dir == Vec2::ZERO {
        // Exact overlap: push straight up.
        dir = Vec2::Y;
    }
    if dir.y < cfg.min_lift {
        // Pin the vertical component at the lift floor and rescale
        // the horizontal one so the direction stays unit length.
        let y = cfg.min_lift.min(1.0);
        let x = (1.0 - y * y).sqrt().copysign(dir.x);
        dir = Vec2::new(x, y);
    }
    let token = clock.after(f64::from(cfg.duration_s), TimerKind::Unstun(target));
    let t = reg.get_mut(target)?;
    t.pos += dir * cfg.force;
    t.lifecycle = Lifecycle::Stunned;
    t.grounded = false;
    t.stun_timer = Some(token);
    Ok(Some(KnockbackOutcome {
        entity: target,
        dir,
        force: cfg.force,
        duration_s: cfg.duration_s,
    }))
}

/// Unstun callback. Fires via the session clock; only restores an
/// entity that is still Stunned (not dead, not despawned).
pub fn on_unstun(reg: &mut Registry, target: EntityId) -> Option<Lifecycle> {
    let e = reg.get_mut(target).ok()?;
    e.stun_timer = None;
    if e.lifecycle == Lifecycle::Stunned {
        e.lifecycle = Lifecycle::Alive;
        Some(Lifecycle::Alive)
    } else {
        None
    }
}
