//! Authority->Participant notices (authoritative state changes).
//!
//! These are what the excluded rendering/input/UI layer consumes to
//! stay in sync with the match. Same codec style as `command`.

use crate::wire::{take_f32, take_i32, take_u32, take_u64, take_u8, WireDecode, WireEncode};

pub const TAG_EVENT: u8 = 0xE1;

/// Lifecycle states on the wire. Mirrors `server_core::actor::Lifecycle`.
pub const LIFECYCLE_SPAWNING: u8 = 0;
pub const LIFECYCLE_ALIVE: u8 = 1;
pub const LIFECYCLE_STUNNED: u8 = 2;
pub const LIFECYCLE_DEAD: u8 = 3;
pub const LIFECYCLE_RESPAWN_PENDING: u8 = 4;
pub const LIFECYCLE_ELIMINATED: u8 = 5;
pub const LIFECYCLE_DESPAWNED: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    HealthChanged {
        entity: u32,
        hp: i32,
        max: i32,
    },
    LifecycleChanged {
        entity: u32,
        state: u8,
    },
    /// Resolved damage record; also the audit line for idempotent
    /// delivery (event ids are unique per session).
    DamageDealt {
        event_id: u64,
        attacker: u32,
        target: u32,
        amount: i32,
        fatal: bool,
    },
    KnockbackApplied {
        entity: u32,
        dir: [f32; 2],
        force: f32,
        duration: f32,
    },
    RespawnScheduled {
        entity: u32,
        eta_s: f32,
    },
    MatchEnded {
        winner: u32,
    },
}

impl WireEncode for Event {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(TAG_EVENT);
        match self {
            Event::HealthChanged { entity, hp, max } => {
                out.push(0);
                out.extend_from_slice(&entity.to_le_bytes());
                out.extend_from_slice(&hp.to_le_bytes());
                out.extend_from_slice(&max.to_le_bytes());
            }
            Event::LifecycleChanged { entity, state } => {
                out.push(1);
                out.extend_from_slice(&entity.to_le_bytes());
                out.push(*state);
            }
            Event::DamageDealt {
                event_id,
                attacker,
                target,
                amount,
                fatal,
            } => {
                out.push(2);
                out.extend_from_slice(&event_id.to_le_bytes());
                out.extend_from_slice(&attacker.to_le_bytes());
                out.extend_from_slice(&target.to_le_bytes());
                out.extend_from_slice(&amount.to_le_bytes());
                out.push(u8::from(*fatal));
            }
            Event::KnockbackApplied {
                entity,
                dir,
                force,
                duration,
            } => {
                out.push(3);
                out.extend_from_slice(&entity.to_le_bytes());
                for c in dir {
                    out.extend_from_slice(&c.to_le_bytes());
                }
                out.extend_from_slice(&force.to_le_bytes());
                out.extend_from_slice(&duration.to_le_bytes());
            }
            Event::RespawnScheduled { entity, eta_s } => {
                out.push(4);
                out.extend_from_slice(&entity.to_le_bytes());
                out.extend_from_slice(&eta_s.to_le_bytes());
            }
            Event::MatchEnded { winner } => {
                out.push(5);
                out.extend_from_slice(&winner.to_le_bytes());
            }
        }
    }
}

impl WireDecode for Event {
    fn decode(inp: &mut &[u8]) -> anyhow::Result<Self> {
        let tag = take_u8(inp)?;
        if tag != TAG_EVENT {
            anyhow::bail!("not an event tag");
        }
        match take_u8(inp)? {
            0 => Ok(Event::HealthChanged {
                entity: take_u32(inp)?,
                hp: take_i32(inp)?,
                max: take_i32(inp)?,
            }),
            1 => Ok(Event::LifecycleChanged {
                entity: take_u32(inp)?,
                state: take_u8(inp)?,
            }),
            2 => Ok(Event::DamageDealt {
                event_id: take_u64(inp)?,
                attacker: take_u32(inp)?,
                target: take_u32(inp)?,
                amount: take_i32(inp)?,
                fatal: take_u8(inp)? != 0,
            }),
            3 => {
                let entity = take_u32(inp)?;
                let dx = take_f32(inp)?;
                let dy = take_f32(inp)?;
                Ok(Event::KnockbackApplied {
                    entity,
                    dir: [dx, dy],
                    force: take_f32(inp)?,
                    duration: take_f32(inp)?,
                })
            }
            4 => Ok(Event::RespawnScheduled {
                entity: take_u32(inp)?,
                eta_s: take_f32(inp)?,
            }),
            5 => Ok(Event::MatchEnded {
                winner: take_u32(inp)?,
            }),
            k => anyhow::bail!("unknown event kind {k}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_dealt_roundtrip() {
        let ev = Event::DamageDealt {
            event_id: 42,
            attacker: 1,
            target: 2,
            amount: 25,
            fatal: true,
        };
        let mut buf = Vec::new();
        ev.encode(&mut buf);
        let mut slice = &buf[..];
        assert_eq!(Event::decode(&mut slice).unwrap(), ev);
        assert!(slice.is_empty());
    }

    #[test]
    fn short_read_is_error_not_panic() {
        let ev = Event::MatchEnded { winner: 9 };
        let mut buf = Vec::new();
        ev.encode(&mut buf);
        let mut slice = &buf[..buf.len() - 1];
        assert!(Event::decode(&mut slice).is_err());
    }
}
