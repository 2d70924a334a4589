//! Participant->Authority intents (unvalidated requests).
//! Minimal binary encoding with a leading tag distinct from events.

use crate::wire::{take_f32, take_f64, take_u32, take_u8, WireDecode, WireEncode};

pub const TAG_INTENT: u8 = 0xC1;

/// An unvalidated request from a participant. The authority validates
/// each intent against current entity state and may reject it silently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Attack attempt by the given entity at the given send time.
    Attack { attacker: u32, at: f64 },
    /// Raise or lower the defend stance of the given entity.
    Defend { entity: u32, active: bool },
    /// Presentation-only movement mirror (position + grounded flag).
    /// Combat logic never gates on this; the position feeds the
    /// spatial hit test.
    Move {
        entity: u32,
        pos: [f32; 2],
        grounded: bool,
    },
}

impl WireEncode for Intent {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(TAG_INTENT);
        match self {
            Intent::Attack { attacker, at } => {
                out.push(0);
                out.extend_from_slice(&attacker.to_le_bytes());
                out.extend_from_slice(&at.to_le_bytes());
            }
            Intent::Defend { entity, active } => {
                out.push(1);
                out.extend_from_slice(&entity.to_le_bytes());
                out.push(u8::from(*active));
            }
            Intent::Move {
                entity,
                pos,
                grounded,
            } => {
                out.push(2);
                out.extend_from_slice(&entity.to_le_bytes());
                for c in pos {
                    out.extend_from_slice(&c.to_le_bytes());
                }
                out.push(u8::from(*grounded));
            }
        }
    }
}

impl WireDecode for Intent {
    fn decode(inp: &mut &[u8]) -> anyhow::Result<Self> {
        let tag = take_u8(inp)?;
        if tag != TAG_INTENT {
            anyhow::bail!("not an intent tag");
        }
        match take_u8(inp)? {
            0 => {
                let attacker = take_u32(inp)?;
                let at = take_f64(inp)?;
                Ok(Intent::Attack { attacker, at })
            }
            1 => {
                let entity = take_u32(inp)?;
                let active = take_u8(inp)? != 0;
                Ok(Intent::Defend { entity, active })
            }
            2 => {
                let entity = take_u32(inp)?;
                let x = take_f32(inp)?;
                let y = take_f32(inp)?;
                let grounded = take_u8(inp)? != 0;
                Ok(Intent::Move {
                    entity,
                    pos: [x, y],
                    grounded,
                })
            }
            k => anyhow::bail!("unknown intent kind {k}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_roundtrip() {
        let cmd = Intent::Attack {
            attacker: 7,
            at: 1.25,
        };
        let mut buf = Vec::new();
        cmd.encode(&mut buf);
        let mut slice = &buf[..];
        let back = Intent::decode(&mut slice).unwrap();
        assert_eq!(back, cmd);
        assert!(slice.is_empty());
    }

    #[test]
    fn wrong_tag_rejected() {
        let buf = vec![0xE1u8, 0, 0, 0, 0];
        let mut slice = &buf[..];
        assert!(Intent::decode(&mut slice).is_err());
    }
}
