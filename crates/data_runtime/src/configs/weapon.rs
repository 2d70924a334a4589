//! Weapon/defense tuning loaded from data/config/weapon.toml.

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WeaponCfg {
    pub damage: i32,
    /// Circular hit-test radius around the attack origin, meters.
    pub range_m: f32,
    pub attack_cooldown_s: f32,
    /// Cooldown armed when a defend stance ends.
    pub defense_cooldown_s: f32,
    /// Damage taken while defending is `floor(raw / divisor)`.
    pub defense_divisor: i32,
    /// Minimum interval between successive hits landing on the same
    /// target, seconds. Zero disables the gate.
    pub hit_stun_s: f32,
}

impl Default for WeaponCfg {
    fn default() -> Self {
        Self {
            damage: 25,
            range_m: 1.0,
            attack_cooldown_s: 0.5,
            defense_cooldown_s: 2.0,
            defense_divisor: 4,
            hit_stun_s: 0.0,
        }
    }
}

pub fn load_default() -> Result<WeaponCfg> {
    let path = crate::data_root().join("config/weapon.toml");
    if path.is_file() {
        let txt = std::fs::read_to_string(&path)
            .with_context(|| format!("read {}", path.display()))?;
        toml::from_str::<WeaponCfg>(&txt).context("parse weapon TOML")
    } else {
        Ok(WeaponCfg::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: WeaponCfg = toml::from_str("damage = 40").unwrap();
        assert_eq!(cfg.damage, 40);
        assert_eq!(cfg.defense_divisor, 4);
    }
}
