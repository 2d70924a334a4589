//! Knockback/stun tuning loaded from data/config/knockback.toml.

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct KnockbackCfg {
    /// Instantaneous displacement magnitude, meters.
    pub force: f32,
    /// Stun duration following a knockback, seconds.
    pub duration_s: f32,
    /// Minimum upward component of the displacement direction.
    /// Clamping up keeps a grounded target from sliding along the
    /// floor instead of separating.
    pub min_lift: f32,
}

impl Default for KnockbackCfg {
    fn default() -> Self {
        Self {
            force: 1.5,
            duration_s: 0.5,
            min_lift: 0.35,
        }
    }
}

pub fn load_default() -> Result<KnockbackCfg> {
    let path = crate::data_root().join("config/knockback.toml");
    if path.is_file() {
        let txt = std::fs::read_to_string(&path)
            .with_context(|| format!("read {}", path.display()))?;
        toml::from_str::<KnockbackCfg>(&txt).context("parse knockback TOML")
    } else {
        Ok(KnockbackCfg::default())
    }
}
