//! Match rules loaded from data/config/match_rules.toml with env overrides.

use anyhow::{Context, Result};
use serde::Deserialize;

/// How a match is decided. The source material shipped both models;
/// the mode is data, not code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinMode {
    /// Match ends when exactly one non-eliminated entity remains.
    LastStanding,
    /// Match ends when any entity's score reaches `score_to_win`.
    ScoreThreshold,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchRulesCfg {
    /// Respawns granted after the initial spawn (2 => three lives total).
    pub starting_lives: i32,
    /// Delay between death and respawn placement, seconds.
    pub respawn_delay_s: f32,
    pub win: WinMode,
    /// Only consulted when `win = "score_threshold"`.
    pub score_to_win: i32,
    /// Intents older than this are dropped silently as stale.
    pub max_intent_age_s: f64,
    /// Spawn points, assigned round-robin by session-stable entity index.
    pub spawn_points: Vec<[f32; 2]>,
}

impl Default for MatchRulesCfg {
    fn default() -> Self {
        Self {
            starting_lives: 2,
            respawn_delay_s: 3.0,
            win: WinMode::LastStanding,
            score_to_win: 700,
            max_intent_age_s: 1.0,
            spawn_points: vec![[-6.0, 0.0], [6.0, 0.0], [0.0, 4.0], [0.0, -4.0]],
        }
    }
}

pub fn load_default() -> Result<MatchRulesCfg> {
    let path = crate::data_root().join("config/match_rules.toml");
    let mut cfg = if path.is_file() {
        let txt = std::fs::read_to_string(&path)
            .with_context(|| format!("read {}", path.display()))?;
        toml::from_str::<MatchRulesCfg>(&txt).context("parse match_rules TOML")?
    } else {
        MatchRulesCfg::default()
    };
    if let Some(lives) = std::env::var("STARTING_LIVES")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        cfg.starting_lives = lives;
    }
    if let Some(delay) = std::env::var("RESPAWN_DELAY_S")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        cfg.respawn_delay_s = delay;
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = MatchRulesCfg::default();
        assert_eq!(cfg.starting_lives, 2);
        assert_eq!(cfg.win, WinMode::LastStanding);
        assert!(!cfg.spawn_points.is_empty());
    }

    #[test]
    fn parses_score_mode() {
        let cfg: MatchRulesCfg = toml::from_str(
            r#"
            win = "score_threshold"
            score_to_win = 500
            "#,
        )
        .unwrap();
        assert_eq!(cfg.win, WinMode::ScoreThreshold);
        assert_eq!(cfg.score_to_win, 500);
        // Unspecified fields keep defaults
        assert_eq!(cfg.starting_lives, 2);
    }
}
