use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Relative weight of each factor in a side's combined score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub team_strength: f64,
    pub player_impact: f64,
    pub injury: f64,
    pub head_to_head: f64,
    pub home_away: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            team_strength: 0.40,
            player_impact: 0.25,
            injury: 0.15,
            head_to_head: 0.10,
            home_away: 0.10,
        }
    }
}

impl Weights {
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.team_strength,
            self.player_impact,
            self.injury,
            self.head_to_head,
            self.home_away,
        ]
    }

    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Lookback windows, counted in matches (or meetings for head-to-head).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSizes {
    pub team: usize,
    pub player: usize,
    pub head_to_head: usize,
    pub home_away: usize,
}

impl Default for WindowSizes {
    fn default() -> Self {
        Self {
            team: 10,
            player: 20,
            head_to_head: 10,
            home_away: 10,
        }
    }
}

/// `p_draw = max(floor, base - |score_home - score_away|)` before renormalising.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawHeuristic {
    pub base: f64,
    pub floor: f64,
}

impl Default for DrawHeuristic {
    fn default() -> Self {
        Self {
            base: 0.30,
            floor: 0.10,
        }
    }
}

/// Priors used when a team has no history at a venue, plus the flat home bonus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeAwayPriors {
    pub home_default: f64,
    pub away_default: f64,
    pub home_bonus: f64,
}

impl Default for HomeAwayPriors {
    fn default() -> Self {
        Self {
            home_default: 0.6,
            away_default: 0.4,
            home_bonus: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: Weights,
    pub windows: WindowSizes,
    pub draw: DrawHeuristic,
    pub home_away: HomeAwayPriors,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = self.weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::Invalid(format!(
                "weights must be finite and non-negative, got {weights:?}"
            )));
        }
        let total = self.weights.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::Invalid(format!(
                "weights must sum to 1.0, got {total}"
            )));
        }

        let w = self.windows;
        if w.team == 0 || w.player == 0 || w.head_to_head == 0 || w.home_away == 0 {
            return Err(ConfigError::Invalid(
                "lookback windows must be at least one match".to_string(),
            ));
        }

        let d = self.draw;
        if !d.base.is_finite() || !d.floor.is_finite() || d.floor <= 0.0 || d.floor > d.base {
            return Err(ConfigError::Invalid(format!(
                "draw heuristic needs 0 < floor <= base, got floor={} base={}",
                d.floor, d.base
            )));
        }

        let h = self.home_away;
        for (name, v) in [
            ("home_default", h.home_default),
            ("away_default", h.away_default),
            ("home_bonus", h.home_bonus),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::Invalid(format!(
                    "home_away.{name} must lie in [0, 1], got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Reads a JSON config; missing fields fall back to defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg = serde_json::from_str::<EngineConfig>(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Applies `FORECAST_*_WINDOW` overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Each window variable is applied on its own. A value that does not parse
    /// as a positive integer is logged and skipped, leaving that window as it
    /// was while the other overrides still apply.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let targets = [
            ("FORECAST_TEAM_WINDOW", &mut self.windows.team),
            ("FORECAST_PLAYER_WINDOW", &mut self.windows.player),
            ("FORECAST_H2H_WINDOW", &mut self.windows.head_to_head),
            ("FORECAST_HOME_AWAY_WINDOW", &mut self.windows.home_away),
        ];
        for (key, slot) in targets {
            let Some(raw) = lookup(key) else {
                continue;
            };
            match parse_window(&raw) {
                Some(window) => *slot = window,
                None => warn!(
                    key,
                    value = %raw,
                    kept = *slot,
                    "ignoring window override, expected a positive integer"
                ),
            }
        }
        self
    }
}

fn parse_window(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|w| *w > 0)
}
