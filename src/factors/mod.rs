//! Normalisers that turn provider aggregates into factors in `[0, 1]`.
//!
//! Every calculator is a pure function of its snapshot and has a defined
//! fallback for missing data, so none of them can fail.

pub mod head_to_head;
pub mod home_away;
pub mod injury;
pub mod player_impact;
pub mod team_strength;

pub use head_to_head::{away_head_to_head, head_to_head_factor};
pub use home_away::home_away_factor;
pub use injury::{injury_factor, severity_weight};
pub use player_impact::{player_impact, player_raw_impact};
pub use team_strength::team_strength;

/// Returned when there is not enough data to say anything about a team.
pub const NEUTRAL: f64 = 0.5;

/// Clamp that maps NaN onto `lo` instead of propagating it.
pub(crate) fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}
