use crate::config::HomeAwayPriors;
use crate::model::{HomeAwaySplit, Venue};

use super::clamp;

/// Form at the given venue over the recent window.
///
/// With no history the venue prior applies (0.6 home, 0.4 away by default).
/// Otherwise win rate carries 70% and goal margin 30%; the home side gets a
/// flat bonus on top.
pub fn home_away_factor(
    split: Option<&HomeAwaySplit>,
    venue: Venue,
    priors: &HomeAwayPriors,
) -> f64 {
    let Some(s) = split else {
        return match venue {
            Venue::Home => priors.home_default,
            Venue::Away => priors.away_default,
        };
    };

    let goal_diff = clamp((s.avg_goals_scored - s.avg_goals_conceded + 2.0) / 4.0, 0.0, 1.0);
    let base = 0.7 * s.win_rate + 0.3 * goal_diff;
    let bonus = match venue {
        Venue::Home => priors.home_bonus,
        Venue::Away => 0.0,
    };
    clamp(base + bonus, 0.0, 1.0)
}
