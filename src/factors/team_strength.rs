use crate::model::TeamStatsSnapshot;

use super::{NEUTRAL, clamp};

const GOAL_DIFF_SPAN: f64 = 3.0;
const SHOTS_ON_TARGET_CAP: f64 = 10.0;
const MAX_CARDS_PENALTY: f64 = 0.3;

/// Team form over the recent window.
///
/// Goal difference carries 40% (a per-match differential of -3..+3 maps onto
/// 0..1), shots on target, possession and clean sheets 20% each. Discipline is
/// subtracted, capped at 0.3 so cards alone cannot sink a side.
pub fn team_strength(stats: Option<&TeamStatsSnapshot>) -> f64 {
    let Some(s) = stats else {
        return NEUTRAL;
    };
    if s.games_count == 0 {
        return NEUTRAL;
    }

    let goal_diff = clamp(
        (s.goals_for_avg - s.goals_against_avg + GOAL_DIFF_SPAN) / (2.0 * GOAL_DIFF_SPAN),
        0.0,
        1.0,
    );
    let shots = clamp(s.shots_on_target_avg / SHOTS_ON_TARGET_CAP, 0.0, 1.0);
    let possession = s.possession_avg / 100.0;
    let clean_sheets = s.clean_sheet_pct / 100.0;
    let cards_penalty = clamp(
        (s.yellow_cards_avg + 3.0 * s.red_cards_avg) / 10.0,
        0.0,
        MAX_CARDS_PENALTY,
    );

    clamp(
        0.4 * goal_diff + 0.2 * shots + 0.2 * possession + 0.2 * clean_sheets - cards_penalty,
        0.0,
        1.0,
    )
}
