use crate::model::HeadToHeadSummary;

use super::{NEUTRAL, clamp};

/// Historical dominance of A over B, from A's side of the summary.
pub fn head_to_head_factor(summary: Option<&HeadToHeadSummary>) -> f64 {
    let Some(h) = summary else {
        return NEUTRAL;
    };
    if h.total_meetings == 0 {
        return NEUTRAL;
    }

    let win_rate = h.wins_a as f64 / h.total_meetings as f64;
    let goal_factor = clamp((h.avg_goals_a - h.avg_goals_b + 2.0) / 4.0, 0.0, 1.0);
    clamp(0.7 * win_rate + 0.3 * goal_factor, 0.0, 1.0)
}

/// B's factor is the complement of A's rather than a separate measurement of
/// B's record, so the pair always sums to one.
pub fn away_head_to_head(home_factor: f64) -> f64 {
    1.0 - home_factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(
        total: u32,
        wins_a: u32,
        wins_b: u32,
        goals_a: f64,
        goals_b: f64,
    ) -> HeadToHeadSummary {
        HeadToHeadSummary {
            total_meetings: total,
            wins_a,
            wins_b,
            draws: total - wins_a - wins_b,
            avg_goals_a: goals_a,
            avg_goals_b: goals_b,
        }
    }

    #[test]
    fn no_meetings_is_neutral() {
        assert_eq!(head_to_head_factor(None), 0.5);
        assert_eq!(head_to_head_factor(Some(&summary(0, 0, 0, 0.0, 0.0))), 0.5);
    }

    #[test]
    fn blends_win_rate_and_goal_margin() {
        let h = summary(5, 3, 1, 2.0, 1.0);
        let expected = 0.7 * 0.6 + 0.3 * 0.75;
        assert!((head_to_head_factor(Some(&h)) - expected).abs() < 1e-12);
    }

    #[test]
    fn goal_margin_saturates() {
        let rout = summary(2, 2, 0, 7.0, 0.0);
        assert!((head_to_head_factor(Some(&rout)) - 1.0).abs() < 1e-12);
        let thrashed = summary(2, 0, 2, 0.0, 7.0);
        assert_eq!(head_to_head_factor(Some(&thrashed)), 0.0);
    }

    #[test]
    fn complement_law_holds() {
        for h in [
            summary(5, 3, 1, 2.0, 1.0),
            summary(4, 0, 4, 0.5, 2.5),
            summary(10, 5, 5, 1.0, 1.0),
        ] {
            let a = head_to_head_factor(Some(&h));
            assert!((a + away_head_to_head(a) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn inconsistent_counts_are_clamped() {
        let broken = HeadToHeadSummary {
            total_meetings: 1,
            wins_a: 4,
            wins_b: 0,
            draws: 0,
            avg_goals_a: 3.0,
            avg_goals_b: 0.0,
        };
        assert_eq!(head_to_head_factor(Some(&broken)), 1.0);
    }
}
