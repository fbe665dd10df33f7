use crate::config::{DrawHeuristic, Weights};
use crate::model::{FinalScores, Outcome, OutcomeProbs};

/// The five factors for one side, in weight order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SideFactors {
    pub team_strength: f64,
    pub player_impact: f64,
    pub injury: f64,
    pub head_to_head: f64,
    pub home_away: f64,
}

impl SideFactors {
    pub fn weighted_score(&self, w: &Weights) -> f64 {
        w.team_strength * self.team_strength
            + w.player_impact * self.player_impact
            + w.injury * self.injury
            + w.head_to_head * self.head_to_head
            + w.home_away * self.home_away
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combined {
    pub scores: FinalScores,
    pub probs: OutcomeProbs,
    pub outcome: Outcome,
    pub confidence: f64,
}

pub fn combine(
    home: &SideFactors,
    away: &SideFactors,
    weights: &Weights,
    draw: &DrawHeuristic,
) -> Combined {
    let score_home = home.weighted_score(weights);
    let score_away = away.weighted_score(weights);
    let probs = outcome_probs(score_home, score_away, draw);
    let (outcome, confidence) = pick_outcome(probs);
    Combined {
        scores: FinalScores {
            home: score_home,
            away: score_away,
        },
        probs,
        outcome,
        confidence,
    }
}

/// Turns the two side scores into three probabilities summing to one.
///
/// Win shares are proportional to the scores (0.5/0.5 if both are zero). The
/// draw share shrinks as the scores drift apart, never below `draw.floor`,
/// and all three are then renormalised together.
pub fn outcome_probs(score_home: f64, score_away: f64, draw: &DrawHeuristic) -> OutcomeProbs {
    let total = score_home + score_away;
    let (p_home, p_away) = if total > 0.0 {
        (score_home / total, score_away / total)
    } else {
        (0.5, 0.5)
    };
    let p_draw = (draw.base - (score_home - score_away).abs()).max(draw.floor);

    let sum = p_home + p_away + p_draw;
    OutcomeProbs {
        home: p_home / sum,
        draw: p_draw / sum,
        away: p_away / sum,
    }
}

/// Highest probability wins; ties resolve home, then draw, then away.
pub fn pick_outcome(p: OutcomeProbs) -> (Outcome, f64) {
    if p.home >= p.draw && p.home >= p.away {
        (Outcome::HomeWin, p.home)
    } else if p.draw >= p.away {
        (Outcome::Draw, p.draw)
    } else {
        (Outcome::AwayWin, p.away)
    }
}
