use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type TeamId = i64;
pub type PlayerId = i64;

/// Recent-form aggregate for one team over its last N finished matches.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamStatsSnapshot {
    pub goals_for_avg: f64,
    pub goals_against_avg: f64,
    pub shots_on_target_avg: f64,
    pub possession_avg: f64,
    pub corners_avg: f64,
    pub yellow_cards_avg: f64,
    pub red_cards_avg: f64,
    pub clean_sheet_pct: f64,
    pub games_count: u32,
}

/// Per-player aggregate over the player's last N finished matches.
///
/// `total_*` fields are sums over the window, `avg_*` fields are per-match means.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerStatsSnapshot {
    pub total_goals: f64,
    pub total_assists: f64,
    pub avg_minutes: f64,
    pub total_yellow: f64,
    pub total_red: f64,
    pub avg_shots: f64,
    pub avg_shots_on_target: f64,
    pub avg_pass_completion: f64,
    pub avg_tackles: f64,
    pub avg_interceptions: f64,
    pub games_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    Attacker,
    Midfielder,
    DefenderOrKeeper,
}

impl PlayerRole {
    /// Maps a free-text position label onto a role.
    ///
    /// Full-backs and wing-backs are defenders and any midfield label wins over
    /// an attacking qualifier, so "Attacking Midfielder" scores like
    /// "Médio Ofensivo". Anything unrecognised counts as defensive.
    pub fn from_position(raw: &str) -> Self {
        let s = raw.trim().to_lowercase();
        if s.contains("back") {
            return PlayerRole::DefenderOrKeeper;
        }
        if s.contains("midfield") || s.contains("médio") || s.contains("medio") {
            return PlayerRole::Midfielder;
        }
        if s.contains("attack")
            || s.contains("forward")
            || s.contains("striker")
            || s.contains("winger")
            || s.contains("avançado")
            || s.contains("avancado")
            || s.contains("extremo")
        {
            return PlayerRole::Attacker;
        }
        PlayerRole::DefenderOrKeeper
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerRole::Attacker => "Attacker",
            PlayerRole::Midfielder => "Midfielder",
            PlayerRole::DefenderOrKeeper => "Defender/Goalkeeper",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: PlayerId,
    pub role: PlayerRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
    VerySevere,
    #[serde(other)]
    Unspecified,
}

impl Severity {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "minor" | "ligeira" => Severity::Minor,
            "moderate" | "moderada" => Severity::Moderate,
            "severe" | "grave" => Severity::Severe,
            "very severe" | "very_severe" | "verysevere" | "muito grave" => Severity::VerySevere,
            _ => Severity::Unspecified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
            Severity::VerySevere => "very severe",
            Severity::Unspecified => "unspecified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryRecord {
    pub severity: Severity,
    /// How much the team relies on the player, 1 (fringe) to 5 (key).
    pub team_importance: u8,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub started_on: Option<NaiveDate>,
    #[serde(default)]
    pub expected_end: Option<NaiveDate>,
}

impl InjuryRecord {
    pub fn new(severity: Severity, team_importance: u8) -> Self {
        Self {
            severity,
            team_importance,
            player_name: None,
            kind: None,
            started_on: None,
            expected_end: None,
        }
    }
}

/// Meetings between an ordered pair (A, B); `_a` fields are from A's side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadToHeadSummary {
    pub total_meetings: u32,
    pub wins_a: u32,
    pub wins_b: u32,
    pub draws: u32,
    pub avg_goals_a: f64,
    pub avg_goals_b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HomeAwaySplit {
    pub win_rate: f64,
    pub avg_goals_scored: f64,
    pub avg_goals_conceded: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: i64,
    pub date: NaiveDate,
    pub home_team: TeamId,
    pub away_team: TeamId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbs {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OutcomeProbs {
    pub fn sum(&self) -> f64 {
        self.home + self.draw + self.away
    }
}

/// The ten factors that fed a prediction, kept for auditability.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub team_strength_home: f64,
    pub team_strength_away: f64,
    pub player_impact_home: f64,
    pub player_impact_away: f64,
    pub injury_home: f64,
    pub injury_away: f64,
    pub head_to_head_home: f64,
    pub head_to_head_away: f64,
    pub home_factor: f64,
    pub away_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalScores {
    pub home: f64,
    pub away: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture_id: Option<i64>,
    pub home_team: String,
    pub away_team: String,
    pub primary_outcome: Outcome,
    pub confidence: f64,
    pub probabilities: OutcomeProbs,
    pub breakdown: FactorBreakdown,
    pub final_scores: FinalScores,
}

impl PredictionResult {
    /// Human readable headline, e.g. "SL Benfica win" or "Draw".
    pub fn headline(&self) -> String {
        match self.primary_outcome {
            Outcome::HomeWin => format!("{} win", self.home_team),
            Outcome::AwayWin => format!("{} win", self.away_team),
            Outcome::Draw => "Draw".to_string(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::HomeWin => write!(f, "home win"),
            Outcome::Draw => write!(f, "draw"),
            Outcome::AwayWin => write!(f, "away win"),
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::Home => write!(f, "home"),
            Venue::Away => write!(f, "away"),
        }
    }
}
