use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::factors::{
    away_head_to_head, head_to_head_factor, home_away_factor, injury_factor, player_impact,
    team_strength,
};
use crate::model::{
    FactorBreakdown, Fixture, HeadToHeadSummary, HomeAwaySplit, InjuryRecord, PlayerRole,
    PlayerStatsSnapshot, PredictionResult, TeamId, TeamStatsSnapshot, Venue,
};
use crate::provider::{ProviderError, StatsProvider};
use crate::win_prob::{self, SideFactors};

/// Everything fetched from the provider for one side of a fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct SideInputs {
    pub name: String,
    pub stats: Option<TeamStatsSnapshot>,
    pub squad: Vec<(PlayerRole, Option<PlayerStatsSnapshot>)>,
    pub injuries: Vec<InjuryRecord>,
    pub split: Option<HomeAwaySplit>,
}

/// Provider data for a whole fixture, gathered before any factor is computed.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchInputs {
    pub home: SideInputs,
    pub away: SideInputs,
    /// From the home side's perspective.
    pub head_to_head: Option<HeadToHeadSummary>,
}

pub struct MatchPredictor<'p, P> {
    provider: &'p P,
    config: EngineConfig,
}

impl<'p, P: StatsProvider> MatchPredictor<'p, P> {
    pub fn new(provider: &'p P, config: EngineConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn predict_match(
        &self,
        home: TeamId,
        away: TeamId,
    ) -> Result<PredictionResult, ProviderError> {
        let inputs = self.gather(home, away)?;
        let result = evaluate(&inputs, &self.config);
        info!(
            home = %result.home_team,
            away = %result.away_team,
            outcome = %result.primary_outcome,
            confidence = result.confidence,
            "prediction ready"
        );
        Ok(result)
    }

    pub fn predict_all_scheduled(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<PredictionResult>, ProviderError> {
        let fixtures = self.provider.scheduled_fixtures(date)?;
        info!(%date, fixtures = fixtures.len(), "predicting scheduled fixtures");
        fixtures
            .iter()
            .map(|fixture| self.predict_fixture(fixture))
            .collect()
    }

    pub fn predict_fixture(&self, fixture: &Fixture) -> Result<PredictionResult, ProviderError> {
        let mut result = self.predict_match(fixture.home_team, fixture.away_team)?;
        result.fixture_id = Some(fixture.id);
        Ok(result)
    }

    pub fn gather(&self, home: TeamId, away: TeamId) -> Result<MatchInputs, ProviderError> {
        let w = self.config.windows;
        Ok(MatchInputs {
            home: self.gather_side(home, Venue::Home)?,
            away: self.gather_side(away, Venue::Away)?,
            head_to_head: self.provider.head_to_head(home, away, w.head_to_head)?,
        })
    }

    fn gather_side(&self, team: TeamId, venue: Venue) -> Result<SideInputs, ProviderError> {
        let w = self.config.windows;
        let name = self.provider.team_display_name(team)?;
        let stats = self.provider.team_stats(team, w.team)?;

        let roster = self.provider.roster(team)?;
        let mut squad = Vec::with_capacity(roster.len());
        for entry in roster {
            let stats = self.provider.player_stats(entry.player_id, w.player)?;
            squad.push((entry.role, stats));
        }

        Ok(SideInputs {
            name,
            stats,
            squad,
            injuries: self.provider.active_injuries(team)?,
            split: self.provider.home_away_split(team, venue, w.home_away)?,
        })
    }
}

impl<P: StatsProvider + Sync> MatchPredictor<'_, P> {
    /// Same as mapping `predict_fixture` over `fixtures`, spread over the rayon
    /// pool. Output order follows input order.
    pub fn predict_fixtures_par(
        &self,
        fixtures: &[Fixture],
    ) -> Result<Vec<PredictionResult>, ProviderError> {
        fixtures
            .par_iter()
            .map(|fixture| self.predict_fixture(fixture))
            .collect()
    }
}

/// Pure part of a prediction: factors, scores and probabilities.
pub fn evaluate(inputs: &MatchInputs, config: &EngineConfig) -> PredictionResult {
    let h2h_home = head_to_head_factor(inputs.head_to_head.as_ref());
    let home = side_factors(&inputs.home, Venue::Home, h2h_home, config);
    let away = side_factors(&inputs.away, Venue::Away, away_head_to_head(h2h_home), config);
    debug!(?home, ?away, "factors computed");

    let combined = win_prob::combine(&home, &away, &config.weights, &config.draw);

    PredictionResult {
        fixture_id: None,
        home_team: inputs.home.name.clone(),
        away_team: inputs.away.name.clone(),
        primary_outcome: combined.outcome,
        confidence: combined.confidence,
        probabilities: combined.probs,
        breakdown: FactorBreakdown {
            team_strength_home: home.team_strength,
            team_strength_away: away.team_strength,
            player_impact_home: home.player_impact,
            player_impact_away: away.player_impact,
            injury_home: home.injury,
            injury_away: away.injury,
            head_to_head_home: home.head_to_head,
            head_to_head_away: away.head_to_head,
            home_factor: home.home_away,
            away_factor: away.home_away,
        },
        final_scores: combined.scores,
    }
}

fn side_factors(
    side: &SideInputs,
    venue: Venue,
    head_to_head: f64,
    config: &EngineConfig,
) -> SideFactors {
    SideFactors {
        team_strength: team_strength(side.stats.as_ref()),
        player_impact: player_impact(side.squad.iter().map(|(role, s)| (*role, s.as_ref()))),
        injury: injury_factor(&side.injuries),
        head_to_head,
        home_away: home_away_factor(side.split.as_ref(), venue, &config.home_away),
    }
}
