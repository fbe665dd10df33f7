use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{
    Fixture, HeadToHeadSummary, HomeAwaySplit, InjuryRecord, PlayerId, PlayerRole,
    PlayerStatsSnapshot, RosterEntry, TeamId, TeamStatsSnapshot, Venue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Team,
    Player,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Team => write!(f, "team"),
            EntityKind::Player => write!(f, "player"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl ProviderError {
    pub fn team_not_found(id: TeamId) -> Self {
        ProviderError::NotFound {
            kind: EntityKind::Team,
            id,
        }
    }

    pub fn player_not_found(id: PlayerId) -> Self {
        ProviderError::NotFound {
            kind: EntityKind::Player,
            id,
        }
    }
}

/// Source of the aggregates the engine consumes.
///
/// `Ok(None)` (or an empty list) means "no data in the window" and is resolved
/// by the calculators' neutral defaults. `Err(NotFound)` is reserved for ids
/// the provider cannot resolve at all.
pub trait StatsProvider {
    fn team_stats(
        &self,
        team: TeamId,
        window: usize,
    ) -> Result<Option<TeamStatsSnapshot>, ProviderError>;

    fn player_stats(
        &self,
        player: PlayerId,
        window: usize,
    ) -> Result<Option<PlayerStatsSnapshot>, ProviderError>;

    fn roster(&self, team: TeamId) -> Result<Vec<RosterEntry>, ProviderError>;

    /// Injuries whose expected end is unset or not yet in the past.
    fn active_injuries(&self, team: TeamId) -> Result<Vec<InjuryRecord>, ProviderError>;

    /// Summary from `team_a`'s side over their most recent meetings.
    fn head_to_head(
        &self,
        team_a: TeamId,
        team_b: TeamId,
        window: usize,
    ) -> Result<Option<HeadToHeadSummary>, ProviderError>;

    fn home_away_split(
        &self,
        team: TeamId,
        venue: Venue,
        window: usize,
    ) -> Result<Option<HomeAwaySplit>, ProviderError>;

    fn team_display_name(&self, team: TeamId) -> Result<String, ProviderError>;

    fn scheduled_fixtures(&self, date: NaiveDate) -> Result<Vec<Fixture>, ProviderError>;
}

#[derive(Debug, Clone, Default)]
struct TeamEntry {
    name: String,
    stats: Option<TeamStatsSnapshot>,
    roster: Vec<RosterEntry>,
    injuries: Vec<InjuryRecord>,
    splits: HashMap<Venue, HomeAwaySplit>,
}

/// Provider over precomputed snapshots. Window sizes are ignored: whatever was
/// stored is returned as-is.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    teams: HashMap<TeamId, TeamEntry>,
    players: HashMap<PlayerId, Option<PlayerStatsSnapshot>>,
    head_to_head: HashMap<(TeamId, TeamId), HeadToHeadSummary>,
    fixtures: Vec<Fixture>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_team(&mut self, id: TeamId, name: impl Into<String>) -> &mut Self {
        self.teams.entry(id).or_default().name = name.into();
        self
    }

    pub fn set_team_stats(&mut self, id: TeamId, stats: TeamStatsSnapshot) -> &mut Self {
        self.teams.entry(id).or_default().stats = Some(stats);
        self
    }

    pub fn add_player(
        &mut self,
        team: TeamId,
        player: PlayerId,
        role: PlayerRole,
        stats: Option<PlayerStatsSnapshot>,
    ) -> &mut Self {
        self.teams.entry(team).or_default().roster.push(RosterEntry {
            player_id: player,
            role,
        });
        self.players.insert(player, stats);
        self
    }

    pub fn add_injury(&mut self, team: TeamId, injury: InjuryRecord) -> &mut Self {
        self.teams.entry(team).or_default().injuries.push(injury);
        self
    }

    pub fn set_split(&mut self, team: TeamId, venue: Venue, split: HomeAwaySplit) -> &mut Self {
        self.teams.entry(team).or_default().splits.insert(venue, split);
        self
    }

    /// Stores the summary from A's side and its mirror image for B.
    pub fn set_head_to_head(&mut self, a: TeamId, b: TeamId, h: HeadToHeadSummary) -> &mut Self {
        let mirrored = HeadToHeadSummary {
            total_meetings: h.total_meetings,
            wins_a: h.wins_b,
            wins_b: h.wins_a,
            draws: h.draws,
            avg_goals_a: h.avg_goals_b,
            avg_goals_b: h.avg_goals_a,
        };
        self.head_to_head.insert((a, b), h);
        self.head_to_head.insert((b, a), mirrored);
        self
    }

    pub fn add_fixture(&mut self, fixture: Fixture) -> &mut Self {
        self.fixtures.push(fixture);
        self
    }

    fn team(&self, id: TeamId) -> Result<&TeamEntry, ProviderError> {
        self.teams
            .get(&id)
            .ok_or_else(|| ProviderError::team_not_found(id))
    }
}

impl StatsProvider for InMemoryProvider {
    fn team_stats(
        &self,
        team: TeamId,
        _window: usize,
    ) -> Result<Option<TeamStatsSnapshot>, ProviderError> {
        Ok(self.team(team)?.stats)
    }

    fn player_stats(
        &self,
        player: PlayerId,
        _window: usize,
    ) -> Result<Option<PlayerStatsSnapshot>, ProviderError> {
        self.players
            .get(&player)
            .copied()
            .ok_or_else(|| ProviderError::player_not_found(player))
    }

    fn roster(&self, team: TeamId) -> Result<Vec<RosterEntry>, ProviderError> {
        Ok(self.team(team)?.roster.clone())
    }

    fn active_injuries(&self, team: TeamId) -> Result<Vec<InjuryRecord>, ProviderError> {
        Ok(self.team(team)?.injuries.clone())
    }

    fn head_to_head(
        &self,
        team_a: TeamId,
        team_b: TeamId,
        _window: usize,
    ) -> Result<Option<HeadToHeadSummary>, ProviderError> {
        self.team(team_a)?;
        self.team(team_b)?;
        Ok(self.head_to_head.get(&(team_a, team_b)).copied())
    }

    fn home_away_split(
        &self,
        team: TeamId,
        venue: Venue,
        _window: usize,
    ) -> Result<Option<HomeAwaySplit>, ProviderError> {
        Ok(self.team(team)?.splits.get(&venue).copied())
    }

    fn team_display_name(&self, team: TeamId) -> Result<String, ProviderError> {
        Ok(self.team(team)?.name.clone())
    }

    fn scheduled_fixtures(&self, date: NaiveDate) -> Result<Vec<Fixture>, ProviderError> {
        Ok(self
            .fixtures
            .iter()
            .filter(|f| f.date == date)
            .cloned()
            .collect())
    }
}
