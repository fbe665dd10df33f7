use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::model::{
    Fixture, HeadToHeadSummary, HomeAwaySplit, InjuryRecord, PlayerId, PlayerRole,
    PlayerStatsSnapshot, RosterEntry, Severity, TeamId, TeamStatsSnapshot, Venue,
};
use crate::provider::{ProviderError, StatsProvider};

const DB_DIR: &str = "matchday_forecast";
const DB_FILE: &str = "football.sqlite";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Scheduled,
    Finished,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Finished => "finished",
        }
    }
}

/// One team's line for a finished match.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamMatchLine {
    pub goals_for: u32,
    pub goals_against: u32,
    pub shots_on_target: u32,
    pub shots_conceded: u32,
    pub possession: f64,
    pub corners: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

/// One player's line for a finished match.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerMatchLine {
    pub goals: u32,
    pub assists: u32,
    pub minutes: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub shots: u32,
    pub shots_on_target: u32,
    pub pass_completion: f64,
    pub tackles: u32,
    pub interceptions: u32,
}

pub fn default_db_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_DATA_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(DB_DIR).join(DB_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(DB_DIR)
            .join(DB_FILE),
    )
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    debug!(path = %path.display(), "sqlite store opened");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS teams (
            team_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            country TEXT NULL,
            league TEXT NULL
        );

        CREATE TABLE IF NOT EXISTS players (
            player_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            position TEXT NOT NULL,
            team_id INTEGER NOT NULL REFERENCES teams(team_id),
            age INTEGER NULL
        );
        CREATE INDEX IF NOT EXISTS idx_players_team ON players(team_id);

        CREATE TABLE IF NOT EXISTS matches (
            match_id INTEGER PRIMARY KEY AUTOINCREMENT,
            match_date TEXT NOT NULL,
            home_team_id INTEGER NOT NULL REFERENCES teams(team_id),
            away_team_id INTEGER NOT NULL REFERENCES teams(team_id),
            home_goals INTEGER NULL,
            away_goals INTEGER NULL,
            status TEXT NOT NULL DEFAULT 'scheduled'
        );
        CREATE INDEX IF NOT EXISTS idx_matches_date ON matches(match_date);
        CREATE INDEX IF NOT EXISTS idx_matches_home ON matches(home_team_id);
        CREATE INDEX IF NOT EXISTS idx_matches_away ON matches(away_team_id);

        CREATE TABLE IF NOT EXISTS team_match_stats (
            match_id INTEGER NOT NULL REFERENCES matches(match_id),
            team_id INTEGER NOT NULL REFERENCES teams(team_id),
            goals_for INTEGER NOT NULL DEFAULT 0,
            goals_against INTEGER NOT NULL DEFAULT 0,
            shots_on_target INTEGER NOT NULL DEFAULT 0,
            shots_conceded INTEGER NOT NULL DEFAULT 0,
            possession REAL NOT NULL DEFAULT 0.0,
            corners INTEGER NOT NULL DEFAULT 0,
            yellow_cards INTEGER NOT NULL DEFAULT 0,
            red_cards INTEGER NOT NULL DEFAULT 0,
            clean_sheet INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (match_id, team_id)
        );

        CREATE TABLE IF NOT EXISTS player_match_stats (
            match_id INTEGER NOT NULL REFERENCES matches(match_id),
            player_id INTEGER NOT NULL REFERENCES players(player_id),
            goals INTEGER NOT NULL DEFAULT 0,
            assists INTEGER NOT NULL DEFAULT 0,
            minutes INTEGER NOT NULL DEFAULT 0,
            yellow_cards INTEGER NOT NULL DEFAULT 0,
            red_cards INTEGER NOT NULL DEFAULT 0,
            shots INTEGER NOT NULL DEFAULT 0,
            shots_on_target INTEGER NOT NULL DEFAULT 0,
            pass_completion REAL NOT NULL DEFAULT 0.0,
            tackles INTEGER NOT NULL DEFAULT 0,
            interceptions INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (match_id, player_id)
        );

        CREATE TABLE IF NOT EXISTS injuries (
            injury_id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id INTEGER NOT NULL REFERENCES players(player_id),
            started_on TEXT NOT NULL,
            expected_end TEXT NULL,
            kind TEXT NULL,
            severity TEXT NOT NULL,
            team_importance INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS head_to_head (
            meeting_id INTEGER PRIMARY KEY AUTOINCREMENT,
            team1_id INTEGER NOT NULL REFERENCES teams(team_id),
            team2_id INTEGER NOT NULL REFERENCES teams(team_id),
            played_on TEXT NOT NULL,
            winner_id INTEGER NULL,
            goals_team1 INTEGER NOT NULL,
            goals_team2 INTEGER NOT NULL,
            venue TEXT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_h2h_pair ON head_to_head(team1_id, team2_id);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

pub fn add_team(
    conn: &Connection,
    name: &str,
    country: Option<&str>,
    league: Option<&str>,
) -> Result<TeamId> {
    conn.execute(
        "INSERT INTO teams(name, country, league) VALUES (?1, ?2, ?3)",
        params![name, country, league],
    )
    .with_context(|| format!("insert team {name}"))?;
    Ok(conn.last_insert_rowid())
}

pub fn add_player(
    conn: &Connection,
    name: &str,
    position: &str,
    team: TeamId,
    age: Option<u32>,
) -> Result<PlayerId> {
    conn.execute(
        "INSERT INTO players(name, position, team_id, age) VALUES (?1, ?2, ?3, ?4)",
        params![name, position, team, age],
    )
    .with_context(|| format!("insert player {name}"))?;
    Ok(conn.last_insert_rowid())
}

pub fn add_match(
    conn: &Connection,
    date: NaiveDate,
    home: TeamId,
    away: TeamId,
    score: Option<(u32, u32)>,
    status: MatchStatus,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO matches(match_date, home_team_id, away_team_id, home_goals, away_goals, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            date,
            home,
            away,
            score.map(|s| s.0),
            score.map(|s| s.1),
            status.as_str()
        ],
    )
    .context("insert match")?;
    Ok(conn.last_insert_rowid())
}

pub fn record_team_line(
    conn: &Connection,
    match_id: i64,
    team: TeamId,
    line: &TeamMatchLine,
) -> Result<()> {
    conn.execute(
        "INSERT INTO team_match_stats(
            match_id, team_id, goals_for, goals_against, shots_on_target, shots_conceded,
            possession, corners, yellow_cards, red_cards, clean_sheet
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            match_id,
            team,
            line.goals_for,
            line.goals_against,
            line.shots_on_target,
            line.shots_conceded,
            line.possession,
            line.corners,
            line.yellow_cards,
            line.red_cards,
            bool_to_i64(line.goals_against == 0),
        ],
    )
    .context("insert team match stats")?;
    Ok(())
}

pub fn record_player_line(
    conn: &Connection,
    match_id: i64,
    player: PlayerId,
    line: &PlayerMatchLine,
) -> Result<()> {
    conn.execute(
        "INSERT INTO player_match_stats(
            match_id, player_id, goals, assists, minutes, yellow_cards, red_cards,
            shots, shots_on_target, pass_completion, tackles, interceptions
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            match_id,
            player,
            line.goals,
            line.assists,
            line.minutes,
            line.yellow_cards,
            line.red_cards,
            line.shots,
            line.shots_on_target,
            line.pass_completion,
            line.tackles,
            line.interceptions,
        ],
    )
    .context("insert player match stats")?;
    Ok(())
}

pub fn add_injury(
    conn: &Connection,
    player: PlayerId,
    started_on: NaiveDate,
    expected_end: Option<NaiveDate>,
    kind: Option<&str>,
    severity: Severity,
    team_importance: u8,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO injuries(player_id, started_on, expected_end, kind, severity, team_importance)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            player,
            started_on,
            expected_end,
            kind,
            severity.as_str(),
            team_importance
        ],
    )
    .context("insert injury")?;
    Ok(conn.last_insert_rowid())
}

/// Records a meeting; the winner is derived from the score.
pub fn add_meeting(
    conn: &Connection,
    team1: TeamId,
    team2: TeamId,
    played_on: NaiveDate,
    goals: (u32, u32),
    venue: Option<&str>,
) -> Result<i64> {
    let winner = if goals.0 > goals.1 {
        Some(team1)
    } else if goals.1 > goals.0 {
        Some(team2)
    } else {
        None
    };
    conn.execute(
        "INSERT INTO head_to_head(
            team1_id, team2_id, played_on, winner_id, goals_team1, goals_team2, venue
         )
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![team1, team2, played_on, winner, goals.0, goals.1, venue],
    )
    .context("insert head-to-head meeting")?;
    Ok(conn.last_insert_rowid())
}

/// `StatsProvider` over the SQLite schema above.
///
/// Aggregates cover the most recent `window` finished matches. Injuries are
/// active relative to `today`, which defaults to the local date.
pub struct SqliteProvider {
    conn: Connection,
    today: NaiveDate,
}

impl SqliteProvider {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            today: Local::now().date_naive(),
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Every team in id order.
    pub fn teams(&self) -> Result<Vec<(TeamId, String)>, ProviderError> {
        let mut stmt = self
            .conn
            .prepare("SELECT team_id, name FROM teams ORDER BY team_id")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn ensure_team(&self, team: TeamId) -> Result<(), ProviderError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM teams WHERE team_id = ?1",
                params![team],
                |_| Ok(()),
            )
            .optional()?;
        found.ok_or_else(|| ProviderError::team_not_found(team))
    }

    fn ensure_player(&self, player: PlayerId) -> Result<(), ProviderError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM players WHERE player_id = ?1",
                params![player],
                |_| Ok(()),
            )
            .optional()?;
        found.ok_or_else(|| ProviderError::player_not_found(player))
    }
}

impl StatsProvider for SqliteProvider {
    fn team_stats(
        &self,
        team: TeamId,
        window: usize,
    ) -> Result<Option<TeamStatsSnapshot>, ProviderError> {
        self.ensure_team(team)?;
        let snapshot = self.conn.query_row(
            r#"
            SELECT
                AVG(goals_for), AVG(goals_against), AVG(shots_on_target), AVG(possession),
                AVG(corners), AVG(yellow_cards), AVG(red_cards),
                SUM(clean_sheet) * 100.0 / COUNT(*),
                COUNT(*)
            FROM (
                SELECT s.*
                FROM team_match_stats s
                JOIN matches m ON m.match_id = s.match_id
                WHERE s.team_id = ?1 AND m.status = 'finished'
                ORDER BY m.match_date DESC, m.match_id DESC
                LIMIT ?2
            )
            "#,
            params![team, window as i64],
            |row| {
                Ok(TeamStatsSnapshot {
                    goals_for_avg: row.get::<_, Option<f64>>(0)?.unwrap_or_default(),
                    goals_against_avg: row.get::<_, Option<f64>>(1)?.unwrap_or_default(),
                    shots_on_target_avg: row.get::<_, Option<f64>>(2)?.unwrap_or_default(),
                    possession_avg: row.get::<_, Option<f64>>(3)?.unwrap_or_default(),
                    corners_avg: row.get::<_, Option<f64>>(4)?.unwrap_or_default(),
                    yellow_cards_avg: row.get::<_, Option<f64>>(5)?.unwrap_or_default(),
                    red_cards_avg: row.get::<_, Option<f64>>(6)?.unwrap_or_default(),
                    clean_sheet_pct: row.get::<_, Option<f64>>(7)?.unwrap_or_default(),
                    games_count: row.get::<_, u32>(8)?,
                })
            },
        )?;
        Ok((snapshot.games_count > 0).then_some(snapshot))
    }

    fn player_stats(
        &self,
        player: PlayerId,
        window: usize,
    ) -> Result<Option<PlayerStatsSnapshot>, ProviderError> {
        self.ensure_player(player)?;
        let snapshot = self.conn.query_row(
            r#"
            SELECT
                SUM(goals), SUM(assists), AVG(minutes), SUM(yellow_cards), SUM(red_cards),
                AVG(shots), AVG(shots_on_target), AVG(pass_completion),
                AVG(tackles), AVG(interceptions),
                COUNT(*)
            FROM (
                SELECT p.*
                FROM player_match_stats p
                JOIN matches m ON m.match_id = p.match_id
                WHERE p.player_id = ?1 AND m.status = 'finished'
                ORDER BY m.match_date DESC, m.match_id DESC
                LIMIT ?2
            )
            "#,
            params![player, window as i64],
            |row| {
                Ok(PlayerStatsSnapshot {
                    total_goals: row.get::<_, Option<f64>>(0)?.unwrap_or_default(),
                    total_assists: row.get::<_, Option<f64>>(1)?.unwrap_or_default(),
                    avg_minutes: row.get::<_, Option<f64>>(2)?.unwrap_or_default(),
                    total_yellow: row.get::<_, Option<f64>>(3)?.unwrap_or_default(),
                    total_red: row.get::<_, Option<f64>>(4)?.unwrap_or_default(),
                    avg_shots: row.get::<_, Option<f64>>(5)?.unwrap_or_default(),
                    avg_shots_on_target: row.get::<_, Option<f64>>(6)?.unwrap_or_default(),
                    avg_pass_completion: row.get::<_, Option<f64>>(7)?.unwrap_or_default(),
                    avg_tackles: row.get::<_, Option<f64>>(8)?.unwrap_or_default(),
                    avg_interceptions: row.get::<_, Option<f64>>(9)?.unwrap_or_default(),
                    games_count: row.get::<_, u32>(10)?,
                })
            },
        )?;
        Ok((snapshot.games_count > 0).then_some(snapshot))
    }

    fn roster(&self, team: TeamId) -> Result<Vec<RosterEntry>, ProviderError> {
        self.ensure_team(team)?;
        let mut stmt = self.conn.prepare(
            "SELECT player_id, position FROM players WHERE team_id = ?1 ORDER BY player_id",
        )?;
        let rows = stmt.query_map(params![team], |row| {
            let position: String = row.get(1)?;
            Ok(RosterEntry {
                player_id: row.get(0)?,
                role: PlayerRole::from_position(&position),
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn active_injuries(&self, team: TeamId) -> Result<Vec<InjuryRecord>, ProviderError> {
        self.ensure_team(team)?;
        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.name, i.kind, i.severity, i.started_on, i.expected_end, i.team_importance
            FROM injuries i
            JOIN players p ON p.player_id = i.player_id
            WHERE p.team_id = ?1
              AND (i.expected_end IS NULL OR i.expected_end >= ?2)
            ORDER BY i.team_importance DESC, i.started_on DESC
            "#,
        )?;
        let rows = stmt.query_map(params![team, self.today], |row| {
            let severity: String = row.get(2)?;
            Ok(InjuryRecord {
                severity: Severity::parse(&severity),
                team_importance: row.get::<_, i64>(5)?.clamp(0, u8::MAX as i64) as u8,
                player_name: row.get(0)?,
                kind: row.get(1)?,
                started_on: row.get(3)?,
                expected_end: row.get(4)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn head_to_head(
        &self,
        team_a: TeamId,
        team_b: TeamId,
        window: usize,
    ) -> Result<Option<HeadToHeadSummary>, ProviderError> {
        self.ensure_team(team_a)?;
        self.ensure_team(team_b)?;
        let mut stmt = self.conn.prepare(
            r#"
            SELECT team1_id, winner_id, goals_team1, goals_team2
            FROM head_to_head
            WHERE (team1_id = ?1 AND team2_id = ?2) OR (team1_id = ?2 AND team2_id = ?1)
            ORDER BY played_on DESC, meeting_id DESC
            LIMIT ?3
            "#,
        )?;
        let rows = stmt.query_map(params![team_a, team_b, window as i64], |row| {
            Ok((
                row.get::<_, TeamId>(0)?,
                row.get::<_, Option<TeamId>>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        let mut h = HeadToHeadSummary::default();
        let mut goals_a = 0i64;
        let mut goals_b = 0i64;
        for row in rows {
            let (team1, winner, g1, g2) = row?;
            let (ga, gb) = if team1 == team_a { (g1, g2) } else { (g2, g1) };
            goals_a += ga;
            goals_b += gb;
            match winner {
                Some(w) if w == team_a => h.wins_a += 1,
                Some(w) if w == team_b => h.wins_b += 1,
                _ => h.draws += 1,
            }
            h.total_meetings += 1;
        }

        if h.total_meetings == 0 {
            return Ok(None);
        }
        let n = h.total_meetings as f64;
        h.avg_goals_a = goals_a as f64 / n;
        h.avg_goals_b = goals_b as f64 / n;
        Ok(Some(h))
    }

    fn home_away_split(
        &self,
        team: TeamId,
        venue: Venue,
        window: usize,
    ) -> Result<Option<HomeAwaySplit>, ProviderError> {
        self.ensure_team(team)?;
        let sql = match venue {
            Venue::Home => {
                r#"
                SELECT
                    AVG(CASE WHEN home_goals > away_goals THEN 1.0 ELSE 0.0 END),
                    AVG(home_goals), AVG(away_goals), COUNT(*)
                FROM (
                    SELECT home_goals, away_goals FROM matches
                    WHERE home_team_id = ?1 AND status = 'finished'
                      AND home_goals IS NOT NULL AND away_goals IS NOT NULL
                    ORDER BY match_date DESC, match_id DESC
                    LIMIT ?2
                )
                "#
            }
            Venue::Away => {
                r#"
                SELECT
                    AVG(CASE WHEN away_goals > home_goals THEN 1.0 ELSE 0.0 END),
                    AVG(away_goals), AVG(home_goals), COUNT(*)
                FROM (
                    SELECT home_goals, away_goals FROM matches
                    WHERE away_team_id = ?1 AND status = 'finished'
                      AND home_goals IS NOT NULL AND away_goals IS NOT NULL
                    ORDER BY match_date DESC, match_id DESC
                    LIMIT ?2
                )
                "#
            }
        };
        let (split, count) = self.conn.query_row(sql, params![team, window as i64], |row| {
            Ok((
                HomeAwaySplit {
                    win_rate: row.get::<_, Option<f64>>(0)?.unwrap_or_default(),
                    avg_goals_scored: row.get::<_, Option<f64>>(1)?.unwrap_or_default(),
                    avg_goals_conceded: row.get::<_, Option<f64>>(2)?.unwrap_or_default(),
                },
                row.get::<_, i64>(3)?,
            ))
        })?;
        Ok((count > 0).then_some(split))
    }

    fn team_display_name(&self, team: TeamId) -> Result<String, ProviderError> {
        self.conn
            .query_row(
                "SELECT name FROM teams WHERE team_id = ?1",
                params![team],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .ok_or_else(|| ProviderError::team_not_found(team))
    }

    fn scheduled_fixtures(&self, date: NaiveDate) -> Result<Vec<Fixture>, ProviderError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT match_id, match_date, home_team_id, away_team_id
            FROM matches
            WHERE match_date = ?1 AND status = 'scheduled'
            ORDER BY match_id ASC
            "#,
        )?;
        let rows = stmt.query_map(params![date], |row| {
            Ok(Fixture {
                id: row.get(0)?,
                date: row.get(1)?,
                home_team: row.get(2)?,
                away_team: row.get(3)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

fn bool_to_i64(v: bool) -> i64 {
    if v { 1 } else { 0 }
}
