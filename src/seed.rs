use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;
use rusqlite::Connection;
use tracing::info;

use crate::model::{Severity, TeamId};
use crate::store::{
    MatchStatus, PlayerMatchLine, TeamMatchLine, add_injury, add_match, add_meeting, add_player,
    add_team, record_player_line, record_team_line,
};

const COUNTRY: &str = "Portugal";
const LEAGUE: &str = "Primeira Liga";

const TEAMS: [&str; 10] = [
    "SL Benfica",
    "FC Porto",
    "Sporting CP",
    "SC Braga",
    "Vitória SC",
    "FC Famalicão",
    "Casa Pia AC",
    "Rio Ave FC",
    "Moreirense FC",
    "Boavista FC",
];

/// Squads for the first four clubs in `TEAMS`, in the same order.
const SQUADS: [[(&str, &str); 5]; 4] = [
    [
        ("Rafa Silva", "Extremo"),
        ("João Mário", "Médio"),
        ("Gonçalo Ramos", "Avançado"),
        ("Nicolás Otamendi", "Defesa Central"),
        ("Odysseas Vlachodimos", "Guarda-redes"),
    ],
    [
        ("Pepe", "Defesa Central"),
        ("Otávio", "Médio Ofensivo"),
        ("Mehdi Taremi", "Avançado"),
        ("Diogo Costa", "Guarda-redes"),
        ("Galeno", "Extremo"),
    ],
    [
        ("Pedro Gonçalves", "Médio Ofensivo"),
        ("Viktor Gyökeres", "Avançado"),
        ("Morten Hjulmand", "Médio Defensivo"),
        ("Sebastián Coates", "Defesa Central"),
        ("Antonio Adán", "Guarda-redes"),
    ],
    [
        ("Ricardo Horta", "Extremo"),
        ("Simon Banza", "Avançado"),
        ("João Moutinho", "Médio"),
        ("Víctor Gómez", "Defesa"),
        ("Matheus", "Guarda-redes"),
    ],
];

const INJURY_KINDS: [&str; 4] = ["Muscular", "Ligament", "Bone", "Bruise"];
const SEEDED_SEVERITIES: [Severity; 3] = [Severity::Minor, Severity::Moderate, Severity::Severe];
const VENUES: [&str; 3] = ["home", "away", "neutral"];

const FINISHED_MATCHES: usize = 30;
const MATCH_SPACING_DAYS: i64 = 3;
const HISTORY_DAYS: i64 = 90;
const MEETINGS_PER_PAIR: usize = 5;

/// Index pairs into `TEAMS` for tomorrow's fixtures.
const TOMORROW: [(usize, usize); 3] = [(0, 1), (2, 3), (4, 9)];

#[derive(Debug, Clone, Default)]
pub struct SeedSummary {
    pub teams: Vec<(TeamId, String)>,
    pub players: usize,
    pub finished_matches: usize,
    pub injuries: usize,
    pub meetings: usize,
    pub fixtures: Vec<i64>,
}

/// Removes every row from the forecasting tables and restarts their id
/// sequences, so a fresh seed hands out team ids from 1 again.
pub fn clear_all(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM player_match_stats;
        DELETE FROM team_match_stats;
        DELETE FROM injuries;
        DELETE FROM head_to_head;
        DELETE FROM matches;
        DELETE FROM players;
        DELETE FROM teams;
        DELETE FROM sqlite_sequence;
        "#,
    )
    .context("clear tables")?;
    Ok(())
}

/// Fills an empty database with a small Portuguese league: ten clubs, squads
/// for the big four, a run of finished matches ending before `today`, open
/// injuries, head-to-head history and three fixtures on the following day.
pub fn seed_sample_league(
    conn: &Connection,
    rng: &mut impl Rng,
    today: NaiveDate,
) -> Result<SeedSummary> {
    let tx = conn
        .unchecked_transaction()
        .context("begin seed transaction")?;
    let mut summary = SeedSummary::default();

    let mut team_ids = Vec::with_capacity(TEAMS.len());
    for name in TEAMS {
        let id = add_team(&tx, name, Some(COUNTRY), Some(LEAGUE))?;
        team_ids.push(id);
        summary.teams.push((id, name.to_string()));
    }

    let mut squads: Vec<Vec<TeamId>> = vec![Vec::new(); TEAMS.len()];
    for (idx, squad) in SQUADS.iter().enumerate() {
        for (name, position) in squad {
            let age = rng.gen_range(20..=34);
            let player = add_player(&tx, name, position, team_ids[idx], Some(age))?;
            squads[idx].push(player);
        }
    }
    summary.players = squads.iter().map(Vec::len).sum();

    let first_day = today - Duration::days(HISTORY_DAYS);
    for n in 0..FINISHED_MATCHES {
        let date = first_day + Duration::days(n as i64 * MATCH_SPACING_DAYS);
        let home = rng.gen_range(0..TEAMS.len());
        let mut away = rng.gen_range(0..TEAMS.len() - 1);
        if away >= home {
            away += 1;
        }
        let home_goals = rng.gen_range(0..=4);
        let away_goals = rng.gen_range(0..=3);
        let match_id = add_match(
            &tx,
            date,
            team_ids[home],
            team_ids[away],
            Some((home_goals, away_goals)),
            MatchStatus::Finished,
        )?;

        let mut home_line = TeamMatchLine {
            goals_for: home_goals,
            goals_against: away_goals,
            shots_on_target: rng.gen_range(3..=12),
            shots_conceded: 0,
            possession: f64::from(rng.gen_range(40u32..=70)),
            corners: rng.gen_range(2..=10),
            yellow_cards: rng.gen_range(0..=4),
            red_cards: rng.gen_range(0..=1),
        };
        let away_line = TeamMatchLine {
            goals_for: away_goals,
            goals_against: home_goals,
            shots_on_target: rng.gen_range(2..=8),
            shots_conceded: home_line.shots_on_target,
            possession: f64::from(rng.gen_range(30u32..=60)),
            corners: rng.gen_range(1..=8),
            yellow_cards: rng.gen_range(0..=4),
            red_cards: rng.gen_range(0..=1),
        };
        home_line.shots_conceded = away_line.shots_on_target;
        record_team_line(&tx, match_id, team_ids[home], &home_line)?;
        record_team_line(&tx, match_id, team_ids[away], &away_line)?;

        for side in [home, away] {
            for &player in &squads[side] {
                if !rng.gen_bool(0.8) {
                    continue;
                }
                let line = random_player_line(rng);
                record_player_line(&tx, match_id, player, &line)?;
            }
        }
        summary.finished_matches += 1;
    }

    for squad in squads.iter().filter(|s| !s.is_empty()) {
        let count = (squad.len() / 5).max(1);
        for &player in squad.choose_multiple(rng, count) {
            let started_on = today - Duration::days(rng.gen_range(1..=30));
            let expected_end = started_on + Duration::days(rng.gen_range(7..=60));
            let kind = INJURY_KINDS[rng.gen_range(0..INJURY_KINDS.len())];
            let severity = SEEDED_SEVERITIES[rng.gen_range(0..SEEDED_SEVERITIES.len())];
            let importance = rng.gen_range(1..=5);
            add_injury(
                &tx,
                player,
                started_on,
                Some(expected_end),
                Some(kind),
                severity,
                importance,
            )?;
            summary.injuries += 1;
        }
    }

    for i in 0..SQUADS.len() {
        for j in (i + 1)..SQUADS.len() {
            for _ in 0..MEETINGS_PER_PAIR {
                let played_on = today - Duration::days(rng.gen_range(30..=365));
                let goals = (rng.gen_range(0..=4), rng.gen_range(0..=3));
                let venue = VENUES[rng.gen_range(0..VENUES.len())];
                add_meeting(&tx, team_ids[i], team_ids[j], played_on, goals, Some(venue))?;
                summary.meetings += 1;
            }
        }
    }

    let tomorrow = today + Duration::days(1);
    for (home, away) in TOMORROW {
        let id = add_match(
            &tx,
            tomorrow,
            team_ids[home],
            team_ids[away],
            None,
            MatchStatus::Scheduled,
        )?;
        summary.fixtures.push(id);
    }

    tx.commit().context("commit seed transaction")?;
    info!(
        teams = summary.teams.len(),
        players = summary.players,
        matches = summary.finished_matches,
        injuries = summary.injuries,
        meetings = summary.meetings,
        fixtures = summary.fixtures.len(),
        "sample league seeded"
    );
    Ok(summary)
}

fn random_player_line(rng: &mut impl Rng) -> PlayerMatchLine {
    PlayerMatchLine {
        goals: if rng.gen_bool(0.15) { rng.gen_range(0..=2) } else { 0 },
        assists: if rng.gen_bool(0.20) { rng.gen_range(0..=1) } else { 0 },
        minutes: rng.gen_range(60..=90),
        yellow_cards: if rng.gen_bool(0.25) { rng.gen_range(0..=1) } else { 0 },
        red_cards: if rng.gen_bool(0.05) { rng.gen_range(0..=1) } else { 0 },
        shots: rng.gen_range(0..=5),
        shots_on_target: rng.gen_range(0..=3),
        pass_completion: f64::from(rng.gen_range(70u32..=95)),
        tackles: rng.gen_range(0..=4),
        interceptions: rng.gen_range(0..=3),
    }
}
