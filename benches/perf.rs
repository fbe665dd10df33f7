use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use chrono::{Duration, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rusqlite::Connection;

use matchday_forecast::config::EngineConfig;
use matchday_forecast::model::{
    HeadToHeadSummary, HomeAwaySplit, InjuryRecord, PlayerRole, PlayerStatsSnapshot, Severity,
    TeamStatsSnapshot,
};
use matchday_forecast::predictor::{MatchInputs, MatchPredictor, SideInputs, evaluate};
use matchday_forecast::seed::seed_sample_league;
use matchday_forecast::store::{SqliteProvider, init_schema};

fn sample_side(name: &str, goals: f64) -> SideInputs {
    let player = PlayerStatsSnapshot {
        total_goals: goals,
        total_assists: 4.0,
        avg_minutes: 80.0,
        avg_shots: 2.5,
        avg_shots_on_target: 1.2,
        avg_pass_completion: 84.0,
        avg_tackles: 1.5,
        avg_interceptions: 1.1,
        games_count: 20,
        ..PlayerStatsSnapshot::default()
    };
    let roles = [
        PlayerRole::Attacker,
        PlayerRole::Attacker,
        PlayerRole::Midfielder,
        PlayerRole::Midfielder,
        PlayerRole::Midfielder,
        PlayerRole::DefenderOrKeeper,
        PlayerRole::DefenderOrKeeper,
        PlayerRole::DefenderOrKeeper,
        PlayerRole::DefenderOrKeeper,
        PlayerRole::DefenderOrKeeper,
        PlayerRole::DefenderOrKeeper,
    ];
    SideInputs {
        name: name.to_string(),
        stats: Some(TeamStatsSnapshot {
            goals_for_avg: goals / 10.0,
            goals_against_avg: 1.1,
            shots_on_target_avg: 5.5,
            possession_avg: 54.0,
            corners_avg: 5.0,
            yellow_cards_avg: 1.8,
            red_cards_avg: 0.1,
            clean_sheet_pct: 30.0,
            games_count: 10,
        }),
        squad: roles.iter().map(|r| (*r, Some(player))).collect(),
        injuries: vec![
            InjuryRecord::new(Severity::Moderate, 3),
            InjuryRecord::new(Severity::Minor, 1),
        ],
        split: Some(HomeAwaySplit {
            win_rate: 0.5,
            avg_goals_scored: 1.6,
            avg_goals_conceded: 1.0,
        }),
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let inputs = MatchInputs {
        home: sample_side("Home", 18.0),
        away: sample_side("Away", 11.0),
        head_to_head: Some(HeadToHeadSummary {
            total_meetings: 8,
            wins_a: 4,
            wins_b: 2,
            draws: 2,
            avg_goals_a: 1.6,
            avg_goals_b: 1.0,
        }),
    };
    let config = EngineConfig::default();
    c.bench_function("evaluate_full_squads", |b| {
        b.iter(|| evaluate(black_box(&inputs), black_box(&config)))
    });
}

fn bench_sqlite_daily(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2025, 6, 27).expect("valid date");
    let conn = Connection::open_in_memory().expect("in-memory sqlite");
    init_schema(&conn).expect("schema");
    seed_sample_league(&conn, &mut StdRng::seed_from_u64(42), today).expect("seed");
    let store = SqliteProvider::new(conn).with_reference_date(today);
    let predictor = MatchPredictor::new(&store, EngineConfig::default());
    let tomorrow = today + Duration::days(1);

    c.bench_function("sqlite_predict_match", |b| {
        b.iter(|| predictor.predict_match(black_box(1), black_box(2)))
    });
    c.bench_function("sqlite_predict_all_scheduled", |b| {
        b.iter(|| predictor.predict_all_scheduled(black_box(tomorrow)))
    });
}

criterion_group!(benches, bench_evaluate, bench_sqlite_daily);
criterion_main!(benches);
