use chrono::NaiveDate;

use matchday_forecast::config::EngineConfig;
use matchday_forecast::model::{
    Fixture, HeadToHeadSummary, HomeAwaySplit, InjuryRecord, Outcome, PlayerRole,
    PlayerStatsSnapshot, Severity, TeamStatsSnapshot, Venue,
};
use matchday_forecast::predictor::MatchPredictor;
use matchday_forecast::provider::{InMemoryProvider, ProviderError};

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn strong_form() -> TeamStatsSnapshot {
    TeamStatsSnapshot {
        goals_for_avg: 2.4,
        goals_against_avg: 0.6,
        shots_on_target_avg: 7.0,
        possession_avg: 62.0,
        corners_avg: 7.0,
        yellow_cards_avg: 1.2,
        red_cards_avg: 0.1,
        clean_sheet_pct: 50.0,
        games_count: 10,
    }
}

fn weak_form() -> TeamStatsSnapshot {
    TeamStatsSnapshot {
        goals_for_avg: 0.7,
        goals_against_avg: 2.1,
        shots_on_target_avg: 2.5,
        possession_avg: 41.0,
        corners_avg: 3.0,
        yellow_cards_avg: 2.8,
        red_cards_avg: 0.3,
        clean_sheet_pct: 10.0,
        games_count: 10,
    }
}

fn striker(goals: f64) -> PlayerStatsSnapshot {
    PlayerStatsSnapshot {
        total_goals: goals,
        total_assists: 3.0,
        avg_minutes: 82.0,
        avg_shots: 3.0,
        avg_shots_on_target: 1.6,
        avg_pass_completion: 78.0,
        games_count: 15,
        ..PlayerStatsSnapshot::default()
    }
}

fn league() -> InMemoryProvider {
    let mut p = InMemoryProvider::new();
    p.add_team(1, "SL Benfica")
        .add_team(2, "Boavista FC")
        .add_team(3, "Casa Pia AC")
        .set_team_stats(1, strong_form())
        .set_team_stats(2, weak_form())
        .add_player(1, 10, PlayerRole::Attacker, Some(striker(12.0)))
        .add_player(1, 11, PlayerRole::Midfielder, None)
        .add_player(2, 20, PlayerRole::Attacker, Some(striker(2.0)))
        .add_injury(2, InjuryRecord::new(Severity::Severe, 4))
        .set_split(
            1,
            Venue::Home,
            HomeAwaySplit {
                win_rate: 0.8,
                avg_goals_scored: 2.5,
                avg_goals_conceded: 0.5,
            },
        )
        .set_split(
            2,
            Venue::Away,
            HomeAwaySplit {
                win_rate: 0.1,
                avg_goals_scored: 0.6,
                avg_goals_conceded: 2.0,
            },
        )
        .set_head_to_head(
            1,
            2,
            HeadToHeadSummary {
                total_meetings: 5,
                wins_a: 4,
                wins_b: 0,
                draws: 1,
                avg_goals_a: 2.2,
                avg_goals_b: 0.4,
            },
        )
        .add_fixture(Fixture {
            id: 100,
            date: day("2025-06-28"),
            home_team: 1,
            away_team: 2,
        })
        .add_fixture(Fixture {
            id: 101,
            date: day("2025-06-28"),
            home_team: 3,
            away_team: 1,
        })
        .add_fixture(Fixture {
            id: 102,
            date: day("2025-06-29"),
            home_team: 2,
            away_team: 3,
        });
    p
}

#[test]
fn strong_home_side_is_favoured() {
    let provider = league();
    let predictor = MatchPredictor::new(&provider, EngineConfig::default());
    let r = predictor.predict_match(1, 2).unwrap();

    assert_eq!(r.home_team, "SL Benfica");
    assert_eq!(r.away_team, "Boavista FC");
    assert_eq!(r.primary_outcome, Outcome::HomeWin);
    assert_eq!(r.confidence, r.probabilities.home);
    assert!(r.final_scores.home > r.final_scores.away);
    assert!(r.breakdown.team_strength_home > r.breakdown.team_strength_away);
    assert!(r.breakdown.head_to_head_home > 0.5);
    assert!((r.breakdown.head_to_head_home + r.breakdown.head_to_head_away - 1.0).abs() < 1e-12);
    assert!(r.breakdown.injury_away < 1.0);
    assert_eq!(r.breakdown.injury_home, 1.0);
    assert!((r.probabilities.sum() - 1.0).abs() < 1e-9);
}

#[test]
fn repeated_predictions_are_identical() {
    let provider = league();
    let predictor = MatchPredictor::new(&provider, EngineConfig::default());
    let a = predictor.predict_match(1, 2).unwrap();
    let b = predictor.predict_match(1, 2).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.probabilities.home.to_bits(), b.probabilities.home.to_bits());
}

#[test]
fn team_with_no_data_gets_neutral_factors() {
    let provider = league();
    let predictor = MatchPredictor::new(&provider, EngineConfig::default());
    let r = predictor.predict_match(3, 2).unwrap();
    assert_eq!(r.breakdown.team_strength_home, 0.5);
    assert_eq!(r.breakdown.player_impact_home, 0.5);
    assert_eq!(r.breakdown.injury_home, 1.0);
    assert_eq!(r.breakdown.head_to_head_home, 0.5);
    assert_eq!(r.breakdown.home_factor, 0.6);
}

#[test]
fn daily_run_covers_only_that_date_in_order() {
    let provider = league();
    let predictor = MatchPredictor::new(&provider, EngineConfig::default());
    let results = predictor.predict_all_scheduled(day("2025-06-28")).unwrap();
    let ids = results.iter().map(|r| r.fixture_id).collect::<Vec<_>>();
    assert_eq!(ids, vec![Some(100), Some(101)]);
    assert_eq!(results[1].home_team, "Casa Pia AC");

    let empty = predictor.predict_all_scheduled(day("2025-07-01")).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn parallel_daily_run_matches_sequential() {
    let provider = league();
    let predictor = MatchPredictor::new(&provider, EngineConfig::default());
    let fixtures = [
        Fixture {
            id: 100,
            date: day("2025-06-28"),
            home_team: 1,
            away_team: 2,
        },
        Fixture {
            id: 102,
            date: day("2025-06-29"),
            home_team: 2,
            away_team: 3,
        },
    ];
    let par = predictor.predict_fixtures_par(&fixtures).unwrap();
    let seq = fixtures
        .iter()
        .map(|f| predictor.predict_fixture(f).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(par, seq);
}

#[test]
fn unknown_fixture_team_fails_the_daily_run() {
    let mut provider = league();
    provider.add_fixture(Fixture {
        id: 200,
        date: day("2025-06-30"),
        home_team: 1,
        away_team: 77,
    });
    let predictor = MatchPredictor::new(&provider, EngineConfig::default());
    let err = predictor.predict_all_scheduled(day("2025-06-30")).unwrap_err();
    assert!(matches!(err, ProviderError::NotFound { id: 77, .. }));
}

#[test]
fn custom_weights_flow_into_scores() {
    let provider = league();
    let mut config = EngineConfig::default();
    config.weights.team_strength = 0.0;
    config.weights.player_impact = 0.0;
    config.weights.injury = 1.0;
    config.weights.head_to_head = 0.0;
    config.weights.home_away = 0.0;
    config.validate().unwrap();

    let predictor = MatchPredictor::new(&provider, config);
    let r = predictor.predict_match(1, 2).unwrap();
    assert!((r.final_scores.home - 1.0).abs() < 1e-12);
    assert!((r.final_scores.away - r.breakdown.injury_away).abs() < 1e-12);
}
