use proptest::prelude::*;

use matchday_forecast::config::{DrawHeuristic, EngineConfig, HomeAwayPriors};
use matchday_forecast::factors::{
    head_to_head_factor, home_away_factor, injury_factor, player_impact, team_strength,
};
use matchday_forecast::model::{
    HeadToHeadSummary, HomeAwaySplit, InjuryRecord, PlayerRole, PlayerStatsSnapshot, Severity,
    TeamStatsSnapshot, Venue,
};
use matchday_forecast::predictor::{MatchInputs, SideInputs, evaluate};
use matchday_forecast::win_prob::{outcome_probs, pick_outcome};

fn unit(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

fn team_stats() -> impl Strategy<Value = TeamStatsSnapshot> {
    (
        0.0..8.0f64,
        0.0..8.0f64,
        0.0..25.0f64,
        0.0..100.0f64,
        0.0..20.0f64,
        0.0..6.0f64,
        0.0..2.0f64,
        0.0..100.0f64,
        1u32..40,
    )
        .prop_map(|(gf, ga, sot, pos, cor, y, r, cs, n)| TeamStatsSnapshot {
            goals_for_avg: gf,
            goals_against_avg: ga,
            shots_on_target_avg: sot,
            possession_avg: pos,
            corners_avg: cor,
            yellow_cards_avg: y,
            red_cards_avg: r,
            clean_sheet_pct: cs,
            games_count: n,
        })
}

fn player_stats() -> impl Strategy<Value = Option<PlayerStatsSnapshot>> {
    prop::option::of(
        (
            0.0..40.0f64,
            0.0..30.0f64,
            0.0..90.0f64,
            0.0..10.0f64,
            0.0..100.0f64,
            0.0..8.0f64,
            0.0..6.0f64,
            0u32..30,
        )
            .prop_map(|(g, a, min, shots, pass, tk, int, n)| PlayerStatsSnapshot {
                total_goals: g,
                total_assists: a,
                avg_minutes: min,
                avg_shots: shots,
                avg_shots_on_target: shots / 2.0,
                avg_pass_completion: pass,
                avg_tackles: tk,
                avg_interceptions: int,
                games_count: n,
                ..PlayerStatsSnapshot::default()
            }),
    )
}

fn role() -> impl Strategy<Value = PlayerRole> {
    prop_oneof![
        Just(PlayerRole::Attacker),
        Just(PlayerRole::Midfielder),
        Just(PlayerRole::DefenderOrKeeper),
    ]
}

fn injury() -> impl Strategy<Value = InjuryRecord> {
    (
        prop_oneof![
            Just(Severity::Minor),
            Just(Severity::Moderate),
            Just(Severity::Severe),
            Just(Severity::VerySevere),
            Just(Severity::Unspecified),
        ],
        0u8..=9,
    )
        .prop_map(|(s, imp)| InjuryRecord::new(s, imp))
}

fn split() -> impl Strategy<Value = Option<HomeAwaySplit>> {
    prop::option::of((0.0..=1.0f64, 0.0..6.0f64, 0.0..6.0f64).prop_map(|(w, s, c)| {
        HomeAwaySplit {
            win_rate: w,
            avg_goals_scored: s,
            avg_goals_conceded: c,
        }
    }))
}

fn head_to_head() -> impl Strategy<Value = Option<HeadToHeadSummary>> {
    prop::option::of(
        (0u32..10, 0u32..10, 0u32..10, 0.0..5.0f64, 0.0..5.0f64).prop_map(
            |(wa, wb, d, ga, gb)| HeadToHeadSummary {
                total_meetings: wa + wb + d,
                wins_a: wa,
                wins_b: wb,
                draws: d,
                avg_goals_a: ga,
                avg_goals_b: gb,
            },
        ),
    )
}

fn side(name: &'static str) -> impl Strategy<Value = SideInputs> {
    (
        prop::option::of(team_stats()),
        prop::collection::vec((role(), player_stats()), 0..8),
        prop::collection::vec(injury(), 0..5),
        split(),
    )
        .prop_map(move |(stats, squad, injuries, split)| SideInputs {
            name: name.to_string(),
            stats,
            squad,
            injuries,
            split,
        })
}

proptest! {
    #[test]
    fn team_strength_stays_in_unit_interval(stats in team_stats()) {
        prop_assert!(unit(team_strength(Some(&stats))));
    }

    #[test]
    fn player_impact_stays_in_unit_interval(
        squad in prop::collection::vec((role(), player_stats()), 0..12)
    ) {
        let v = player_impact(squad.iter().map(|(r, s)| (*r, s.as_ref())));
        prop_assert!(unit(v));
    }

    #[test]
    fn injury_factor_has_a_floor(injuries in prop::collection::vec(injury(), 0..10)) {
        let v = injury_factor(&injuries);
        prop_assert!((0.1..=1.0).contains(&v));
    }

    #[test]
    fn head_to_head_stays_in_unit_interval(h in head_to_head()) {
        prop_assert!(unit(head_to_head_factor(h.as_ref())));
    }

    #[test]
    fn venue_factor_stays_in_unit_interval(s in split(), home in any::<bool>()) {
        let venue = if home { Venue::Home } else { Venue::Away };
        prop_assert!(unit(home_away_factor(s.as_ref(), venue, &HomeAwayPriors::default())));
    }

    #[test]
    fn probabilities_always_sum_to_one(home in 0.0..=1.0f64, away in 0.0..=1.0f64) {
        let p = outcome_probs(home, away, &DrawHeuristic::default());
        prop_assert!((p.sum() - 1.0).abs() < 1e-9);
        prop_assert!(p.home >= 0.0 && p.draw > 0.0 && p.away >= 0.0);
        let (_, confidence) = pick_outcome(p);
        prop_assert!(confidence >= p.home && confidence >= p.draw && confidence >= p.away);
    }

    #[test]
    fn full_evaluation_is_bounded_and_deterministic(
        home in side("Home"),
        away in side("Away"),
        h2h in head_to_head(),
    ) {
        let inputs = MatchInputs { home, away, head_to_head: h2h };
        let config = EngineConfig::default();
        let r = evaluate(&inputs, &config);
        let b = r.breakdown;
        for f in [
            b.team_strength_home, b.team_strength_away,
            b.player_impact_home, b.player_impact_away,
            b.injury_home, b.injury_away,
            b.head_to_head_home, b.head_to_head_away,
            b.home_factor, b.away_factor,
        ] {
            prop_assert!(unit(f));
        }
        prop_assert!((r.probabilities.sum() - 1.0).abs() < 1e-9);
        prop_assert_eq!(r, evaluate(&inputs, &config));
    }
}
