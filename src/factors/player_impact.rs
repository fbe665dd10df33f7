use crate::model::{PlayerRole, PlayerStatsSnapshot};

use super::{NEUTRAL, clamp};

/// Raw per-player contribution before normalisation, or `None` when the
/// player has no finished games in the window.
pub fn player_raw_impact(role: PlayerRole, s: &PlayerStatsSnapshot) -> Option<f64> {
    if s.games_count == 0 {
        return None;
    }
    let games = s.games_count as f64;
    let raw = match role {
        PlayerRole::Attacker => (0.6 * s.total_goals + 0.4 * s.total_assists) / games,
        // Assists are a window total here while the other terms are per match.
        PlayerRole::Midfielder => {
            0.4 * s.total_assists + 0.3 * (s.avg_pass_completion / 100.0) + 0.3 * s.avg_tackles
        }
        PlayerRole::DefenderOrKeeper => {
            (0.4 * s.avg_tackles + 0.4 * s.avg_interceptions
                - 0.1 * s.total_yellow
                - 0.3 * s.total_red)
                / games
        }
    };
    Some(raw)
}

/// Mean normalised impact across the squad.
///
/// Each qualifying player's raw impact is halved and clamped into `[0, 1]`.
/// Players without games are skipped; an empty or fully unqualified squad is
/// neutral.
pub fn player_impact<'a, I>(squad: I) -> f64
where
    I: IntoIterator<Item = (PlayerRole, Option<&'a PlayerStatsSnapshot>)>,
{
    let mut total = 0.0;
    let mut counted = 0usize;

    for (role, stats) in squad {
        let Some(raw) = stats.and_then(|s| player_raw_impact(role, s)) else {
            continue;
        };
        total += clamp(raw / 2.0, 0.0, 1.0);
        counted += 1;
    }

    if counted == 0 {
        NEUTRAL
    } else {
        total / counted as f64
    }
}
