use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::config::Weights;
use crate::model::{InjuryRecord, PredictionResult, TeamStatsSnapshot};

enum Cell {
    Text(String),
    Number(f64),
}

fn pct(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Multi-line plain text report for one prediction.
pub fn render_prediction(result: &PredictionResult, weights: &Weights) -> String {
    let p = &result.probabilities;
    let b = &result.breakdown;
    let home_label = format!("{} win", result.home_team);
    let away_label = format!("{} win", result.away_team);
    let width = home_label
        .chars()
        .count()
        .max(away_label.chars().count())
        .max(4)
        + 1;

    let mut lines = vec![
        format!("{} vs {}", result.home_team, result.away_team),
        format!(
            "Prediction: {} (confidence {})",
            result.headline(),
            pct(result.confidence)
        ),
        String::new(),
        "Probabilities:".to_string(),
        format!("  {:<width$} {:>6}", format!("{home_label}:"), pct(p.home), width = width),
        format!("  {:<width$} {:>6}", "Draw:", pct(p.draw), width = width),
        format!("  {:<width$} {:>6}", format!("{away_label}:"), pct(p.away), width = width),
        String::new(),
        format!("  {:<16} {:>7} {:>7} {:>7}", "Factor", "home", "away", "weight"),
    ];

    let rows = [
        ("Team strength", b.team_strength_home, b.team_strength_away, weights.team_strength),
        ("Player impact", b.player_impact_home, b.player_impact_away, weights.player_impact),
        ("Injuries", b.injury_home, b.injury_away, weights.injury),
        ("Head-to-head", b.head_to_head_home, b.head_to_head_away, weights.head_to_head),
        ("Home/away", b.home_factor, b.away_factor, weights.home_away),
    ];
    for (name, home, away, weight) in rows {
        lines.push(format!(
            "  {:<16} {:>7.3} {:>7.3} {:>7}",
            name,
            home,
            away,
            format!("{:.0}%", weight * 100.0)
        ));
    }
    lines.push(format!(
        "  {:<16} {:>7.3} {:>7.3}",
        "Final score", result.final_scores.home, result.final_scores.away
    ));
    lines.join("\n")
}

/// Recent-form summary for one team over its lookback window.
pub fn render_team_form(team: &str, stats: Option<&TeamStatsSnapshot>) -> String {
    let Some(s) = stats else {
        return format!("{team}: no finished matches in the window");
    };
    [
        format!("{team}: form over {} games", s.games_count),
        format!("  {:<24} {:>6.2}", "Goals for per match", s.goals_for_avg),
        format!("  {:<24} {:>6.2}", "Goals against per match", s.goals_against_avg),
        format!(
            "  {:<24} {:>+6.2}",
            "Goal difference",
            s.goals_for_avg - s.goals_against_avg
        ),
        format!("  {:<24} {:>6.1}%", "Clean sheets", s.clean_sheet_pct),
        format!("  {:<24} {:>6}", "Games analysed", s.games_count),
    ]
    .join("\n")
}

pub fn render_injury_report(team: &str, injuries: &[InjuryRecord]) -> String {
    if injuries.is_empty() {
        return format!("{team}: no active injuries");
    }
    let mut lines = vec![format!("{team}: active injuries ({})", injuries.len())];
    for injury in injuries {
        let until = injury
            .expected_end
            .map(|d| format!("until {d}"))
            .unwrap_or_else(|| "open-ended".to_string());
        lines.push(format!(
            "  {:<22} {:<10} {:<12} importance {}  {}",
            injury.player_name.as_deref().unwrap_or("unknown player"),
            injury.kind.as_deref().unwrap_or("-"),
            injury.severity.as_str(),
            injury.team_importance,
            until
        ));
    }
    lines.join("\n")
}

pub fn predictions_to_json(results: &[PredictionResult]) -> Result<String> {
    serde_json::to_string_pretty(results).context("serialize predictions")
}

/// One row per prediction on a single "Predictions" sheet.
pub fn export_predictions_xlsx(path: &Path, results: &[PredictionResult]) -> Result<()> {
    let header = [
        "Fixture",
        "Home",
        "Away",
        "Prediction",
        "Confidence",
        "P(home)",
        "P(draw)",
        "P(away)",
        "Score home",
        "Score away",
        "Strength home",
        "Strength away",
        "Players home",
        "Players away",
        "Injuries home",
        "Injuries away",
        "H2H home",
        "H2H away",
        "Venue home",
        "Venue away",
    ];

    let rows = results
        .iter()
        .map(|r| {
            let b = &r.breakdown;
            let mut row = vec![
                r.fixture_id
                    .map(|id| Cell::Number(id as f64))
                    .unwrap_or_else(|| Cell::Text(String::new())),
                Cell::Text(r.home_team.clone()),
                Cell::Text(r.away_team.clone()),
                Cell::Text(r.headline()),
            ];
            row.extend(
                [
                    r.confidence,
                    r.probabilities.home,
                    r.probabilities.draw,
                    r.probabilities.away,
                    r.final_scores.home,
                    r.final_scores.away,
                    b.team_strength_home,
                    b.team_strength_away,
                    b.player_impact_home,
                    b.player_impact_away,
                    b.injury_home,
                    b.injury_away,
                    b.head_to_head_home,
                    b.head_to_head_away,
                    b.home_factor,
                    b.away_factor,
                ]
                .into_iter()
                .map(Cell::Number),
            );
            row
        })
        .collect::<Vec<_>>();

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Predictions")?;
        let bold = Format::new().set_bold();
        for (col, title) in header.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, *title, &bold)
                .with_context(|| format!("write header ({col})"))?;
        }
        write_rows(sheet, 1, &rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, first_row: u32, rows: &[Vec<Cell>]) -> Result<()> {
    for (idx, row) in rows.iter().enumerate() {
        let row_idx = first_row + idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(value) => worksheet.write_string(row_idx, col_idx as u16, value),
                Cell::Number(value) => worksheet.write_number(row_idx, col_idx as u16, *value),
            }
            .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
