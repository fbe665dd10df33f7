use crate::model::{InjuryRecord, Severity};

const FLOOR: f64 = 0.1;

pub fn severity_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Minor => 0.1,
        Severity::Moderate => 0.3,
        Severity::Severe => 0.6,
        Severity::VerySevere => 0.9,
        Severity::Unspecified => 0.3,
    }
}

fn contribution(injury: &InjuryRecord) -> f64 {
    let importance = injury.team_importance.clamp(1, 5) as f64;
    severity_weight(injury.severity) * (importance / 5.0)
}

/// Squad availability: 1.0 with a clean bill of health, never below 0.1.
///
/// The penalty is the mean contribution of the active injuries, so a long
/// list of knocks weighs the same as a single one of equal severity.
pub fn injury_factor(injuries: &[InjuryRecord]) -> f64 {
    if injuries.is_empty() {
        return 1.0;
    }
    let total: f64 = injuries.iter().map(contribution).sum();
    let mean = total / injuries.len() as f64;
    (1.0 - mean).max(FLOOR)
}
