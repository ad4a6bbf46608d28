//! Overall-score aggregation over the current analysis report.

use std::collections::BTreeMap;

use crate::types::PhaseResult;

/// Computes the overall score as the arithmetic mean of all phase scores,
/// rounded to one decimal place.
///
/// Every phase present in the report participates: a phase whose score is
/// missing or was non-numeric on the wire contributes 0. An empty report
/// yields 0.0. The overall score is always derived on demand from the
/// current report and never stored.
pub fn overall_score(phases: &BTreeMap<String, PhaseResult>) -> f64 {
    if phases.is_empty() {
        return 0.0;
    }
    let sum: f64 = phases.values().map(|p| p.score.unwrap_or(0.0)).sum();
    let mean = sum / phases.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Formats a score with exactly one decimal place, e.g. `70.0`.
pub fn format_score(score: f64) -> String {
    format!("{score:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(score: Option<f64>) -> PhaseResult {
        PhaseResult {
            score,
            ..Default::default()
        }
    }

    #[test]
    fn empty_report_scores_zero() {
        let phases = BTreeMap::new();
        assert_eq!(overall_score(&phases), 0.0);
        assert_eq!(format_score(overall_score(&phases)), "0.0");
    }

    #[test]
    fn mean_of_present_scores() {
        let mut phases = BTreeMap::new();
        phases.insert("requirements".into(), phase(Some(80.0)));
        phases.insert("design".into(), phase(Some(60.0)));
        assert_eq!(overall_score(&phases), 70.0);
        assert_eq!(format_score(70.0), "70.0");
    }

    #[test]
    fn missing_score_counts_as_zero() {
        let mut phases = BTreeMap::new();
        phases.insert("requirements".into(), phase(Some(80.0)));
        phases.insert("design".into(), phase(None));
        assert_eq!(overall_score(&phases), 40.0);
    }

    #[test]
    fn rounds_to_one_decimal() {
        let mut phases = BTreeMap::new();
        phases.insert("a".into(), phase(Some(85.0)));
        phases.insert("b".into(), phase(Some(90.0)));
        phases.insert("c".into(), phase(Some(78.0)));
        // mean = 84.333..., rounds to 84.3
        assert_eq!(overall_score(&phases), 84.3);
        assert_eq!(format_score(84.3), "84.3");
    }
}
