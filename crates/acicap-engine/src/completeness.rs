//! Class coverage scoring.

use std::collections::BTreeMap;

use crate::classes::{OPTIONAL_CLASSES, REQUIRED_CLASSES};
use crate::report::CompletenessReport;

/// Weight of the required class list in the score; optional classes take
/// the remainder. The split is what makes a missing required class a
/// stronger signal than a missing optional one.
const REQUIRED_WEIGHT: f64 = 70.0;
const OPTIONAL_WEIGHT: f64 = 30.0;

/// Rate class coverage from raw per-class counts.
pub fn score(class_counts: &BTreeMap<String, u64>) -> CompletenessReport {
    let missing_required = missing(&REQUIRED_CLASSES, class_counts);
    let missing_optional = missing(&OPTIONAL_CLASSES, class_counts);

    let present_required = REQUIRED_CLASSES.len() - missing_required.len();
    let present_optional = OPTIONAL_CLASSES.len() - missing_optional.len();

    let required_score =
        present_required as f64 / REQUIRED_CLASSES.len() as f64 * REQUIRED_WEIGHT;
    let optional_score =
        present_optional as f64 / OPTIONAL_CLASSES.len() as f64 * OPTIONAL_WEIGHT;

    CompletenessReport {
        completeness_score: (required_score + optional_score).round() as u8,
        missing_required,
        missing_optional,
        class_counts: class_counts.clone(),
    }
}

fn missing(classes: &[&str], class_counts: &BTreeMap<String, u64>) -> Vec<String> {
    classes
        .iter()
        .filter(|class| class_counts.get(**class).copied().unwrap_or(0) == 0)
        .map(|class| class.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(classes: &[&str]) -> BTreeMap<String, u64> {
        classes
            .iter()
            .map(|class| (class.to_string(), 1))
            .collect()
    }

    #[test]
    fn empty_index_scores_zero() {
        let report = score(&BTreeMap::new());
        assert_eq!(report.completeness_score, 0);
        assert_eq!(report.missing_required.len(), REQUIRED_CLASSES.len());
        assert_eq!(report.missing_optional.len(), OPTIONAL_CLASSES.len());
    }

    #[test]
    fn full_coverage_scores_one_hundred() {
        let all: Vec<&str> = REQUIRED_CLASSES
            .iter()
            .chain(OPTIONAL_CLASSES.iter())
            .copied()
            .collect();
        let report = score(&counts(&all));
        assert_eq!(report.completeness_score, 100);
        assert!(report.missing_required.is_empty());
        assert!(report.missing_optional.is_empty());
    }

    #[test]
    fn required_classes_weigh_more_than_optional() {
        let report = score(&counts(&REQUIRED_CLASSES));
        assert_eq!(report.completeness_score, 70);
        let report = score(&counts(&OPTIONAL_CLASSES));
        assert_eq!(report.completeness_score, 30);
    }

    #[test]
    fn score_is_monotonic_in_coverage() {
        let mut previous = 0;
        let mut present: Vec<&str> = Vec::new();
        for class in REQUIRED_CLASSES.iter().chain(OPTIONAL_CLASSES.iter()) {
            present.push(class);
            let current = score(&counts(&present)).completeness_score;
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn zero_count_classes_are_missing() {
        let mut class_counts = counts(&["fabricNode"]);
        class_counts.insert("fvTenant".to_string(), 0);
        let report = score(&class_counts);
        assert!(report
            .missing_required
            .contains(&"fvTenant".to_string()));
        assert!(!report
            .missing_required
            .contains(&"fabricNode".to_string()));
    }
}
