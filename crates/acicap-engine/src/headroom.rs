//! Headroom arithmetic.

use crate::report::HeadroomEntry;

/// Combine a current count with a resolved ceiling.
///
/// remaining = max(maximum - current, 0); percent_used rounds
/// current / maximum * 100 to one decimal. A zero or missing maximum
/// yields all-null derived fields.
pub fn entry(metric: &str, current: u64, maximum: Option<u64>) -> HeadroomEntry {
    let maximum = maximum.filter(|value| *value > 0);
    let remaining = maximum.map(|max| max.saturating_sub(current));
    let percent_used = maximum.map(|max| {
        let ratio = current as f64 / max as f64;
        (ratio * 1000.0).round() / 10.0
    });
    HeadroomEntry {
        metric: metric.to_string(),
        current,
        maximum,
        remaining,
        percent_used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_remaining_and_percent() {
        let row = entry("epgs", 450, Some(1000));
        assert_eq!(row.remaining, Some(550));
        assert_eq!(row.percent_used, Some(45.0));
    }

    #[test]
    fn percent_rounds_to_one_decimal() {
        let row = entry("tenants", 1, Some(3000));
        assert_eq!(row.percent_used, Some(0.0));
        let row = entry("tenants", 2, Some(3000));
        assert_eq!(row.percent_used, Some(0.1));
    }

    #[test]
    fn over_budget_clamps_remaining_to_zero() {
        let row = entry("vrfs", 120, Some(100));
        assert_eq!(row.remaining, Some(0));
        assert_eq!(row.percent_used, Some(120.0));
    }

    #[test]
    fn missing_or_zero_maximum_stays_null() {
        for maximum in [None, Some(0)] {
            let row = entry("l3outs", 7, maximum);
            assert_eq!(row.maximum, None);
            assert_eq!(row.remaining, None);
            assert_eq!(row.percent_used, None);
            assert_eq!(row.current, 7);
        }
    }
}
