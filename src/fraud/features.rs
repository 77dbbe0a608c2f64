//! Feature extraction for classifier inference.
//!
//! Produces the seven features the fraud model is trained on, in the exact
//! order the model file lists them.

use chrono::{Datelike, Timelike};

use super::{Candidate, UserHistory};

/// Feature names in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "amount",
    "avg_amount",
    "amount_ratio",
    "transaction_freq",
    "location_freq",
    "hour",
    "day_of_week",
];

pub const FEATURE_COUNT: usize = 7;

/// Model input for one transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Build features for a candidate transaction.
    ///
    /// Averages and counts include the candidate, matching how training rows
    /// are computed over the full transaction table. Amounts are in dollars.
    pub fn extract(candidate: &Candidate<'_>, history: &UserHistory) -> Self {
        let amount = candidate.amount_cents as f64 / 100.0;

        let count = (history.transaction_count + 1) as f64;
        let total = history.total_amount_cents as f64 + candidate.amount_cents as f64;
        let avg_amount = total / count / 100.0;

        let amount_ratio = if avg_amount > 0.0 {
            amount / avg_amount
        } else {
            amount
        };

        Self([
            amount,
            avg_amount,
            amount_ratio,
            history.weekly_count as f64 + 1.0,
            history.location_count as f64 + 1.0,
            candidate.at.hour() as f64,
            // Monday = 0
            candidate.at.weekday().num_days_from_monday() as f64,
        ])
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn first_transaction_has_unit_ratio() {
        let candidate = Candidate {
            amount_cents: 50_000,
            location: "New York",
            // Wednesday
            at: Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap(),
        };

        let features = FeatureVector::extract(&candidate, &UserHistory::default());

        assert_eq!(
            features.values(),
            &[500.0, 500.0, 1.0, 1.0, 1.0, 14.0, 2.0]
        );
    }

    #[test]
    fn includes_candidate_in_aggregates() {
        let candidate = Candidate {
            amount_cents: 100_000,
            location: "New York",
            // Sunday
            at: Utc.with_ymd_and_hms(2025, 1, 19, 3, 0, 0).unwrap(),
        };
        let history = UserHistory {
            transaction_count: 2,
            total_amount_cents: 25_000,
            weekly_count: 2,
            location_count: 2,
            ..Default::default()
        };

        let features = FeatureVector::extract(&candidate, &history).0;

        assert_eq!(features[0], 1000.0);
        assert!((features[1] - 416.6667).abs() < 1e-3);
        assert!((features[2] - 2.4).abs() < 1e-9);
        assert_eq!(features[3], 3.0);
        assert_eq!(features[4], 3.0);
        assert_eq!(features[5], 3.0);
        assert_eq!(features[6], 6.0);
    }

    #[test]
    fn extreme_amounts_do_not_overflow() {
        let candidate = Candidate {
            amount_cents: i64::MAX,
            location: "New York",
            at: Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap(),
        };
        let history = UserHistory {
            transaction_count: 1,
            total_amount_cents: i64::MAX,
            ..Default::default()
        };

        let features = FeatureVector::extract(&candidate, &history);

        assert!(features.values().iter().all(|v| v.is_finite()));
        assert!((features.values()[2] - 1.0).abs() < 1e-9);
    }
}
