//! Fraud evaluation.
//!
//! The evaluation is a pure function of the configured thresholds, the
//! candidate transaction, and a [`UserHistory`] snapshot loaded from the
//! database beforehand. An optional pre-trained classifier adds its own flag
//! on top of the rule flags.

pub mod classifier;
pub mod features;
pub mod money;
pub mod rules;

use chrono::{DateTime, Utc};

/// Transaction being evaluated, before it is recorded.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub amount_cents: i64,
    pub location: &'a str,
    pub at: DateTime<Utc>,
}

/// Aggregates over a user's previously recorded transactions.
///
/// None of the counts include the candidate itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserHistory {
    /// All recorded transactions of the user
    pub transaction_count: i64,

    /// Sum of `amount_cents` over all recorded transactions
    pub total_amount_cents: i64,

    /// Distinct locations, other than the candidate's, seen within the location window
    pub recent_other_locations: Vec<String>,

    /// Declined transactions within the declined window
    pub recent_declined: i64,

    /// Transactions within the last seven days
    pub weekly_count: i64,

    /// Transactions recorded at the candidate's location
    pub location_count: i64,
}

impl UserHistory {
    /// Mean amount in cents, 0 when the user has no history.
    pub fn average_amount_cents(&self) -> f64 {
        if self.transaction_count > 0 {
            self.total_amount_cents as f64 / self.transaction_count as f64
        } else {
            0.0
        }
    }
}
