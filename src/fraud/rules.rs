//! Fraud rules.
//!
//! Each rule that fires appends a human-readable flag. A transaction is
//! fraudulent iff at least one flag was produced.
//!
//! # Rules
//!
//! 1. Amount at or above the high-risk threshold, else at or above the suspicious threshold
//! 2. Amount above a multiple of the user's historical average
//! 3. Other locations used by the user within the location window
//! 4. Declined transactions within the declined window reaching the limit
//! 5. Location on the suspicious list
//! 6. Classifier probability at or above the model threshold (when a model is loaded)

use serde::Serialize;
use tracing::debug;

use super::{
    Candidate, UserHistory,
    classifier::FraudClassifier,
    features::FeatureVector,
    money::{format_cents, format_cents_f64},
};

/// Thresholds for the fraud rules, see [`crate::config::Config::fraud_rules`].
#[derive(Debug, Clone)]
pub struct FraudRules {
    pub suspicious_amount_cents: i64,
    pub high_risk_amount_cents: i64,
    pub average_multiplier: f64,
    pub location_window_minutes: i64,
    pub declined_window_minutes: i64,
    pub declined_limit: i64,
    pub suspicious_locations: Vec<String>,
    pub model_threshold: f64,
}

impl Default for FraudRules {
    fn default() -> Self {
        Self {
            suspicious_amount_cents: 1_000_000,
            high_risk_amount_cents: 10_000_000,
            average_multiplier: 5.0,
            location_window_minutes: 5,
            declined_window_minutes: 30,
            declined_limit: 3,
            suspicious_locations: vec![
                "North Korea".to_string(),
                "Unknown".to_string(),
                "Restricted".to_string(),
            ],
            model_threshold: 0.5,
        }
    }
}

/// Outcome of evaluating one transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FraudAssessment {
    pub is_fraudulent: bool,
    pub flags: Vec<String>,
    /// Classifier probability, when a model is loaded
    pub model_confidence: Option<f64>,
}

impl FraudRules {
    /// Evaluate a candidate transaction against the user's history.
    pub fn evaluate(
        &self,
        candidate: &Candidate<'_>,
        history: &UserHistory,
        classifier: Option<&dyn FraudClassifier>,
    ) -> FraudAssessment {
        let mut flags = Vec::new();
        let amount = candidate.amount_cents;

        if amount >= self.high_risk_amount_cents {
            flags.push(format!(
                "Amount {} exceeds high-risk threshold {}",
                format_cents(amount),
                format_cents(self.high_risk_amount_cents)
            ));
        } else if amount >= self.suspicious_amount_cents {
            flags.push(format!(
                "Amount {} exceeds suspicious threshold {}",
                format_cents(amount),
                format_cents(self.suspicious_amount_cents)
            ));
        }

        let average = history.average_amount_cents();
        if average > 0.0 && amount as f64 > average * self.average_multiplier {
            flags.push(format!(
                "Amount {} is more than {}x user's average ({})",
                format_cents(amount),
                self.average_multiplier,
                format_cents_f64(average)
            ));
        }

        if !history.recent_other_locations.is_empty() {
            let mut others: Vec<&str> = history
                .recent_other_locations
                .iter()
                .map(String::as_str)
                .filter(|l| *l != candidate.location)
                .collect();
            others.sort_unstable();
            others.dedup();

            if !others.is_empty() {
                flags.push(format!(
                    "Multiple locations detected within {} minutes: {} and {}",
                    self.location_window_minutes,
                    candidate.location,
                    others.join(", ")
                ));
            }
        }

        if history.recent_declined >= self.declined_limit {
            flags.push(format!(
                "Card declined {} times in the last {} minutes",
                history.recent_declined, self.declined_window_minutes
            ));
        }

        if self
            .suspicious_locations
            .iter()
            .any(|l| l == candidate.location)
        {
            flags.push(format!(
                "Suspicious location detected: {}",
                candidate.location
            ));
        }

        let model_confidence = classifier.map(|classifier| {
            let prediction = classifier.predict(&FeatureVector::extract(candidate, history));
            debug!(
                probability = prediction.probability,
                strongest = prediction.strongest_feature,
                "Classifier prediction"
            );

            if prediction.probability >= self.model_threshold {
                flags.push(format!(
                    "Model flagged transaction (confidence {:.1}%, strongest signal: {})",
                    prediction.probability * 100.0,
                    prediction.strongest_feature
                ));
            }
            prediction.probability
        });

        FraudAssessment {
            is_fraudulent: !flags.is_empty(),
            flags,
            model_confidence,
        }
    }
}
