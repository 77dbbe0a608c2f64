//! Pre-trained fraud classifier.
//!
//! The model is trained offline and shipped as a JSON file holding the
//! standardization parameters and the weights of a logistic model:
//!
//! ```json
//! {
//!   "feature_names": ["amount", "avg_amount", "amount_ratio", "transaction_freq",
//!                     "location_freq", "hour", "day_of_week"],
//!   "means": [...], "scales": [...], "weights": [...],
//!   "intercept": -2.1
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};

/// Errors raised while loading a model file.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse model file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model shape mismatch: {0}")]
    Shape(String),
}

/// Output of a single prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Probability that the transaction is fraudulent (0.0 - 1.0)
    pub probability: f64,

    /// Feature with the largest contribution to the score
    pub strongest_feature: &'static str,
}

/// Anything that can score a feature vector.
pub trait FraudClassifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Prediction;
}

/// Standardized logistic model.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticModel {
    feature_names: Vec<String>,
    means: Vec<f64>,
    scales: Vec<f64>,
    weights: Vec<f64>,
    intercept: f64,
}

impl LogisticModel {
    /// Load and validate a model file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let model = Self::from_json(&raw)?;
        info!(path = %path.display(), "Fraud model loaded");
        Ok(model)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let model: LogisticModel = serde_json::from_str(raw)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        for (name, len) in [
            ("feature_names", self.feature_names.len()),
            ("means", self.means.len()),
            ("scales", self.scales.len()),
            ("weights", self.weights.len()),
        ] {
            if len != FEATURE_COUNT {
                return Err(ModelError::Shape(format!(
                    "{name} has {len} entries, expected {FEATURE_COUNT}"
                )));
            }
        }

        if self.feature_names.iter().zip(FEATURE_NAMES).any(|(a, b)| a != b) {
            return Err(ModelError::Shape(format!(
                "feature_names must be {FEATURE_NAMES:?}"
            )));
        }

        Ok(())
    }
}

impl FraudClassifier for LogisticModel {
    fn predict(&self, features: &FeatureVector) -> Prediction {
        let mut logit = self.intercept;
        let mut strongest = (0, f64::MIN);

        for (i, value) in features.values().iter().enumerate() {
            let scale = if self.scales[i] == 0.0 { 1.0 } else { self.scales[i] };
            let contribution = self.weights[i] * (value - self.means[i]) / scale;
            logit += contribution;

            if contribution.abs() > strongest.1 {
                strongest = (i, contribution.abs());
            }
        }

        Prediction {
            probability: 1.0 / (1.0 + (-logit).exp()),
            strongest_feature: FEATURE_NAMES[strongest.0],
        }
    }
}
