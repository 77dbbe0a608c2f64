//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

use crate::fraud::rules::FraudRules;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `PUBLIC_BASE_URL` (optional): Base URL used to build approval links
/// - `BOOTSTRAP_ADMIN_KEY` / `BOOTSTRAP_ADMIN_NAME` (optional): Admin key registered at startup
/// - Fraud thresholds (optional): see [`Config::fraud_rules`]
/// - `MODEL_PATH` / `MODEL_THRESHOLD` (optional): Pre-trained classifier
/// - `GEOLOCATION_URL` (optional): URL template with an `{ip}` placeholder
/// - `ALERT_WEBHOOK_URL` / `ALERT_WEBHOOK_SECRET` (optional): Signed alert delivery
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    pub bootstrap_admin_key: Option<String>,

    #[serde(default = "default_admin_name")]
    pub bootstrap_admin_name: String,

    #[serde(default = "default_suspicious_amount")]
    pub suspicious_amount_cents: i64,

    #[serde(default = "default_high_risk_amount")]
    pub high_risk_amount_cents: i64,

    #[serde(default = "default_average_multiplier")]
    pub average_multiplier: f64,

    #[serde(default = "default_location_window")]
    pub location_window_minutes: i64,

    #[serde(default = "default_declined_window")]
    pub declined_window_minutes: i64,

    #[serde(default = "default_declined_limit")]
    pub declined_limit: i64,

    /// Comma-separated in the environment, e.g. `North Korea,Unknown`
    #[serde(default = "default_suspicious_locations")]
    pub suspicious_locations: Vec<String>,

    pub model_path: Option<String>,

    #[serde(default = "default_model_threshold")]
    pub model_threshold: f64,

    pub geolocation_url: Option<String>,

    pub alert_webhook_url: Option<String>,

    pub alert_webhook_secret: Option<String>,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_public_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_admin_name() -> String {
    "admin".to_string()
}

/// $10,000.00
fn default_suspicious_amount() -> i64 {
    1_000_000
}

/// $100,000.00
fn default_high_risk_amount() -> i64 {
    10_000_000
}

fn default_average_multiplier() -> f64 {
    5.0
}

fn default_location_window() -> i64 {
    5
}

fn default_declined_window() -> i64 {
    30
}

fn default_declined_limit() -> i64 {
    3
}

fn default_suspicious_locations() -> Vec<String> {
    vec![
        "North Korea".to_string(),
        "Unknown".to_string(),
        "Restricted".to_string(),
    ]
}

fn default_model_threshold() -> f64 {
    0.5
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }

    /// Thresholds used by the fraud evaluation routine.
    pub fn fraud_rules(&self) -> FraudRules {
        FraudRules {
            suspicious_amount_cents: self.suspicious_amount_cents,
            high_risk_amount_cents: self.high_risk_amount_cents,
            average_multiplier: self.average_multiplier,
            location_window_minutes: self.location_window_minutes,
            declined_window_minutes: self.declined_window_minutes,
            declined_limit: self.declined_limit,
            suspicious_locations: self.suspicious_locations.clone(),
            model_threshold: self.model_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config: Config =
            envy::from_iter(vars(&[("DATABASE_URL", "postgres://localhost/fraud")])).unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.suspicious_amount_cents, 1_000_000);
        assert_eq!(config.high_risk_amount_cents, 10_000_000);
        assert_eq!(config.declined_limit, 3);
        assert_eq!(
            config.suspicious_locations,
            vec!["North Korea", "Unknown", "Restricted"]
        );
        assert!(config.model_path.is_none());
        assert!(config.bootstrap_admin_key.is_none());
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let result = envy::from_iter::<_, Config>(vars(&[("SERVER_PORT", "8080")]));
        assert!(result.is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let config: Config = envy::from_iter(vars(&[
            ("DATABASE_URL", "postgres://localhost/fraud"),
            ("SERVER_PORT", "8080"),
            ("AVERAGE_MULTIPLIER", "3.5"),
            ("SUSPICIOUS_LOCATIONS", "Atlantis,Mordor"),
            ("MODEL_PATH", "/models/fraud.json"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.average_multiplier, 3.5);
        assert_eq!(config.suspicious_locations, vec!["Atlantis", "Mordor"]);
        assert_eq!(config.model_path.as_deref(), Some("/models/fraud.json"));

        let rules = config.fraud_rules();
        assert_eq!(rules.average_multiplier, 3.5);
        assert_eq!(rules.suspicious_locations.len(), 2);
    }
}
