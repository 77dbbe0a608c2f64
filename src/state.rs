//! Shared application state.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    db::DbPool,
    fraud::{classifier::FraudClassifier, rules::FraudRules},
    services::{notification_service::Notifier, request_context::LocationResolver},
};

/// State shared with every handler via `State` extraction.
///
/// Cloning is cheap: the pool and all other members are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub rules: Arc<FraudRules>,
    /// `None` when no `MODEL_PATH` is configured
    pub classifier: Option<Arc<dyn FraudClassifier>>,
    pub notifier: Notifier,
    pub locations: LocationResolver,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        config: Config,
        classifier: Option<Arc<dyn FraudClassifier>>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()?;

        Ok(Self {
            rules: Arc::new(config.fraud_rules()),
            notifier: Notifier::new(&config, http.clone()),
            locations: LocationResolver::new(config.geolocation_url.clone(), http),
            classifier,
            pool,
        })
    }
}

/// Lets handlers and middleware that only touch the database keep
/// extracting `State<DbPool>`.
impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}
