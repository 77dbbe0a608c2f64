//! Health check endpoint for service monitoring.

use crate::{error::AppError, state::AppState};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
///
/// Returns service status, database connectivity and whether a classifier is loaded.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,

    pub database: String,

    /// `loaded` when a classifier is configured, `rules_only` otherwise
    pub model: String,

    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "database": "connected",
///   "model": "rules_only",
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// If the database is unreachable, returns the standard error response.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;

    let model = if state.classifier.is_some() {
        "loaded"
    } else {
        "rules_only"
    };

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        model: model.to_string(),
        timestamp: Utc::now(),
    }))
}
