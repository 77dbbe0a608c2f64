//! HTTP router assembly.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, middleware, state::AppState};

/// Build the application router.
///
/// # Routes
///
/// Public:
/// - `GET /health`
/// - `POST /api/v1/users`
/// - `POST /api/v1/transactions`
/// - `GET /api/v1/transactions/{id}`
/// - `GET /approve/{token}`
///
/// Admin (requires `Authorization: Bearer <admin key>`):
/// - `GET /api/v1/admin/users`, `GET /api/v1/admin/users/{userid}`
/// - `GET /api/v1/admin/transactions`
/// - `POST /api/v1/admin/transactions/{id}/approve`
/// - `POST /api/v1/admin/transactions/{id}/decline`
pub fn router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/api/v1/admin/users", get(handlers::admin::list_users))
        .route("/api/v1/admin/users/{userid}", get(handlers::admin::get_user))
        .route(
            "/api/v1/admin/transactions",
            get(handlers::admin::list_transactions),
        )
        .route(
            "/api/v1/admin/transactions/{id}/approve",
            post(handlers::admin::approve_transaction),
        )
        .route(
            "/api/v1/admin/transactions/{id}/decline",
            post(handlers::admin::decline_transaction),
        )
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/users", post(handlers::users::register_user))
        .route(
            "/api/v1/transactions",
            post(handlers::transactions::submit_transaction),
        )
        .route(
            "/api/v1/transactions/{id}",
            get(handlers::transactions::get_transaction),
        )
        .route(
            "/approve/{token}",
            get(handlers::approvals::approve_with_token),
        )
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
