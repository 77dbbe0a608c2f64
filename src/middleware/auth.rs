//! Admin key authentication middleware.
//!
//! This middleware intercepts every admin request to:
//! 1. Extract the admin key from the Authorization header
//! 2. Hash it and verify it exists in the database
//! 3. Inject the reviewer identity into the request
//! 4. Reject unauthorized requests with HTTP 401

use crate::{
    db::{DbPool, hash_secret},
    error::AppError,
    models::admin_key::AdminKey,
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

/// Authentication context attached to authenticated admin requests.
///
/// Route handlers extract it with `Extension<AdminContext>`.
#[derive(Debug, Clone)]
pub struct AdminContext {
    /// Recorded as `reviewed_by` when this admin approves or declines
    pub admin_name: String,
}

/// Admin key authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <key>` header from request
/// 2. Hash the `<key>` using SHA-256
/// 3. Query database for matching hash where `is_active = true`
/// 4. If found: inject `AdminContext` into request, call next handler
/// 5. If not found: return 401 Unauthorized error
///
/// Requests without a well-formed header are rejected before any query runs.
pub async fn auth_middleware(
    State(pool): State<DbPool>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let admin_key = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(AppError::InvalidAdminKey)?;

    let key_hash = hash_secret(admin_key);

    let admin = sqlx::query_as::<_, AdminKey>(
        "SELECT id, key_hash, admin_name, created_at, is_active
         FROM admin_keys
         WHERE key_hash = $1 AND is_active = true",
    )
    .bind(&key_hash)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::InvalidAdminKey)?;

    request.extensions_mut().insert(AdminContext {
        admin_name: admin.admin_name,
    });

    Ok(next.run(request).await)
}
