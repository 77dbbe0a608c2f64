//! Approval link handler.
//!
//! - GET /approve/:token - Approve a flagged transaction from the SMS link

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    db::DbPool, error::AppError, models::transaction::TransactionResponse,
    services::transaction_service,
};

/// Approve the flagged transaction the token was issued for.
///
/// This is a `GET` because it is opened straight from an SMS. The token is
/// single-use; a second visit returns 404.
///
/// # Response
///
/// - **200 OK**: The approved transaction
/// - **404**: Token malformed, unknown, or already used
pub async fn approve_with_token(
    State(pool): State<DbPool>,
    Path(token): Path<String>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction = transaction_service::approve_by_token(&pool, &token).await?;

    Ok(Json(transaction.into()))
}
