//! Transaction HTTP handlers.
//!
//! This module implements the public transaction endpoints:
//! - POST /api/v1/transactions - Submit a transaction for recording and fraud evaluation
//! - GET /api/v1/transactions/:id - Get transaction details and review status

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::transaction::{SubmitTransactionRequest, TransactionResponse},
    services::transaction_service,
    state::AppState,
};

/// Submit a transaction.
///
/// # Request Body
///
/// ```json
/// {
///   "userid": "user1",
///   "amount_cents": 1500000,
///   "location": "Los Angeles",
///   "device_id": "device1"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "id": "770e8400-...",
///   "userid": "user1",
///   "amount_cents": 1500000,
///   "fraud_detected": true,
///   "fraud_flags": ["Amount $15,000.00 exceeds suspicious threshold $10,000.00"],
///   "status": "pending",
///   "created_at": "2025-12-21T16:00:00Z"
/// }
/// ```
///
/// Flagged transactions are `pending` until approved via the SMS link or by an admin.
pub async fn submit_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SubmitTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    let transaction = transaction_service::submit_transaction(&state, request, &headers).await?;

    Ok((StatusCode::CREATED, Json(transaction.into())))
}

/// Get transaction by ID.
///
/// Lets the submitter poll the review status of a flagged transaction.
pub async fn get_transaction(
    State(pool): State<DbPool>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction = transaction_service::get_transaction_by_id(&pool, transaction_id)
        .await?
        .ok_or(AppError::TransactionNotFound)?;

    Ok(Json(transaction.into()))
}
