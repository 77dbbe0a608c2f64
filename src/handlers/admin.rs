//! Admin HTTP handlers.
//!
//! All routes here sit behind the admin key middleware:
//! - GET /api/v1/admin/users - List registered users
//! - GET /api/v1/admin/users/:userid - Get a registered user
//! - GET /api/v1/admin/transactions - List transactions (filter by status, userid)
//! - POST /api/v1/admin/transactions/:id/approve - Approve a pending transaction
//! - POST /api/v1/admin/transactions/:id/decline - Decline a pending transaction

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AdminContext,
    models::{
        transaction::{ListTransactionsQuery, TransactionResponse},
        user::UserResponse,
    },
    services::{transaction_service, user_service},
};

/// List registered users, newest first.
pub async fn list_users(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = user_service::list_users(&pool).await?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Get a registered user by external user id.
pub async fn get_user(
    State(pool): State<DbPool>,
    Path(userid): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_service::get_user_by_userid(&pool, &userid)
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(user.into()))
}

/// List transactions.
///
/// # Query Parameters
///
/// - `status`: `approved`, `pending` or `declined`
/// - `userid`: Only this user's transactions
/// - `limit`: 1 to 500, defaults to 100
///
/// `GET /api/v1/admin/transactions?status=pending` is the review queue.
pub async fn list_transactions(
    State(pool): State<DbPool>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    let transactions = transaction_service::list_transactions(&pool, &query).await?;

    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}

/// Approve a pending transaction.
///
/// # Response
///
/// - **200 OK**: The approved transaction
/// - **404**: Transaction not found
/// - **409**: Transaction is not pending
pub async fn approve_transaction(
    State(pool): State<DbPool>,
    Extension(admin): Extension<AdminContext>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction =
        transaction_service::approve_transaction(&pool, transaction_id, &admin.admin_name).await?;

    Ok(Json(transaction.into()))
}

/// Decline a pending transaction.
///
/// Declined transactions feed the declined-card rule for the same user.
pub async fn decline_transaction(
    State(pool): State<DbPool>,
    Extension(admin): Extension<AdminContext>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction =
        transaction_service::decline_transaction(&pool, transaction_id, &admin.admin_name).await?;

    Ok(Json(transaction.into()))
}
