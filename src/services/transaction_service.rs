//! Transaction service - Core business logic for recording and reviewing transactions.
//!
//! This service handles:
//! - Fraud evaluation before a transaction is recorded
//! - Approval token issuance for flagged transactions
//! - Review transitions (approve, decline, approve via link)
//!
//! # Review Transitions
//!
//! Only `pending` transactions change status. Each transition is a single
//! `UPDATE ... WHERE status = 'pending'`, so concurrent reviews of the same
//! transaction cannot both succeed.

use axum::http::HeaderMap;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{DbPool, hash_secret},
    error::AppError,
    fraud::Candidate,
    models::transaction::{
        ListTransactionsQuery, SubmitTransactionRequest, Transaction, TransactionStatus,
    },
    services::{history_service, request_context, user_service},
    state::AppState,
};

/// Reviewer recorded when a transaction is approved through the SMS link.
pub const LINK_REVIEWER: &str = "approval-link";

/// Record a transaction and evaluate it for fraud.
///
/// # Process
///
/// 1. Validate the request
/// 2. Resolve device and location (body, then request headers)
/// 3. Load the user's history and evaluate the fraud rules
/// 4. For flagged transactions, look up the registered user to alert
/// 5. Insert as `approved` when clean, or `pending` with an approval token when flagged
/// 6. Dispatch the fraud alert in the background for registered users
///
/// # Errors
///
/// - `InvalidRequest`: Validation failed
/// - `Database`: Database error occurred
pub async fn submit_transaction(
    state: &AppState,
    request: SubmitTransactionRequest,
    headers: &HeaderMap,
) -> Result<Transaction, AppError> {
    request.validate()?;

    let userid = request.userid.trim().to_string();
    let device_id = request_context::device_id(request.device_id, headers);
    let location = state.locations.resolve(request.location, headers).await;
    let now = Utc::now();

    let history =
        history_service::load_user_history(&state.pool, &state.rules, &userid, &location, now)
            .await?;

    let candidate = Candidate {
        amount_cents: request.amount_cents,
        location: &location,
        at: now,
    };
    let assessment = state
        .rules
        .evaluate(&candidate, &history, state.classifier.as_deref());

    let (status, approval_token) = if assessment.is_fraudulent {
        (TransactionStatus::Pending, Some(generate_approval_token()))
    } else {
        (TransactionStatus::Approved, None)
    };

    // Resolved before the insert so a failed lookup leaves nothing recorded.
    let alert_recipient = if assessment.is_fraudulent {
        user_service::get_user_by_userid(&state.pool, &userid).await?
    } else {
        None
    };

    let fraud_flags = if assessment.flags.is_empty() {
        None
    } else {
        Some(serde_json::json!(assessment.flags))
    };

    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (
            userid,
            amount_cents,
            device_id,
            location,
            created_at,
            is_fraudulent,
            fraud_flags,
            model_confidence,
            status,
            approval_token_hash
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(&userid)
    .bind(request.amount_cents)
    .bind(&device_id)
    .bind(&location)
    .bind(now)
    .bind(assessment.is_fraudulent)
    .bind(fraud_flags)
    .bind(assessment.model_confidence)
    .bind(status.as_str())
    .bind(approval_token.as_deref().map(hash_secret))
    .fetch_one(&state.pool)
    .await?;

    if let Some(token) = approval_token {
        tracing::warn!(
            transaction_id = %transaction.id,
            userid = %userid,
            flags = assessment.flags.len(),
            "Transaction flagged as fraudulent"
        );

        match alert_recipient {
            Some(user) => state.notifier.dispatch(user, transaction.clone(), token),
            None => tracing::warn!(
                userid = %userid,
                "Flagged transaction for unregistered user, no alert sent"
            ),
        }
    } else {
        tracing::info!(transaction_id = %transaction.id, userid = %userid, "Transaction approved");
    }

    Ok(transaction)
}

/// Get transaction by ID.
pub async fn get_transaction_by_id(
    pool: &DbPool,
    transaction_id: Uuid,
) -> Result<Option<Transaction>, AppError> {
    let transaction = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
        .bind(transaction_id)
        .fetch_optional(pool)
        .await?;

    Ok(transaction)
}

/// List transactions, newest first, optionally filtered by status and user.
pub async fn list_transactions(
    pool: &DbPool,
    query: &ListTransactionsQuery,
) -> Result<Vec<Transaction>, AppError> {
    let limit = query.limit()?;

    let transactions = sqlx::query_as::<_, Transaction>(
        r#"
        SELECT * FROM transactions
        WHERE ($1::TEXT IS NULL OR status = $1)
          AND ($2::TEXT IS NULL OR userid = $2)
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(query.status.map(|s| s.as_str()))
    .bind(query.userid.as_deref())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(transactions)
}

/// Approve a pending transaction.
pub async fn approve_transaction(
    pool: &DbPool,
    transaction_id: Uuid,
    reviewer: &str,
) -> Result<Transaction, AppError> {
    review_transaction(pool, transaction_id, TransactionStatus::Approved, reviewer).await
}

/// Decline a pending transaction.
///
/// Declined transactions count toward the declined-card rule for later submissions.
pub async fn decline_transaction(
    pool: &DbPool,
    transaction_id: Uuid,
    reviewer: &str,
) -> Result<Transaction, AppError> {
    review_transaction(pool, transaction_id, TransactionStatus::Declined, reviewer).await
}

async fn review_transaction(
    pool: &DbPool,
    transaction_id: Uuid,
    decision: TransactionStatus,
    reviewer: &str,
) -> Result<Transaction, AppError> {
    let reviewed = sqlx::query_as::<_, Transaction>(
        r#"
        UPDATE transactions
        SET status = $1,
            reviewed_by = $2,
            reviewed_at = NOW(),
            approval_token_hash = NULL
        WHERE id = $3 AND status = $4
        RETURNING *
        "#,
    )
    .bind(decision.as_str())
    .bind(reviewer)
    .bind(transaction_id)
    .bind(TransactionStatus::Pending.as_str())
    .fetch_optional(pool)
    .await?;

    match reviewed {
        Some(transaction) => {
            tracing::info!(
                transaction_id = %transaction.id,
                status = decision.as_str(),
                reviewer = %reviewer,
                "Transaction reviewed"
            );
            Ok(transaction)
        }
        None => match get_transaction_by_id(pool, transaction_id).await? {
            Some(_) => Err(AppError::TransactionNotPending),
            None => Err(AppError::TransactionNotFound),
        },
    }
}

/// Approve the pending transaction an approval link was issued for.
///
/// The token is single-use: its hash is cleared on approval.
///
/// # Errors
///
/// - `InvalidApprovalToken`: Token is malformed, unknown, or already used
pub async fn approve_by_token(pool: &DbPool, token: &str) -> Result<Transaction, AppError> {
    if !is_well_formed_token(token) {
        return Err(AppError::InvalidApprovalToken);
    }

    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        UPDATE transactions
        SET status = $1,
            reviewed_by = $2,
            reviewed_at = NOW(),
            approval_token_hash = NULL
        WHERE approval_token_hash = $3 AND status = $4
        RETURNING *
        "#,
    )
    .bind(TransactionStatus::Approved.as_str())
    .bind(LINK_REVIEWER)
    .bind(hash_secret(&token.to_ascii_lowercase()))
    .bind(TransactionStatus::Pending.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::InvalidApprovalToken)?;

    tracing::info!(transaction_id = %transaction.id, "Transaction approved via approval link");

    Ok(transaction)
}

/// 32 random bytes, hex encoded (64 characters).
pub fn generate_approval_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// Approval tokens are exactly 64 hex characters.
pub fn is_well_formed_token(token: &str) -> bool {
    token.len() == 64 && token.chars().all(|c| c.is_ascii_hexdigit())
}
