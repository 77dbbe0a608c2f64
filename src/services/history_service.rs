//! Loads the per-user aggregates the fraud rules evaluate against.

use chrono::{DateTime, Duration, Utc};

use crate::{
    db::DbPool,
    error::AppError,
    fraud::{UserHistory, rules::FraudRules},
    models::transaction::TransactionStatus,
};

/// Snapshot of a user's recorded transactions as of `now`.
///
/// Runs before the candidate is inserted, so none of the aggregates include it.
pub async fn load_user_history(
    pool: &DbPool,
    rules: &FraudRules,
    userid: &str,
    location: &str,
    now: DateTime<Utc>,
) -> Result<UserHistory, AppError> {
    let location_since = now - Duration::minutes(rules.location_window_minutes);
    let declined_since = now - Duration::minutes(rules.declined_window_minutes);
    let week_since = now - Duration::days(7);

    let (transaction_count, total_amount_cents, recent_declined, weekly_count, location_count): (
        i64,
        i64,
        i64,
        i64,
        i64,
    ) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COALESCE(SUM(amount_cents), 0)::BIGINT,
            COUNT(*) FILTER (WHERE status = $2 AND created_at >= $3),
            COUNT(*) FILTER (WHERE created_at >= $4),
            COUNT(*) FILTER (WHERE location = $5)
        FROM transactions
        WHERE userid = $1
        "#,
    )
    .bind(userid)
    .bind(TransactionStatus::Declined.as_str())
    .bind(declined_since)
    .bind(week_since)
    .bind(location)
    .fetch_one(pool)
    .await?;

    let recent_other_locations: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT DISTINCT location
        FROM transactions
        WHERE userid = $1
          AND created_at >= $2
          AND location IS NOT NULL
          AND location <> $3
        ORDER BY location
        "#,
    )
    .bind(userid)
    .bind(location_since)
    .bind(location)
    .fetch_all(pool)
    .await?;

    Ok(UserHistory {
        transaction_count,
        total_amount_cents,
        recent_other_locations,
        recent_declined,
        weekly_count,
        location_count,
    })
}
