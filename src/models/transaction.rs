//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: Database entity representing a submitted transaction
//! - `TransactionStatus`: Review state of a transaction
//! - `SubmitTransactionRequest`: Request body for submitting transactions
//! - `ListTransactionsQuery`: Admin listing filters
//! - `TransactionResponse`: Response body returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, fraud::money::format_cents, models::user::validate_identifier};

/// Represents a transaction record from the database.
///
/// # Database Table
///
/// Maps to the `transactions` table. Each transaction:
/// - Belongs to a card holder through `userid`
/// - Stores amount in cents (never floats!)
/// - Records the fraud decision taken when it was submitted
/// - Tracks review status (approved, pending, declined)
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Transaction {
    pub id: Uuid,

    pub userid: String,

    /// Amount in cents
    ///
    /// Must be positive (enforced by CHECK constraint)
    pub amount_cents: i64,

    /// Device fingerprint, usually the submitting User-Agent
    pub device_id: Option<String>,

    /// City the transaction originated from
    pub location: Option<String>,

    pub created_at: DateTime<Utc>,

    /// Whether any fraud check flagged this transaction
    pub is_fraudulent: bool,

    /// JSON array of human-readable flag messages, NULL when not flagged
    pub fraud_flags: Option<serde_json::Value>,

    /// Classifier probability, NULL when no model is loaded
    pub model_confidence: Option<f64>,

    /// Review status, see [`TransactionStatus`]
    pub status: String,

    /// SHA-256 of the single-use approval token; cleared once used
    #[serde(skip_serializing)]
    pub approval_token_hash: Option<String>,

    /// Admin name, or `approval-link` when approved through the SMS link
    pub reviewed_by: Option<String>,

    pub reviewed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Fraud flags decoded from the JSON column.
    pub fn flags(&self) -> Vec<String> {
        self.fraud_flags
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }
}

/// Review state of a transaction.
///
/// - `Approved`: Clean on submission, or approved by a reviewer
/// - `Pending`: Flagged and waiting for review
/// - `Declined`: Declined by a reviewer; counts toward the declined-card rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Approved,
    Pending,
    Declined,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Approved => "approved",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Declined => "declined",
        }
    }
}

/// Request to submit a transaction for recording and fraud evaluation.
///
/// # JSON Example
///
/// ```json
/// {
///   "userid": "user1",
///   "amount_cents": 50000,
///   "location": "New York",
///   "device_id": "device1"
/// }
/// ```
///
/// `location` and `device_id` are optional. When absent they are derived
/// from the request (client IP geolocation and `User-Agent`).
/// Largest accepted amount, $10,000,000,000.00.
///
/// Keeps per-user sums far from the `BIGINT` range.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000;

#[derive(Debug, Deserialize)]
pub struct SubmitTransactionRequest {
    pub userid: String,

    pub amount_cents: i64,

    pub location: Option<String>,

    pub device_id: Option<String>,
}

impl SubmitTransactionRequest {
    /// # Rules
    ///
    /// - `userid`: 1 to 50 characters
    /// - `amount_cents`: positive, at most [`MAX_AMOUNT_CENTS`]
    /// - `location`, `device_id`: at most 100 characters when present
    pub fn validate(&self) -> Result<(), AppError> {
        validate_identifier("userid", &self.userid)?;

        if self.amount_cents <= 0 {
            return Err(AppError::InvalidRequest(
                "Amount must be positive".to_string(),
            ));
        }

        if self.amount_cents > MAX_AMOUNT_CENTS {
            return Err(AppError::InvalidRequest(format!(
                "Amount must be at most {}",
                format_cents(MAX_AMOUNT_CENTS)
            )));
        }

        for (field, value) in [("location", &self.location), ("device_id", &self.device_id)] {
            if value.as_ref().is_some_and(|v| v.chars().count() > 100) {
                return Err(AppError::InvalidRequest(format!(
                    "{field} must be at most 100 characters"
                )));
            }
        }

        Ok(())
    }
}

/// Query parameters for listing transactions.
///
/// `GET /api/v1/admin/transactions?status=pending&userid=user1&limit=50`
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    pub status: Option<TransactionStatus>,
    pub userid: Option<String>,
    pub limit: Option<i64>,
}

impl ListTransactionsQuery {
    /// Page size, 100 by default, between 1 and 500.
    pub fn limit(&self) -> Result<i64, AppError> {
        match self.limit {
            None => Ok(100),
            Some(limit) if (1..=500).contains(&limit) => Ok(limit),
            Some(_) => Err(AppError::InvalidRequest(
                "limit must be between 1 and 500".to_string(),
            )),
        }
    }
}

/// Response returned for transaction operations.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "770e8400-e29b-41d4-a716-446655440002",
///   "userid": "user1",
///   "amount_cents": 1500000,
///   "device_id": "device1",
///   "location": "Los Angeles",
///   "fraud_detected": true,
///   "fraud_flags": ["Amount $15,000.00 exceeds suspicious threshold $10,000.00"],
///   "model_confidence": null,
///   "status": "pending",
///   "reviewed_by": null,
///   "reviewed_at": null,
///   "created_at": "2025-12-21T16:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub userid: String,
    pub amount_cents: i64,
    pub device_id: Option<String>,
    pub location: Option<String>,
    pub fraud_detected: bool,
    pub fraud_flags: Vec<String>,
    pub model_confidence: Option<f64>,
    pub status: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Convert database Transaction to API TransactionResponse.
///
/// This drops the approval token hash and decodes the flag list.
impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        let fraud_flags = transaction.flags();
        Self {
            id: transaction.id,
            userid: transaction.userid,
            amount_cents: transaction.amount_cents,
            device_id: transaction.device_id,
            location: transaction.location,
            fraud_detected: transaction.is_fraudulent,
            fraud_flags,
            model_confidence: transaction.model_confidence,
            status: transaction.status,
            reviewed_by: transaction.reviewed_by,
            reviewed_at: transaction.reviewed_at,
            created_at: transaction.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submit(amount_cents: i64) -> SubmitTransactionRequest {
        SubmitTransactionRequest {
            userid: "user1".to_string(),
            amount_cents,
            location: None,
            device_id: None,
        }
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(submit(0).validate().is_err());
        assert!(submit(-100).validate().is_err());
        assert!(submit(1).validate().is_ok());
    }

    #[test]
    fn rejects_amounts_above_maximum() {
        assert!(submit(MAX_AMOUNT_CENTS).validate().is_ok());

        let err = submit(MAX_AMOUNT_CENTS + 1).validate().unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(ref m) if m == "Amount must be at most $10,000,000,000.00"));
        assert!(submit(i64::MAX).validate().is_err());
    }

    #[test]
    fn rejects_oversized_location() {
        let mut request = submit(100);
        request.location = Some("x".repeat(101));
        assert!(request.validate().is_err());
    }

    #[test]
    fn list_limit_defaults_and_bounds() {
        assert_eq!(ListTransactionsQuery::default().limit().unwrap(), 100);

        let query = ListTransactionsQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert!(query.limit().is_err());

        let query = ListTransactionsQuery {
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(query.limit().unwrap(), 500);
    }

    #[test]
    fn status_deserializes_lowercase() {
        let status: TransactionStatus = serde_json::from_value(json!("pending")).unwrap();
        assert_eq!(status, TransactionStatus::Pending);
        assert_eq!(status.as_str(), "pending");
    }

    #[test]
    fn response_decodes_flags_and_hides_token_hash() {
        let transaction = Transaction {
            id: Uuid::new_v4(),
            userid: "user1".to_string(),
            amount_cents: 1_500_000,
            device_id: Some("device1".to_string()),
            location: Some("Los Angeles".to_string()),
            created_at: Utc::now(),
            is_fraudulent: true,
            fraud_flags: Some(json!(["first", "second"])),
            model_confidence: None,
            status: "pending".to_string(),
            approval_token_hash: Some("ab".repeat(32)),
            reviewed_by: None,
            reviewed_at: None,
        };

        let serialized = serde_json::to_value(&transaction).unwrap();
        assert!(serialized.get("approval_token_hash").is_none());

        let response = TransactionResponse::from(transaction);
        assert!(response.fraud_detected);
        assert_eq!(response.fraud_flags, vec!["first", "second"]);
    }
}
