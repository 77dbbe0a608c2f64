//! User data models and API request/response types.
//!
//! This module defines:
//! - `User`: Database entity representing a registered card holder
//! - `RegisterUserRequest`: Request body for registering users
//! - `UserResponse`: Response body returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. `username`, `userid`, `email` and `phone`
/// are each unique. Transactions reference users by `userid`, the external
/// identifier the card holder submits with each transaction.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    pub id: Uuid,

    pub username: String,

    /// External user identifier submitted with transactions
    pub userid: String,

    /// Destination of fraud alert emails
    pub email: String,

    /// Destination of fraud alert SMS, stored with country code
    pub phone: String,

    pub created_at: DateTime<Utc>,
}

/// Request body for registering a user.
///
/// # JSON Example
///
/// ```json
/// {
///   "username": "user1",
///   "userid": "user1",
///   "email": "user1@example.com",
///   "phone": "+15550001"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub userid: String,
    pub email: String,
    pub phone: String,
}

impl RegisterUserRequest {
    /// Check field lengths and formats before touching the database.
    ///
    /// # Rules
    ///
    /// - `username`, `userid`: 1 to 50 characters
    /// - `email`: at most 120 characters, exactly one `@` with text on both sides
    /// - `phone`: `+` followed by 7 to 15 digits
    pub fn validate(&self) -> Result<(), AppError> {
        validate_identifier("username", &self.username)?;
        validate_identifier("userid", &self.userid)?;

        if self.email.len() > 120 || !is_plausible_email(&self.email) {
            return Err(AppError::InvalidRequest(
                "email must be a valid address of at most 120 characters".to_string(),
            ));
        }

        if !is_plausible_phone(&self.phone) {
            return Err(AppError::InvalidRequest(
                "phone must start with + followed by 7 to 15 digits".to_string(),
            ));
        }

        Ok(())
    }
}

/// Validate a short identifier field (1..=50 characters, not blank).
pub fn validate_identifier(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() || value.chars().count() > 50 {
        return Err(AppError::InvalidRequest(format!(
            "{field} must be between 1 and 50 characters"
        )));
    }
    Ok(())
}

fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        _ => false,
    }
}

fn is_plausible_phone(phone: &str) -> bool {
    match phone.strip_prefix('+') {
        Some(digits) => {
            (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Response body for user endpoints.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub userid: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            userid: user.userid,
            email: user.email,
            phone: user.phone,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, phone: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            username: "user1".to_string(),
            userid: "user1".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_registration() {
        assert!(request("user1@example.com", "+15550001").validate().is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(request("user1.example.com", "+15550001").validate().is_err());
        assert!(request("a@b@c", "+15550001").validate().is_err());
        assert!(request("@example.com", "+15550001").validate().is_err());
        assert!(request("user 1@example.com", "+15550001").validate().is_err());
    }

    #[test]
    fn rejects_malformed_phone() {
        assert!(request("user1@example.com", "15550001").validate().is_err());
        assert!(request("user1@example.com", "+1555").validate().is_err());
        assert!(request("user1@example.com", "+1555-0001").validate().is_err());
    }

    #[test]
    fn rejects_blank_or_long_identifiers() {
        assert!(validate_identifier("userid", "   ").is_err());
        assert!(validate_identifier("userid", &"x".repeat(51)).is_err());
        assert!(validate_identifier("userid", &"x".repeat(50)).is_ok());
    }
}
