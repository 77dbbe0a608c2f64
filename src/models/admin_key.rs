//! Admin key model for authentication.
//!
//! Admin keys authenticate the reviewers who approve or decline flagged
//! transactions. They are stored in the database as SHA-256 hashes.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Represents an admin key record from the database.
///
/// # Database Table
///
/// Maps to the `admin_keys` table with columns:
/// - `id`: Unique identifier (UUID)
/// - `key_hash`: SHA-256 hash of the actual key
/// - `admin_name`: Name recorded as `reviewed_by` on reviews
/// - `created_at`: When the key was created
/// - `is_active`: Whether the key is currently valid
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminKey {
    pub id: Uuid,

    /// SHA-256 hash of the actual key (64 hex characters)
    pub key_hash: String,

    pub admin_name: String,

    pub created_at: DateTime<Utc>,

    /// Inactive keys are rejected during authentication.
    pub is_active: bool,
}
