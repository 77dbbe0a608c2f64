//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the request and response bodies built from them.

/// Admin key authentication model
pub mod admin_key;
/// Recorded transaction model
pub mod transaction;
/// Registered user model
pub mod user;
