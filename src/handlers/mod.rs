//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to a service
//! 3. Returns HTTP response (JSON, status code)

/// Admin review endpoints
pub mod admin;
/// Approval link endpoint
pub mod approvals;
/// Service health endpoint
pub mod health;
/// Transaction submission endpoints
pub mod transactions;
/// User registration endpoint
pub mod users;
