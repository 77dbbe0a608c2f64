//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database access, fraud evaluation, and notifications.

pub mod history_service;
pub mod notification_service;
pub mod request_context;
pub mod transaction_service;
pub mod user_service;
