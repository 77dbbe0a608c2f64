//! FraudGuard - transaction recording with fraud screening and manual review.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Fraud Screening**: Threshold rules over per-user history, optionally
//!   blended with a pre-trained classifier
//! - **Review**: Admin approve/decline behind API keys, plus single-use approval links
//! - **Format**: JSON requests/responses

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod fraud;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
