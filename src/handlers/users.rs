//! User registration HTTP handler.
//!
//! - POST /api/v1/users - Register a card holder

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    db::DbPool,
    error::AppError,
    models::user::{RegisterUserRequest, UserResponse},
    services::user_service,
};

/// Register a card holder so fraud alerts can reach them.
///
/// # Request Body
///
/// ```json
/// {
///   "username": "user1",
///   "userid": "user1",
///   "email": "user1@example.com",
///   "phone": "+15550001"
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: The registered user
/// - **400**: Validation failed
/// - **409**: Username, user id, email or phone already registered
pub async fn register_user(
    State(pool): State<DbPool>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = user_service::register_user(&pool, request).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}
