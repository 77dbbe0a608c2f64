//! User registration and lookup.

use crate::{
    db::DbPool,
    error::AppError,
    models::user::{RegisterUserRequest, User},
};

/// Register a card holder.
///
/// # Errors
///
/// - `InvalidRequest`: Field validation failed
/// - `UserAlreadyExists`: Username, user id, email or phone already registered
/// - `Database`: Database error occurred
pub async fn register_user(pool: &DbPool, request: RegisterUserRequest) -> Result<User, AppError> {
    request.validate()?;

    let result = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, userid, email, phone)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, userid, email, phone, created_at
        "#,
    )
    .bind(request.username.trim())
    .bind(request.userid.trim())
    .bind(request.email.trim())
    .bind(&request.phone)
    .fetch_one(pool)
    .await;

    match result {
        Ok(user) => {
            tracing::info!(userid = %user.userid, "User registered");
            Ok(user)
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(AppError::UserAlreadyExists)
        }
        Err(e) => Err(e.into()),
    }
}

/// Get a user by external user id.
pub async fn get_user_by_userid(pool: &DbPool, userid: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, userid, email, phone, created_at FROM users WHERE userid = $1",
    )
    .bind(userid)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// List all users, newest first.
pub async fn list_users(pool: &DbPool) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, username, userid, email, phone, created_at FROM users ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}
