use axum::extract::Path;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::user::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// POST /api/users - register a new user
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<User> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::validation_error("username must not be empty"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation_error("password must not be empty"));
    }

    let pool = DatabaseManager::pool().await?;
    let user: User =
        sqlx::query_as("INSERT INTO registers (username, password) VALUES ($1, $2) RETURNING *")
            .bind(&payload.username)
            .bind(&payload.password)
            .fetch_one(&pool)
            .await
            .map_err(|e| {
                if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                    ApiError::conflict("Username already exists")
                } else {
                    e.into()
                }
            })?;

    Ok(ApiResponse::created(user))
}

/// PUT /api/users/:id/password - update a user's password
pub async fn update_password(
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let user: Option<User> =
        sqlx::query_as("UPDATE registers SET password = $1 WHERE uid = $2 RETURNING *")
            .bind(&payload.new_password)
            .bind(id)
            .fetch_optional(&pool)
            .await?;

    let user = user.ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(json!({
        "message": "Password updated successfully",
        "user": user
    })))
}

/// GET /api/users - list all users
pub async fn list() -> ApiResult<Vec<User>> {
    let pool = DatabaseManager::pool().await?;
    let users: Vec<User> = sqlx::query_as("SELECT * FROM registers ORDER BY uid")
        .fetch_all(&pool)
        .await?;

    Ok(ApiResponse::success(users))
}

/// GET /api/users/:id - fetch one user
pub async fn show(Path(id): Path<i32>) -> ApiResult<User> {
    let pool = DatabaseManager::pool().await?;
    let user: Option<User> = sqlx::query_as("SELECT * FROM registers WHERE uid = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?;

    let user = user.ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(user))
}

/// DELETE /api/users/:id - delete one user
pub async fn remove(Path(id): Path<i32>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let user: Option<User> = sqlx::query_as("DELETE FROM registers WHERE uid = $1 RETURNING *")
        .bind(id)
        .fetch_optional(&pool)
        .await?;

    let user = user.ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(json!({
        "message": "User deleted successfully",
        "user": user
    })))
}

/// DELETE /api/users - delete all users
pub async fn delete_all() -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let deleted: Vec<User> = sqlx::query_as("DELETE FROM registers RETURNING *")
        .fetch_all(&pool)
        .await?;

    if deleted.is_empty() {
        return Err(ApiError::not_found("No users found to delete"));
    }

    Ok(ApiResponse::success(json!({
        "message": "All users deleted successfully",
        "deletedUsers": deleted
    })))
}
