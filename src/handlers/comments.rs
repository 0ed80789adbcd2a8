use axum::extract::Path;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::comment::{Comment, CommentReaction, CommentWithAuthor};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub pid: i32,
    pub comment_user: i32,
    pub text: String,
    #[serde(default)]
    pub anonymous_flag: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    pub uid: i32,
    pub operation: bool,
}

#[derive(Debug, Deserialize)]
pub struct RemoveReactionRequest {
    pub uid: i32,
}

/// POST /api/comments - comment on a poll
pub async fn create(Json(payload): Json<CreateCommentRequest>) -> ApiResult<Value> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::validation_error("text must not be empty"));
    }

    let pool = DatabaseManager::pool().await?;
    let comment: Comment = sqlx::query_as(
        "INSERT INTO comment (pid, comment_user, text, anonymous_flag) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(payload.pid)
    .bind(payload.comment_user)
    .bind(&payload.text)
    .bind(payload.anonymous_flag)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::created(json!({
        "message": "Comment added successfully",
        "comment": comment
    })))
}

/// GET /api/comments/post/:pid - comments on a poll, oldest first
pub async fn list_by_post(Path(pid): Path<i32>) -> ApiResult<Vec<CommentWithAuthor>> {
    let pool = DatabaseManager::pool().await?;
    let mut comments: Vec<CommentWithAuthor> = sqlx::query_as(
        "SELECT c.cid, c.pid, c.comment_user, r.username AS commenter_name, \
         c.text, c.anonymous_flag, c.create_time \
         FROM comment c \
         JOIN registers r ON c.comment_user = r.uid \
         WHERE c.pid = $1 \
         ORDER BY c.create_time ASC",
    )
    .bind(pid)
    .fetch_all(&pool)
    .await?;

    if comments.is_empty() {
        return Err(ApiError::not_found(format!(
            "No comments found for pid {}",
            pid
        )));
    }

    // Hide the commenter name on anonymous comments
    for comment in &mut comments {
        if comment.anonymous_flag {
            comment.commenter_name = "Anonymous".to_string();
        }
    }

    Ok(ApiResponse::success(comments))
}

/// POST /api/comments/:cid/like - like or dislike a comment (upsert)
pub async fn react(
    Path(cid): Path<i32>,
    Json(payload): Json<ReactionRequest>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let interaction: CommentReaction = sqlx::query_as(
        "INSERT INTO user_comment (uid, cid, operation) VALUES ($1, $2, $3) \
         ON CONFLICT (uid, cid) DO UPDATE SET operation = EXCLUDED.operation \
         RETURNING *",
    )
    .bind(payload.uid)
    .bind(cid)
    .bind(payload.operation)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::created(json!({
        "message": "Interaction added or updated successfully",
        "interaction": interaction
    })))
}

/// DELETE /api/comments/:cid/like - remove a like or dislike
pub async fn unreact(
    Path(cid): Path<i32>,
    Json(payload): Json<RemoveReactionRequest>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    sqlx::query("DELETE FROM user_comment WHERE uid = $1 AND cid = $2")
        .bind(payload.uid)
        .bind(cid)
        .execute(&pool)
        .await?;

    Ok(ApiResponse::success(json!({
        "message": "Interaction removed successfully"
    })))
}

/// GET /api/comments/:cid/votes - like and dislike counts
pub async fn reaction_counts(Path(cid): Path<i32>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let (upvotes, downvotes): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*) FILTER (WHERE operation) AS upvotes, \
         COUNT(*) FILTER (WHERE NOT operation) AS downvotes \
         FROM user_comment WHERE cid = $1",
    )
    .bind(cid)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::success(json!({
        "cid": cid,
        "upvotes": upvotes,
        "downvotes": downvotes
    })))
}
