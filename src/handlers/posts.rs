use axum::extract::Path;
use axum::response::Json;
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::post::PostWithLabels;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::post_service::{CreatePostRequest, PostService};

/// Shared join for serving posts with author name and label names.
/// ARRAY_REMOVE drops the NULL the LEFT JOIN produces for unlabeled posts.
const POST_SELECT: &str = "SELECT p.pid, p.title, p.problem_content, p.option_a_content, \
     p.option_b_content, p.anonymous_flag, p.create_time, u.username AS author, \
     ARRAY_REMOVE(ARRAY_AGG(l.labelname), NULL) AS labels \
     FROM post p \
     JOIN registers u ON p.uid = u.uid \
     LEFT JOIN post_label pl ON p.pid = pl.pid \
     LEFT JOIN label l ON pl.lid = l.lid";

const POST_GROUP: &str = "GROUP BY p.pid, u.username";

/// POST /api/posts - create a poll together with its labels
pub async fn create(Json(payload): Json<CreatePostRequest>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let created = PostService::new(pool).create(payload).await?;

    Ok(ApiResponse::created(json!({
        "message": "Post created successfully",
        "post": created.post,
        "label_ids": created.label_ids
    })))
}

/// GET /api/posts - list all polls, newest first
pub async fn list() -> ApiResult<Vec<PostWithLabels>> {
    let pool = DatabaseManager::pool().await?;
    let sql = format!("{POST_SELECT} {POST_GROUP} ORDER BY p.create_time DESC");
    let posts: Vec<PostWithLabels> = sqlx::query_as(&sql).fetch_all(&pool).await?;

    Ok(ApiResponse::success(posts))
}

/// GET /api/posts/:pid - fetch one poll
pub async fn show(Path(pid): Path<i32>) -> ApiResult<PostWithLabels> {
    let pool = DatabaseManager::pool().await?;
    let sql = format!("{POST_SELECT} WHERE p.pid = $1 {POST_GROUP}");
    let post: Option<PostWithLabels> = sqlx::query_as(&sql)
        .bind(pid)
        .fetch_optional(&pool)
        .await?;

    let post = post.ok_or_else(|| ApiError::not_found("Post not found"))?;
    Ok(ApiResponse::success(post))
}

/// GET /api/posts/user/:uid - list a user's polls, newest first
pub async fn list_by_author(Path(uid): Path<i32>) -> ApiResult<Vec<PostWithLabels>> {
    let pool = DatabaseManager::pool().await?;
    let sql = format!("{POST_SELECT} WHERE p.uid = $1 {POST_GROUP} ORDER BY p.create_time DESC");
    let posts: Vec<PostWithLabels> = sqlx::query_as(&sql).bind(uid).fetch_all(&pool).await?;

    if posts.is_empty() {
        return Err(ApiError::not_found(format!("No posts found for uid {}", uid)));
    }

    Ok(ApiResponse::success(posts))
}

/// DELETE /api/posts/:pid - delete one poll (label links cascade)
pub async fn remove(Path(pid): Path<i32>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let deleted: Option<i32> = sqlx::query_scalar("DELETE FROM post WHERE pid = $1 RETURNING pid")
        .bind(pid)
        .fetch_optional(&pool)
        .await?;

    if deleted.is_none() {
        return Err(ApiError::not_found(format!("Post with pid {} not found", pid)));
    }

    Ok(ApiResponse::success(json!({
        "message": format!("Post with pid {} has been deleted", pid)
    })))
}

/// DELETE /api/posts - delete all polls and dependent rows
pub async fn delete_all() -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    sqlx::query("TRUNCATE TABLE post CASCADE").execute(&pool).await?;

    Ok(ApiResponse::success(json!({
        "message": "All posts and related data have been deleted"
    })))
}
