use axum::extract::Path;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::vote::{VoteRecord, VoteWithPost, VoteWithVoter};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    pub uid: i32,
    pub pid: i32,
    pub side: bool,
}

/// POST /api/votes - cast a vote, one per user per poll
pub async fn cast(Json(payload): Json<CastVoteRequest>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let already_voted: Option<i32> =
        sqlx::query_scalar("SELECT vhid FROM vote_history WHERE uid = $1 AND pid = $2")
            .bind(payload.uid)
            .bind(payload.pid)
            .fetch_optional(&pool)
            .await?;

    if already_voted.is_some() {
        return Err(ApiError::conflict("User has already voted for this post"));
    }

    // The unique (uid, pid) constraint backstops the check above against a
    // concurrent duplicate cast.
    let vote: VoteRecord = sqlx::query_as(
        "INSERT INTO vote_history (uid, pid, side) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(payload.uid)
    .bind(payload.pid)
    .bind(payload.side)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
            ApiError::conflict("User has already voted for this post")
        } else {
            e.into()
        }
    })?;

    Ok(ApiResponse::created(json!({
        "message": "Vote recorded successfully",
        "vote": vote
    })))
}

/// GET /api/votes/posts/:pid - all votes on a poll, oldest first
pub async fn list_by_post(Path(pid): Path<i32>) -> ApiResult<Vec<VoteWithVoter>> {
    let pool = DatabaseManager::pool().await?;
    let votes: Vec<VoteWithVoter> = sqlx::query_as(
        "SELECT v.vhid, v.uid, v.pid, v.side, v.create_time, r.username AS voter_name \
         FROM vote_history v \
         JOIN registers r ON v.uid = r.uid \
         WHERE v.pid = $1 \
         ORDER BY v.create_time ASC",
    )
    .bind(pid)
    .fetch_all(&pool)
    .await?;

    if votes.is_empty() {
        return Err(ApiError::not_found(format!("No votes found for pid {}", pid)));
    }

    Ok(ApiResponse::success(votes))
}

/// GET /api/votes/users/:uid - a user's vote history, newest first
pub async fn list_by_user(Path(uid): Path<i32>) -> ApiResult<Vec<VoteWithPost>> {
    let pool = DatabaseManager::pool().await?;
    let votes: Vec<VoteWithPost> = sqlx::query_as(
        "SELECT v.vhid, v.uid, v.pid, v.side, v.create_time, \
         p.title AS post_title, p.problem_content AS post_content \
         FROM vote_history v \
         JOIN post p ON v.pid = p.pid \
         WHERE v.uid = $1 \
         ORDER BY v.create_time DESC",
    )
    .bind(uid)
    .fetch_all(&pool)
    .await?;

    if votes.is_empty() {
        return Err(ApiError::not_found(format!(
            "No vote history found for uid {}",
            uid
        )));
    }

    Ok(ApiResponse::success(votes))
}

/// GET /api/votes/results/:pid - tally per side
pub async fn results(Path(pid): Path<i32>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let rows: Vec<(bool, i64)> = sqlx::query_as(
        "SELECT side, COUNT(*) AS total_votes FROM vote_history WHERE pid = $1 GROUP BY side",
    )
    .bind(pid)
    .fetch_all(&pool)
    .await?;

    if rows.is_empty() {
        return Err(ApiError::not_found(format!("No votes found for pid {}", pid)));
    }

    // Sides absent from the rows count as zero
    let mut side_a: i64 = 0;
    let mut side_b: i64 = 0;
    for (side, total) in rows {
        if side {
            side_a = total;
        } else {
            side_b = total;
        }
    }

    Ok(ApiResponse::success(json!({
        "pid": pid,
        "results": { "true": side_a, "false": side_b }
    })))
}
