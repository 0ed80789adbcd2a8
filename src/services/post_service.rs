use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::database::models::post::Post;
use crate::services::label_service::{self, LabelError};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub uid: i32,
    pub title: String,
    pub problem_content: Option<String>,
    pub option_a_content: String,
    pub option_b_content: String,
    #[serde(default)]
    pub anonymous_flag: bool,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CreationError {
    #[error("{0}")]
    Validation(String),

    #[error("Label \"{0}\" does not exist")]
    LabelNotFound(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<LabelError> for CreationError {
    fn from(err: LabelError) -> Self {
        match err {
            LabelError::NotFound(name) => CreationError::LabelNotFound(name),
            LabelError::Database(e) => CreationError::Database(e),
        }
    }
}

/// A post persisted together with the ids of the labels applied to it
#[derive(Debug)]
pub struct CreatedPost {
    pub post: Post,
    pub label_ids: Vec<i32>,
}

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a post together with its label links, all or nothing.
    ///
    /// The post insert, the label resolution and the link inserts share one
    /// transaction. Failure at any step rolls the whole unit back, so a
    /// post is never observable without its full label set.
    pub async fn create(&self, request: CreatePostRequest) -> Result<CreatedPost, CreationError> {
        validate(&request)?;

        let mut tx = self.pool.begin().await?;

        let post: Post = sqlx::query_as(
            "INSERT INTO post (uid, title, problem_content, option_a_content, option_b_content, anonymous_flag) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(request.uid)
        .bind(&request.title)
        .bind(&request.problem_content)
        .bind(&request.option_a_content)
        .bind(&request.option_b_content)
        .bind(request.anonymous_flag)
        .fetch_one(&mut *tx)
        .await?;

        let label_ids = label_service::resolve_label_ids(&mut *tx, &request.labels).await?;

        // Duplicate submitted names resolve to duplicate ids; the link table
        // keys on (pid, lid), so collapse them to a single row.
        for lid in &label_ids {
            sqlx::query("INSERT INTO post_label (pid, lid) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(post.pid)
                .bind(lid)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(pid = post.pid, labels = label_ids.len(), "created post");

        Ok(CreatedPost { post, label_ids })
    }
}

fn validate(request: &CreatePostRequest) -> Result<(), CreationError> {
    if request.title.trim().is_empty() {
        return Err(CreationError::Validation("title must not be empty".into()));
    }
    if request.option_a_content.trim().is_empty() {
        return Err(CreationError::Validation(
            "option_a_content must not be empty".into(),
        ));
    }
    if request.option_b_content.trim().is_empty() {
        return Err(CreationError::Validation(
            "option_b_content must not be empty".into(),
        ));
    }
    Ok(())
}
