use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row in `registers`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub uid: i32,
    pub username: String,
    pub password: String,
    pub create_time: DateTime<Utc>,
}
