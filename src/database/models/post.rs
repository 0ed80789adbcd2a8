use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row in `post`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub pid: i32,
    pub uid: i32,
    pub title: String,
    pub problem_content: Option<String>,
    pub option_a_content: String,
    pub option_b_content: String,
    pub anonymous_flag: bool,
    pub create_time: DateTime<Utc>,
}

/// Post joined with its author name and aggregated label names, as served
/// by the list/show endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostWithLabels {
    pub pid: i32,
    pub title: String,
    pub problem_content: Option<String>,
    pub option_a_content: String,
    pub option_b_content: String,
    pub anonymous_flag: bool,
    pub create_time: DateTime<Utc>,
    pub author: String,
    pub labels: Vec<String>,
}
