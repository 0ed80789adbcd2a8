use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row in `vote_history`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VoteRecord {
    pub vhid: i32,
    pub uid: i32,
    pub pid: i32,
    pub side: bool,
    pub create_time: DateTime<Utc>,
}

/// Vote joined with the voter's username (per-post listing)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VoteWithVoter {
    pub vhid: i32,
    pub uid: i32,
    pub pid: i32,
    pub side: bool,
    pub create_time: DateTime<Utc>,
    pub voter_name: String,
}

/// Vote joined with the post it was cast on (per-user history)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VoteWithPost {
    pub vhid: i32,
    pub uid: i32,
    pub pid: i32,
    pub side: bool,
    pub create_time: DateTime<Utc>,
    pub post_title: String,
    pub post_content: Option<String>,
}
