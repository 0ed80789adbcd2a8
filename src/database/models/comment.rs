use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row in `comment`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub cid: i32,
    pub pid: i32,
    pub comment_user: i32,
    pub text: String,
    pub anonymous_flag: bool,
    pub create_time: DateTime<Utc>,
}

/// Comment joined with the commenter's username. `commenter_name` is
/// masked before serving when the comment is anonymous.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentWithAuthor {
    pub cid: i32,
    pub pid: i32,
    pub comment_user: i32,
    pub commenter_name: String,
    pub text: String,
    pub anonymous_flag: bool,
    pub create_time: DateTime<Utc>,
}

/// Row in `user_comment` (one like/dislike per user per comment)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentReaction {
    pub uid: i32,
    pub cid: i32,
    pub operation: bool,
}
