use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row in `label`. Labels are seeded administratively and read-only to the
/// API; the creation workflow only ever resolves them by name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Label {
    pub lid: i32,
    pub labelname: String,
}
