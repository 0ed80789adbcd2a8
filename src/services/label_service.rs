use sqlx::PgConnection;
use thiserror::Error;

use crate::database::models::label::Label;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("Label \"{0}\" does not exist")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Resolve label names to their stable ids, in input order.
///
/// Lookups are exact-match and case-sensitive; duplicate names resolve to
/// duplicate ids. The first unknown name (in input order) aborts resolution
/// and is reported back to the caller. Missing labels are never created
/// here, labels come from administrative seeding only.
///
/// Takes a plain connection so the caller can run it inside an open
/// transaction.
pub async fn resolve_label_ids(
    conn: &mut PgConnection,
    names: &[String],
) -> Result<Vec<i32>, LabelError> {
    let mut ids = Vec::with_capacity(names.len());

    for name in names {
        let label: Option<Label> =
            sqlx::query_as("SELECT lid, labelname FROM label WHERE labelname = $1")
                .bind(name)
                .fetch_optional(&mut *conn)
                .await?;

        match label {
            Some(label) => ids.push(label.lid),
            None => return Err(LabelError::NotFound(name.clone())),
        }
    }

    Ok(ids)
}
