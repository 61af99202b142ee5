use thiserror::Error;

/// Repository error type
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("not found: {resource} {id}")]
    NotFound { resource: &'static str, id: i32 },

    /// Unique violation, or a delete blocked by rows that still reference the target.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Insert or update pointing at a parent row that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

/// Insert and update failures. A foreign key violation here means the
/// payload pointed at a parent row that does not exist.
impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            let constraint = db.constraint().unwrap_or("unknown").to_string();
            if db.is_unique_violation() {
                return DbError::Conflict(format!("duplicate value violates {}", constraint));
            }
            if db.is_foreign_key_violation() {
                return DbError::InvalidReference(format!(
                    "referenced row does not exist ({})",
                    constraint
                ));
            }
        }
        DbError::Sqlx(e)
    }
}

impl DbError {
    /// Delete failures. A foreign key violation here means other rows still
    /// point at the one being deleted.
    pub fn from_delete(e: sqlx::Error, resource: &'static str, id: i32) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => DbError::Conflict(
                format!("{} {} is still referenced by other rows", resource, id),
            ),
            _ => e.into(),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;
