use thiserror::Error;

/// PostgreSQL SQLSTATE for `check_violation`
pub const SQLSTATE_CHECK_VIOLATION: &str = "23514";
/// PostgreSQL SQLSTATE for `foreign_key_violation`
pub const SQLSTATE_FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL SQLSTATE for `numeric_value_out_of_range`
pub const SQLSTATE_NUMERIC_OUT_OF_RANGE: &str = "22003";

/// Store failures, classified by what the caller can do about them.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A CHECK constraint rejected the write (e.g. `balance >= 0`)
    #[error("Check constraint violated: {0}")]
    CheckViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// A value does not fit its numeric column
    #[error("Numeric value out of range: {0}")]
    OutOfRange(String),

    #[error("Row not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(SQLSTATE_CHECK_VIOLATION) => return StoreError::CheckViolation(constraint),
                Some(SQLSTATE_FOREIGN_KEY_VIOLATION) => {
                    return StoreError::ForeignKeyViolation(constraint);
                }
                Some(SQLSTATE_NUMERIC_OUT_OF_RANGE) => {
                    return StoreError::OutOfRange(db_err.message().to_string());
                }
                _ => {}
            }
        }

        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            sqlx::Error::RowNotFound => StoreError::NotFound("row".to_string()),
            other => StoreError::Database(other),
        }
    }
}
