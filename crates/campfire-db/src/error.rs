//! Database error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        // Surface UNIQUE constraint violations as duplicates so callers can
        // report them without inspecting sqlx internals. Covers the race
        // between an existence check and the insert.
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return DbError::Duplicate(db_err.message().to_string());
        }
        DbError::Connection(err)
    }
}
