//! Error types for starfeed-db.

use miette::Diagnostic;
use starfeed_utils::error::FileSystemError;
use thiserror::Error;

/// Database error type for starfeed-db operations.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Database connection failed: {0}")]
    #[diagnostic(
        code(starfeed_db::connection),
        help("Check if the database file exists and is accessible")
    )]
    ConnectionError(String),

    #[error("Database query failed: {0}")]
    #[diagnostic(code(starfeed_db::query))]
    QueryError(String),

    #[error("Database migration failed: {0}")]
    #[diagnostic(
        code(starfeed_db::migration),
        help("The database schema may be corrupted. Try removing the database file.")
    )]
    MigrationError(String),

    #[error("Key not found: {0}")]
    #[diagnostic(
        code(starfeed_db::not_found),
        help("Run 'starfeed refresh' to populate the cache")
    )]
    NotFound(String),

    #[error("Database lock poisoned")]
    #[diagnostic(
        code(starfeed_db::poison),
        help("This is an internal error, please report it")
    )]
    PoisonError,

    #[error(transparent)]
    #[diagnostic(code(starfeed_db::fs), help("Check file permissions and disk space"))]
    FileSystem(#[from] FileSystemError),
}

impl From<diesel::result::Error> for DbError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => DbError::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(_, info) => {
                DbError::QueryError(info.message().to_string())
            }
            other => DbError::QueryError(other.to_string()),
        }
    }
}

impl From<diesel::result::ConnectionError> for DbError {
    fn from(err: diesel::result::ConnectionError) -> Self {
        DbError::ConnectionError(err.to_string())
    }
}

/// Result type alias for starfeed-db operations.
pub type Result<T> = std::result::Result<T, DbError>;
