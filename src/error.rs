//! Unified error types for the items service.

use thiserror::Error;

/// Unified error type for the service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Database-layer errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// The pool could not hand out a working connection.
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// The statement failed: bad SQL, constraint violation or undecodable row.
    #[error("query error: {0}")]
    Query(#[source] sqlx::Error),
}

impl DbError {
    /// Classify a driver error raised while running a statement.
    pub fn from_query(err: sqlx::Error) -> Self {
        if is_connection_failure(&err) {
            DbError::Connection(err)
        } else {
            DbError::Query(err)
        }
    }

    /// Whether the database could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, DbError::Connection(_))
    }
}

fn is_connection_failure(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

/// Client input errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `name` missing, null or empty.
    #[error("Name is required")]
    NameRequired,

    /// Body was not a JSON object with a string `name`.
    #[error("Invalid request body")]
    InvalidBody,
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_a_connection_error() {
        let err = DbError::from_query(sqlx::Error::PoolTimedOut);
        assert!(err.is_connection());
    }

    #[test]
    fn row_not_found_is_a_query_error() {
        let err = DbError::from_query(sqlx::Error::RowNotFound);
        assert!(!err.is_connection());
    }

    #[test]
    fn validation_messages_are_client_facing() {
        assert_eq!(ValidationError::NameRequired.to_string(), "Name is required");
        assert_eq!(ValidationError::InvalidBody.to_string(), "Invalid request body");
    }
}
