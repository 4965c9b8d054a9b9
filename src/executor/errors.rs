//! Executor error types
//!
//! Backend diagnostics are carried verbatim; nothing is retried.

use std::time::Duration;

use thiserror::Error;

/// Result type for statement execution
pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Failures reported by the backend or while talking to it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The backend rejected or failed the statement
    #[error("{0}")]
    Backend(String),

    /// The statement did not finish within the configured timeout
    #[error("Query timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// A connection could not be opened or acquired
    #[error("Connection failed: {0}")]
    Connect(String),
}

impl ExecutionError {
    /// Error code for log lines
    pub fn code(&self) -> &'static str {
        match self {
            ExecutionError::Backend(_) => "EXECUTION_FAILED",
            ExecutionError::Timeout(_) => "EXECUTION_TIMEOUT",
            ExecutionError::Connect(_) => "CONNECTION_FAILED",
        }
    }
}

impl From<sqlx::Error> for ExecutionError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            // Server-side diagnostics pass through as the server wrote them
            sqlx::Error::Database(db) => ExecutionError::Backend(db.message().to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                ExecutionError::Connect(err.to_string())
            }
            other => ExecutionError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_is_verbatim() {
        let err = ExecutionError::Backend("Unknown column 'nope' in 'where clause'".to_string());
        assert_eq!(err.to_string(), "Unknown column 'nope' in 'where clause'");
        assert_eq!(err.code(), "EXECUTION_FAILED");
    }

    #[test]
    fn test_timeout_message() {
        let err = ExecutionError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "Query timed out after 1500 ms");
    }

    #[test]
    fn test_pool_errors_are_connection_failures() {
        let err = ExecutionError::from(sqlx::Error::PoolClosed);
        assert_eq!(err.code(), "CONNECTION_FAILED");
    }
}
