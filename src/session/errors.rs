//! Session lookup errors

use thiserror::Error;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Request carried no session token
    #[error("no connection")]
    MissingToken,

    /// Token does not name a live session
    #[error("Unknown session token")]
    UnknownToken,
}
