//! # Session Registry
//!
//! Maps opaque session tokens to live executors. Every data request names
//! its session explicitly; there is no notion of a current or most recent
//! connection.
//!
//! ## Invariants
//! - Tokens are random and never reused
//! - The lock is held only for map access, never across an `.await`

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::{SessionError, SessionResult};
use crate::executor::StatementExecutor;

/// One open connection and what it points at
#[derive(Clone)]
pub struct Session {
    pub token: String,
    pub database: String,
    pub created_at: DateTime<Utc>,
    pub executor: Arc<dyn StatementExecutor>,
}

/// Live sessions keyed by token
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an executor and return the token that addresses it
    pub fn open(
        &self,
        database: impl Into<String>,
        executor: Arc<dyn StatementExecutor>,
    ) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let session = Session {
            token: token.clone(),
            database: database.into(),
            created_at: Utc::now(),
            executor,
        };

        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.insert(token.clone(), session);
        token
    }

    /// Resolve the token carried by a request
    pub fn resolve(&self, token: Option<&str>) -> SessionResult<Session> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(SessionError::MissingToken)?;

        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.get(token).cloned().ok_or(SessionError::UnknownToken)
    }

    /// Forget a session, returning it so the caller can close it
    pub fn remove(&self, token: &str) -> SessionResult<Session> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.remove(token).ok_or(SessionError::UnknownToken)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
