//! # Response Formatting
//!
//! Response bodies for row-returning requests.

use serde::Serialize;
use serde_json::Value;

/// Rows plus the statement that produced them
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub rows: Vec<Value>,
    pub query: String,
}

impl QueryResponse {
    pub fn new(rows: Vec<Value>, query: impl Into<String>) -> Self {
        Self {
            rows,
            query: query.into(),
        }
    }
}

/// Rows only
#[derive(Debug, Clone, Serialize)]
pub struct RowsResponse {
    pub rows: Vec<Value>,
}

impl RowsResponse {
    pub fn new(rows: Vec<Value>) -> Self {
        Self { rows }
    }
}
