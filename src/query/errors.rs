//! # Query Errors
//!
//! Error types for request validation and statement building.

use thiserror::Error;

use crate::executor::ExecutionError;

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Rejections raised before a statement reaches the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // ==================
    // Request Shape
    // ==================
    /// Payload is not a query request object
    #[error("Invalid request body: {0}")]
    MalformedRequest(String),

    /// No target table was given
    #[error("table is required")]
    MissingTable,

    /// Logic connector other than AND/OR
    #[error("Invalid logic connector '{token}' in filter {index}")]
    InvalidLogic { index: usize, token: String },

    /// Comparison operator outside the allowed set
    #[error("Invalid operator '{token}' in filter {index}")]
    InvalidOperator { index: usize, token: String },

    /// Aggregate function outside MAX/MIN/AVG/SUM
    #[error("Invalid aggregate '{token}' in filter {index}")]
    InvalidAggregate { index: usize, token: String },

    /// Right-hand aggregate without a column to aggregate
    #[error("rightAgg requires rightCol in filter {0}")]
    MissingAggregateColumn(usize),

    // ==================
    // Schema Guard
    // ==================
    /// Table not present in the connected database
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// Column not present in the target table
    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// Aggregate sort expression not of the form AGG(column)
    #[error("Invalid sort expression: {0}")]
    InvalidSortExpression(String),

    // ==================
    // Statement
    // ==================
    /// Unquoted request text put extra `?` markers into the statement
    #[error("Statement has {placeholders} placeholders for {params} parameters")]
    PlaceholderMismatch { placeholders: usize, params: usize },
}

/// Result type for the full query pipeline
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failure of a single query request, either before or during execution
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}
