//! Statement execution
//!
//! The query pipeline builds statements; this module runs them. A
//! [`StatementExecutor`] belongs to exactly one session and is reached
//! only through that session's token.
//!
//! # Invariants
//!
//! - One call, one attempt: no retries, no fallback statements
//! - Backend diagnostics are surfaced verbatim

mod errors;
mod executor;
mod mysql;

pub use errors::{ExecutionError, ExecutionResult};
pub use executor::{BoxFuture, Connector, MySqlConnector, StatementExecutor};
pub use mysql::{ConnectionParams, MySqlExecutor};
