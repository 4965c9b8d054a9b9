//! Statement executor contract
//!
//! The query pipeline hands finished statements to an executor and never
//! looks at connections itself. Implementations must allow concurrent
//! calls, either by serializing them or by running each on its own
//! connection.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use super::errors::ExecutionResult;
use super::mysql::{ConnectionParams, MySqlExecutor};
use crate::config::DatabaseConfig;
use crate::query::GeneratedStatement;

/// Boxed future returned by executor methods
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Runs statements against one live data source
pub trait StatementExecutor: Send + Sync {
    /// Run a statement with its positional parameters. Rows come back as
    /// JSON objects keyed by column name.
    fn execute<'a>(
        &'a self,
        statement: &'a GeneratedStatement,
    ) -> BoxFuture<'a, ExecutionResult<Vec<Value>>>;

    /// Names of the tables in the connected database
    fn list_tables(&self) -> BoxFuture<'_, ExecutionResult<Vec<String>>>;

    /// Column names of `table` in ordinal order; empty if no such table
    fn table_columns<'a>(&'a self, table: &'a str) -> BoxFuture<'a, ExecutionResult<Vec<String>>>;

    /// Release the underlying connections
    fn close(&self) -> BoxFuture<'_, ()>;
}

/// Opens executors for new sessions
pub trait Connector: Send + Sync {
    fn connect<'a>(
        &'a self,
        params: &'a ConnectionParams,
        config: &'a DatabaseConfig,
    ) -> BoxFuture<'a, ExecutionResult<Arc<dyn StatementExecutor>>>;
}

/// Connects to MySQL servers through `sqlx`
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector;

impl Connector for MySqlConnector {
    fn connect<'a>(
        &'a self,
        params: &'a ConnectionParams,
        config: &'a DatabaseConfig,
    ) -> BoxFuture<'a, ExecutionResult<Arc<dyn StatementExecutor>>> {
        Box::pin(async move {
            let executor = MySqlExecutor::connect(params, config).await?;
            Ok(Arc::new(executor) as Arc<dyn StatementExecutor>)
        })
    }
}
