//! # Query Pipeline
//!
//! Validate → guard → build → execute → format, for one request.

use serde_json::Value;

use super::assembler::{base_select, build_statement};
use super::errors::{PipelineResult, ValidationError};
use super::guard::{SchemaGuard, TableSchema};
use super::params::GeneratedStatement;
use super::response::{QueryResponse, RowsResponse};
use super::spec::QuerySpec;
use super::validator::validate_payload;
use crate::executor::StatementExecutor;

/// Per-request options for the pipeline
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Check identifiers against the live schema
    pub validate_identifiers: bool,
    /// Row cap for table slices
    pub table_row_limit: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            validate_identifiers: true,
            table_row_limit: 5000,
        }
    }
}

/// Runs table queries through one session's executor
pub struct QueryPipeline<'a> {
    executor: &'a dyn StatementExecutor,
    options: PipelineOptions,
}

impl<'a> QueryPipeline<'a> {
    pub fn new(executor: &'a dyn StatementExecutor, options: PipelineOptions) -> Self {
        Self { executor, options }
    }

    /// Build and run a structured query from its JSON payload
    pub async fn run(&self, payload: Value) -> PipelineResult<QueryResponse> {
        let spec = validate_payload(payload).inspect_err(|e| {
            tracing::warn!(error = %e, "query request rejected");
        })?;

        self.check_schema(&spec).await?;

        let statement = build_statement(&spec);
        if !statement.is_aligned() {
            let err = ValidationError::PlaceholderMismatch {
                placeholders: statement.placeholder_count(),
                params: statement.params.len(),
            };
            tracing::warn!(statement = %statement.text, error = %err, "statement rejected");
            return Err(err.into());
        }
        tracing::info!(
            table = %spec.table,
            statement = %statement.text,
            params = statement.params.len(),
            "statement built"
        );

        let rows = self.execute(&statement).await?;
        Ok(QueryResponse::new(rows, statement.text))
    }

    /// First `table_row_limit` rows of a table, unfiltered
    pub async fn table_slice(&self, table: &str) -> PipelineResult<RowsResponse> {
        if table.is_empty() {
            return Err(ValidationError::MissingTable.into());
        }
        self.check_schema(&QuerySpec::table(table)).await?;

        let statement = GeneratedStatement::new(
            format!("{} LIMIT {}", base_select(table), self.options.table_row_limit),
            Vec::new(),
        );
        let rows = self.execute(&statement).await?;
        Ok(RowsResponse::new(rows))
    }

    async fn check_schema(&self, spec: &QuerySpec) -> PipelineResult<()> {
        if !self.options.validate_identifiers {
            return Ok(());
        }

        let columns = self.executor.table_columns(&spec.table).await?;
        let schema = TableSchema::new(spec.table.clone(), columns);
        SchemaGuard::new(&schema)
            .and_then(|guard| guard.check(spec))
            .inspect_err(|e| {
                tracing::warn!(table = %spec.table, error = %e, "identifier rejected");
            })?;
        Ok(())
    }

    async fn execute(&self, statement: &GeneratedStatement) -> PipelineResult<Vec<Value>> {
        let rows = self.executor.execute(statement).await.inspect_err(|e| {
            tracing::error!(
                code = e.code(),
                error = %e,
                statement = %statement.text,
                "execution failed"
            );
        })?;
        tracing::debug!(rows = rows.len(), "statement executed");
        Ok(rows)
    }
}
