//! # Schema Guard
//!
//! Allow-lists every identifier of a [`QuerySpec`] against the column list
//! of its table before any text is generated. Operators and aggregate names
//! are already closed enums by the time a spec exists, so identifiers are
//! the only free-form text left.

use std::sync::OnceLock;

use regex::Regex;

use super::assembler::is_aggregate_sort;
use super::errors::{ValidationError, ValidationResult};
use super::spec::{Operand, QuerySpec, SortSpec};

static AGGREGATE_CALL: OnceLock<Regex> = OnceLock::new();

/// Column names of one table, as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<String>,
}

impl TableSchema {
    pub fn new(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }

    /// MySQL column names compare case-insensitively
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.eq_ignore_ascii_case(column))
    }
}

/// Checks a spec against the schema of its table
pub struct SchemaGuard<'a> {
    schema: &'a TableSchema,
}

impl<'a> SchemaGuard<'a> {
    /// An empty column list means the table does not exist
    pub fn new(schema: &'a TableSchema) -> ValidationResult<Self> {
        if schema.columns.is_empty() {
            return Err(ValidationError::UnknownTable(schema.table.clone()));
        }
        Ok(Self { schema })
    }

    pub fn check(&self, spec: &QuerySpec) -> ValidationResult<()> {
        for term in &spec.search {
            self.require_column(&term.column)?;
        }

        for filter in &spec.filters {
            self.require_column(&filter.left.column)?;
            match &filter.right {
                Operand::Aggregate { column, .. } | Operand::Column(column) => {
                    self.require_column(column)?
                }
                Operand::Literal(_) => {}
            }
        }

        if let Some(sort) = &spec.sort {
            self.check_sort(sort)?;
        }

        Ok(())
    }

    fn check_sort(&self, sort: &SortSpec) -> ValidationResult<()> {
        if !is_aggregate_sort(&sort.column) {
            return self.require_column(&sort.column);
        }

        let pattern = AGGREGATE_CALL.get_or_init(|| {
            Regex::new(r"(?i)^(?:MAX|MIN|AVG|SUM)\s*\(\s*(?:`([^`]+)`|(\w+))\s*\)$")
                .expect("aggregate call pattern is valid")
        });

        let column = pattern
            .captures(sort.column.trim())
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str())
            .ok_or_else(|| ValidationError::InvalidSortExpression(sort.column.clone()))?;

        self.require_column(column)
    }

    fn require_column(&self, column: &str) -> ValidationResult<()> {
        if self.schema.has_column(column) {
            Ok(())
        } else {
            Err(ValidationError::UnknownColumn {
                table: self.schema.table.clone(),
                column: column.to_string(),
            })
        }
    }
}
