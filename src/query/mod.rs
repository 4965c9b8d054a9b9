//! # Query Construction
//!
//! Turns a structured table request (exact-match search terms, a chain of
//! comparison/aggregate filters, an optional sort) into one parameterized
//! `SELECT` plus its bound values.
//!
//! Only literal values are parameterized. Identifiers are backtick-quoted,
//! and operators/aggregates come from closed enums, so the only free text
//! reaching the statement is identifiers, which [`SchemaGuard`] checks
//! against the live schema.
//!
//! # Invariants
//!
//! - The number of `?` placeholders equals the number of bound values, in
//!   search-then-filter order
//! - Building from the same spec always yields the same statement

pub mod assembler;
pub mod clause;
pub mod errors;
pub mod guard;
pub mod ident;
pub mod params;
pub mod pipeline;
pub mod response;
pub mod spec;
pub mod validator;

pub use assembler::{build_statement, StatementBuilder};
pub use errors::{PipelineError, PipelineResult, ValidationError, ValidationResult};
pub use guard::{SchemaGuard, TableSchema};
pub use params::{GeneratedStatement, ParamBinder};
pub use pipeline::{PipelineOptions, QueryPipeline};
pub use response::{QueryResponse, RowsResponse};
pub use spec::{
    Aggregate, ColumnExpr, ComparisonOp, FilterClause, Logic, Operand, QuerySpec, SearchTerm,
    SortOrder, SortSpec,
};
pub use validator::{validate_payload, QueryRequest};
