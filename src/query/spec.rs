//! # Query Spec
//!
//! Validated, strongly-typed form of a table query request.
//! Built fresh for each request by the validator and consumed by the
//! statement assembler.

use serde::Serialize;
use serde_json::Value;

/// Aggregate functions allowed around a filter column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Aggregate {
    Max,
    Min,
    Avg,
    Sum,
}

impl Aggregate {
    /// All aggregates, in the order they are matched
    pub const ALL: [Aggregate; 4] = [
        Aggregate::Max,
        Aggregate::Min,
        Aggregate::Avg,
        Aggregate::Sum,
    ];

    /// SQL function name
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregate::Max => "MAX",
            Aggregate::Min => "MIN",
            Aggregate::Avg => "AVG",
            Aggregate::Sum => "SUM",
        }
    }

    /// Parse a function name, ignoring case
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|agg| agg.as_str().eq_ignore_ascii_case(token.trim()))
    }
}

/// Comparison operators allowed between filter operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonOp {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<>`
    LtGt,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
}

impl ComparisonOp {
    /// SQL token emitted into the statement
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::NotEq => "!=",
            ComparisonOp::LtGt => "<>",
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
            ComparisonOp::Like => "LIKE",
            ComparisonOp::NotLike => "NOT LIKE",
        }
    }

    /// Parse an operator token. Word operators ignore case and inner spacing.
    pub fn parse(token: &str) -> Option<Self> {
        let normalized = token
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();

        let op = match normalized.as_str() {
            "=" => ComparisonOp::Eq,
            "!=" => ComparisonOp::NotEq,
            "<>" => ComparisonOp::LtGt,
            "<" => ComparisonOp::Lt,
            "<=" => ComparisonOp::Lte,
            ">" => ComparisonOp::Gt,
            ">=" => ComparisonOp::Gte,
            "LIKE" => ComparisonOp::Like,
            "NOT LIKE" => ComparisonOp::NotLike,
            _ => return None,
        };
        Some(op)
    }
}

/// Connector placed before every filter but the first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl Logic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "AND" => Some(Logic::And),
            "OR" => Some(Logic::Or),
            _ => None,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Anything but a case-insensitive `DESC` sorts ascending
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(t) if t.eq_ignore_ascii_case("DESC") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// Equality predicate `column = value`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchTerm {
    pub column: String,
    pub value: Value,
}

impl SearchTerm {
    pub fn new(column: impl Into<String>, value: Value) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

/// A column reference, optionally wrapped in an aggregate call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnExpr {
    pub column: String,
    pub aggregate: Option<Aggregate>,
}

impl ColumnExpr {
    pub fn column(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            aggregate: None,
        }
    }

    pub fn aggregate(aggregate: Aggregate, column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            aggregate: Some(aggregate),
        }
    }
}

/// Right-hand side of a filter comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Operand {
    /// `AGG(`column`)`
    Aggregate { function: Aggregate, column: String },
    /// `` `column` ``
    Column(String),
    /// Bound `?` placeholder
    Literal(Value),
}

/// One entry of the filter chain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterClause {
    /// Ignored for the first entry
    pub logic: Logic,
    pub left: ColumnExpr,
    pub operator: ComparisonOp,
    pub right: Operand,
}

impl FilterClause {
    pub fn new(left: ColumnExpr, operator: ComparisonOp, right: Operand) -> Self {
        Self {
            logic: Logic::And,
            left,
            operator,
            right,
        }
    }

    pub fn with_logic(mut self, logic: Logic) -> Self {
        self.logic = logic;
        self
    }
}

/// Requested ordering. `column` is raw text and may hold an aggregate call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub column: String,
    pub order: SortOrder,
}

/// A validated query against a single table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    pub table: String,
    pub search: Vec<SearchTerm>,
    pub filters: Vec<FilterClause>,
    pub sort: Option<SortSpec>,
}

impl QuerySpec {
    /// Query with no predicates and no ordering
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            search: Vec::new(),
            filters: Vec::new(),
            sort: None,
        }
    }

    pub fn search(mut self, term: SearchTerm) -> Self {
        self.search.push(term);
        self
    }

    pub fn filter(mut self, clause: FilterClause) -> Self {
        self.filters.push(clause);
        self
    }

    pub fn sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(SortSpec {
            column: column.into(),
            order,
        });
        self
    }
}
