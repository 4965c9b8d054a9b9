//! # Statement Assembler
//!
//! Builds the final `SELECT` for a [`QuerySpec`]:
//!
//! ```text
//! SELECT * FROM `table` [ WHERE <search> <filters>] [ ORDER BY `col` ASC|DESC]
//! ```
//!
//! When the sort column holds an aggregate call the statement built so far
//! is wrapped as a derived table and ordered from outside:
//!
//! ```text
//! SELECT * FROM (<statement>) AS subquery ORDER BY SUM(amt) DESC
//! ```

use super::clause::{filter_fragment, search_fragment, where_clause};
use super::ident::{contains_aggregate, quote_ident};
use super::params::{GeneratedStatement, ParamBinder};
use super::spec::{QuerySpec, SortSpec};

/// Builds a parameterized statement from a validated spec
pub struct StatementBuilder<'a> {
    spec: &'a QuerySpec,
}

impl<'a> StatementBuilder<'a> {
    pub fn new(spec: &'a QuerySpec) -> Self {
        Self { spec }
    }

    /// Statement text and parameters, search values first, then filter values
    pub fn build(&self) -> GeneratedStatement {
        let mut binder = ParamBinder::new();

        let mut sql = base_select(&self.spec.table);

        // Order matters: search placeholders precede filter placeholders
        let search = search_fragment(&self.spec.search, &mut binder);
        let filters = filter_fragment(&self.spec.filters, &mut binder);
        sql.push_str(&where_clause(&[search, filters]));

        if let Some(sort) = &self.spec.sort {
            sql = apply_sort(sql, sort);
        }

        GeneratedStatement::new(sql, binder.into_values())
    }
}

/// Build the statement for a spec
pub fn build_statement(spec: &QuerySpec) -> GeneratedStatement {
    StatementBuilder::new(spec).build()
}

/// `` SELECT * FROM `table` ``
pub fn base_select(table: &str) -> String {
    format!("SELECT * FROM {}", quote_ident(table))
}

/// Whether ordering by `column` needs the subquery wrap
pub fn is_aggregate_sort(column: &str) -> bool {
    contains_aggregate(column.trim())
}

fn apply_sort(sql: String, sort: &SortSpec) -> String {
    let order = sort.order.as_str();
    let trimmed = sort.column.trim();

    if is_aggregate_sort(trimmed) {
        format!("SELECT * FROM ({}) AS subquery ORDER BY {} {}", sql, trimmed, order)
    } else {
        format!("{} ORDER BY {} {}", sql, quote_ident(&sort.column), order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::spec::{
        Aggregate, ColumnExpr, ComparisonOp, FilterClause, Logic, Operand, SearchTerm, SortOrder,
    };
    use serde_json::json;

    #[test]
    fn test_table_only() {
        let stmt = build_statement(&QuerySpec::table("t"));
        assert_eq!(stmt.text, "SELECT * FROM `t`");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_search_only() {
        let spec = QuerySpec::table("t").search(SearchTerm::new("a", json!(1)));
        let stmt = build_statement(&spec);
        assert_eq!(stmt.text, "SELECT * FROM `t` WHERE `a` = ?");
        assert_eq!(stmt.params, vec![json!(1)]);
    }

    #[test]
    fn test_two_filters_default_logic() {
        let spec = QuerySpec::table("t")
            .filter(FilterClause::new(
                ColumnExpr::column("x"),
                ComparisonOp::Gt,
                Operand::Literal(json!(5)),
            ))
            .filter(FilterClause::new(
                ColumnExpr::column("y"),
                ComparisonOp::Lt,
                Operand::Literal(json!(10)),
            ));
        let stmt = build_statement(&spec);
        assert_eq!(stmt.text, "SELECT * FROM `t` WHERE (`x` > ?) AND (`y` < ?)");
        assert_eq!(stmt.params, vec![json!(5), json!(10)]);
    }

    #[test]
    fn test_plain_sort() {
        let spec = QuerySpec::table("t").sort("name", SortOrder::Desc);
        let stmt = build_statement(&spec);
        assert_eq!(stmt.text, "SELECT * FROM `t` ORDER BY `name` DESC");
    }

    #[test]
    fn test_aggregate_sort_wraps_subquery() {
        let spec = QuerySpec::table("t")
            .filter(FilterClause::new(
                ColumnExpr::aggregate(Aggregate::Sum, "amt"),
                ComparisonOp::Gt,
                Operand::Literal(json!(100)),
            ))
            .sort(" SUM(amt) ", SortOrder::Asc);
        let stmt = build_statement(&spec);
        assert_eq!(
            stmt.text,
            "SELECT * FROM (SELECT * FROM `t` WHERE (SUM(`amt`) > ?)) AS subquery ORDER BY SUM(amt) ASC"
        );
        assert_eq!(stmt.params, vec![json!(100)]);
    }

    #[test]
    fn test_search_values_bind_before_filter_values() {
        let spec = QuerySpec::table("orders")
            .search(SearchTerm::new("status", json!("paid")))
            .filter(FilterClause::new(
                ColumnExpr::column("total"),
                ComparisonOp::Gte,
                Operand::Literal(json!(20)),
            ))
            .filter(
                FilterClause::new(
                    ColumnExpr::column("region"),
                    ComparisonOp::Eq,
                    Operand::Literal(json!("eu")),
                )
                .with_logic(Logic::Or),
            );
        let stmt = build_statement(&spec);
        assert_eq!(
            stmt.text,
            "SELECT * FROM `orders` WHERE `status` = ? (`total` >= ?) OR (`region` = ?)"
        );
        assert_eq!(stmt.params, vec![json!("paid"), json!(20), json!("eu")]);
        assert!(stmt.is_aligned());
    }

    #[test]
    fn test_build_is_idempotent() {
        let spec = QuerySpec::table("t")
            .search(SearchTerm::new("a", json!(1)))
            .sort("MAX(b)", SortOrder::Desc);
        assert_eq!(build_statement(&spec), build_statement(&spec));
    }
}
