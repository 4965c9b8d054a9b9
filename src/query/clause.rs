//! # Clause Builders
//!
//! Builds the search and filter predicate fragments of the WHERE clause.
//! Literal values never enter the text; they go through the
//! [`ParamBinder`] and are replaced by `?`.

use super::ident::quote_ident;
use super::params::ParamBinder;
use super::spec::{ColumnExpr, FilterClause, Operand, SearchTerm};

/// `` `a` = ? AND `b` = ? ``, or `None` for no terms
pub fn search_fragment(terms: &[SearchTerm], binder: &mut ParamBinder) -> Option<String> {
    if terms.is_empty() {
        return None;
    }

    let parts: Vec<String> = terms
        .iter()
        .map(|term| {
            let placeholder = binder.bind(term.value.clone());
            format!("{} = {}", quote_ident(&term.column), placeholder)
        })
        .collect();

    Some(parts.join(" AND "))
}

/// `` (`x` > ?) OR (SUM(`y`) < `z`) ``, or `None` for no filters.
///
/// The first entry never carries a connector.
pub fn filter_fragment(filters: &[FilterClause], binder: &mut ParamBinder) -> Option<String> {
    if filters.is_empty() {
        return None;
    }

    let parts: Vec<String> = filters
        .iter()
        .enumerate()
        .map(|(index, filter)| {
            let left = column_expr(&filter.left);
            let right = operand(&filter.right, binder);
            let predicate = format!("({} {} {})", left, filter.operator.as_str(), right);

            if index == 0 {
                predicate
            } else {
                format!("{} {}", filter.logic.as_str(), predicate)
            }
        })
        .collect();

    Some(parts.join(" "))
}

/// `" WHERE "` followed by the non-empty fragments, or an empty string
pub fn where_clause(fragments: &[Option<String>]) -> String {
    let parts: Vec<&str> = fragments
        .iter()
        .flatten()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" "))
    }
}

fn column_expr(expr: &ColumnExpr) -> String {
    match expr.aggregate {
        Some(agg) => format!("{}({})", agg.as_str(), quote_ident(&expr.column)),
        None => quote_ident(&expr.column),
    }
}

fn operand(operand: &Operand, binder: &mut ParamBinder) -> String {
    match operand {
        Operand::Aggregate { function, column } => {
            format!("{}({})", function.as_str(), quote_ident(column))
        }
        Operand::Column(column) => quote_ident(column),
        Operand::Literal(value) => binder.bind(value.clone()).to_string(),
    }
}
