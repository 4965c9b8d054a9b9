//! # Query Request Validator
//!
//! Turns the wire-level JSON request into a [`QuerySpec`].
//!
//! Absent or `null` `search`/`filters` become empty lists and an absent
//! `sort` (or one with a blank column) means no ordering. Empty strings
//! in optional filter fields count as absent.

use serde::Deserialize;
use serde_json::Value;

use super::errors::{ValidationError, ValidationResult};
use super::spec::{
    Aggregate, ColumnExpr, ComparisonOp, FilterClause, Logic, Operand, QuerySpec, SearchTerm,
    SortOrder, SortSpec,
};

/// `POST /api/query` request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub table: Option<String>,

    #[serde(default)]
    pub search: Option<Vec<SearchTermRequest>>,

    #[serde(default)]
    pub filters: Option<Vec<FilterRequest>>,

    #[serde(default)]
    pub sort: Option<SortRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchTermRequest {
    pub column: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    #[serde(default)]
    pub logic: Option<String>,
    pub left_col: String,
    #[serde(default)]
    pub left_agg: Option<String>,
    pub op: String,
    #[serde(default)]
    pub right_col: Option<String>,
    #[serde(default)]
    pub right_agg: Option<String>,
    #[serde(default)]
    pub right_value: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SortRequest {
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

impl QueryRequest {
    /// Decode a raw JSON payload
    pub fn from_value(payload: Value) -> ValidationResult<Self> {
        serde_json::from_value(payload)
            .map_err(|e| ValidationError::MalformedRequest(e.to_string()))
    }

    /// Validate into a [`QuerySpec`]
    pub fn validate(self) -> ValidationResult<QuerySpec> {
        let table = self
            .table
            .filter(|t| !t.is_empty())
            .ok_or(ValidationError::MissingTable)?;

        let search = self
            .search
            .unwrap_or_default()
            .into_iter()
            .map(|term| SearchTerm::new(term.column, term.value))
            .collect();

        let filters = self
            .filters
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, filter)| validate_filter(index, filter))
            .collect::<ValidationResult<Vec<_>>>()?;

        let sort = self.sort.and_then(|sort| {
            let column = sort.column.filter(|c| !c.trim().is_empty())?;
            Some(SortSpec {
                column,
                order: SortOrder::from_token(sort.order.as_deref()),
            })
        });

        Ok(QuerySpec {
            table,
            search,
            filters,
            sort,
        })
    }
}

/// Decode and validate a raw JSON payload in one step
pub fn validate_payload(payload: Value) -> ValidationResult<QuerySpec> {
    QueryRequest::from_value(payload)?.validate()
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

fn parse_aggregate(index: usize, token: Option<String>) -> ValidationResult<Option<Aggregate>> {
    match non_empty(token) {
        None => Ok(None),
        Some(token) => Aggregate::parse(&token)
            .map(Some)
            .ok_or(ValidationError::InvalidAggregate { index, token }),
    }
}

fn validate_filter(index: usize, filter: FilterRequest) -> ValidationResult<FilterClause> {
    let logic = match non_empty(filter.logic) {
        None => Logic::And,
        Some(token) => {
            Logic::parse(&token).ok_or(ValidationError::InvalidLogic { index, token })?
        }
    };

    let operator = ComparisonOp::parse(&filter.op).ok_or_else(|| {
        ValidationError::InvalidOperator {
            index,
            token: filter.op.clone(),
        }
    })?;

    let left = ColumnExpr {
        column: filter.left_col,
        aggregate: parse_aggregate(index, filter.left_agg)?,
    };

    // Precedence: aggregate > column > literal
    let right_col = non_empty(filter.right_col);
    let right = match (parse_aggregate(index, filter.right_agg)?, right_col) {
        (Some(function), Some(column)) => Operand::Aggregate { function, column },
        (Some(_), None) => return Err(ValidationError::MissingAggregateColumn(index)),
        (None, Some(column)) => Operand::Column(column),
        (None, None) => Operand::Literal(filter.right_value.unwrap_or(Value::Null)),
    };

    Ok(FilterClause {
        logic,
        left,
        operator,
        right,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_table_only() {
        let spec = validate_payload(json!({"table": "t"})).unwrap();
        assert_eq!(spec, QuerySpec::table("t"));
    }

    #[test]
    fn test_null_lists_default_to_empty() {
        let spec =
            validate_payload(json!({"table": "t", "search": null, "filters": null, "sort": null}))
                .unwrap();
        assert!(spec.search.is_empty());
        assert!(spec.filters.is_empty());
        assert!(spec.sort.is_none());
    }

    #[test]
    fn test_missing_table() {
        assert_eq!(
            validate_payload(json!({})).unwrap_err(),
            ValidationError::MissingTable
        );
        assert_eq!(
            validate_payload(json!({"table": ""})).unwrap_err(),
            ValidationError::MissingTable
        );
    }

    #[test]
    fn test_malformed_payload() {
        let err = validate_payload(json!({"table": 42})).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedRequest(_)));

        let err = validate_payload(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedRequest(_)));
    }

    #[test]
    fn test_right_operand_precedence() {
        let spec = validate_payload(json!({
            "table": "t",
            "filters": [
                {"leftCol": "a", "op": ">", "rightAgg": "max", "rightCol": "b", "rightValue": 3},
                {"leftCol": "a", "op": ">", "rightCol": "b", "rightValue": 3},
                {"leftCol": "a", "op": ">", "rightValue": 3},
                {"leftCol": "a", "op": "=", "rightCol": ""}
            ]
        }))
        .unwrap();

        assert_eq!(
            spec.filters[0].right,
            Operand::Aggregate {
                function: Aggregate::Max,
                column: "b".to_string()
            }
        );
        assert_eq!(spec.filters[1].right, Operand::Column("b".to_string()));
        assert_eq!(spec.filters[2].right, Operand::Literal(json!(3)));
        assert_eq!(spec.filters[3].right, Operand::Literal(Value::Null));
    }

    #[test]
    fn test_right_aggregate_needs_column() {
        let err = validate_payload(json!({
            "table": "t",
            "filters": [{"leftCol": "a", "op": ">", "rightAgg": "sum"}]
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingAggregateColumn(0));
    }

    #[test]
    fn test_rejects_unknown_tokens() {
        let err = validate_payload(json!({
            "table": "t",
            "filters": [{"leftCol": "a", "op": "= 1 OR 1 =", "rightValue": 1}]
        }))
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidOperator { index: 0, .. }));

        let err = validate_payload(json!({
            "table": "t",
            "filters": [
                {"leftCol": "a", "op": "=", "rightValue": 1},
                {"logic": "XOR", "leftCol": "b", "op": "=", "rightValue": 2}
            ]
        }))
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidLogic { index: 1, .. }));

        let err = validate_payload(json!({
            "table": "t",
            "filters": [{"leftCol": "a", "leftAgg": "count", "op": "=", "rightValue": 1}]
        }))
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAggregate { index: 0, .. }));
    }

    #[test]
    fn test_empty_optional_fields_are_absent() {
        let spec = validate_payload(json!({
            "table": "t",
            "filters": [{
                "logic": "",
                "leftCol": "a",
                "leftAgg": "",
                "op": "<",
                "rightAgg": "",
                "rightValue": 1
            }]
        }))
        .unwrap();
        let filter = &spec.filters[0];
        assert_eq!(filter.logic, Logic::And);
        assert_eq!(filter.left.aggregate, None);
        assert_eq!(filter.right, Operand::Literal(json!(1)));
    }

    #[test]
    fn test_sort_normalization() {
        let spec = validate_payload(json!({
            "table": "t",
            "sort": {"column": "name", "order": "desc"}
        }))
        .unwrap();
        assert_eq!(
            spec.sort,
            Some(SortSpec {
                column: "name".to_string(),
                order: SortOrder::Desc
            })
        );

        let spec = validate_payload(json!({"table": "t", "sort": {"column": "name"}})).unwrap();
        assert_eq!(spec.sort.unwrap().order, SortOrder::Asc);

        let spec = validate_payload(json!({"table": "t", "sort": {"column": "  "}})).unwrap();
        assert!(spec.sort.is_none());
    }
}
