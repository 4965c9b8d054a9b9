//! Statement Construction Tests
//!
//! End-to-end checks from wire-level JSON to statement text:
//! - Placeholder count always equals the number of bound values
//! - Values bind in search-then-filter order
//! - Identifiers are quoted, literals never appear in the text
//! - Aggregate sorts wrap the statement as a derived table

use querydeck::cli::explain;
use querydeck::query::{build_statement, validate_payload, GeneratedStatement, ValidationError};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn statement(request: Value) -> GeneratedStatement {
    let spec = validate_payload(request).unwrap();
    build_statement(&spec)
}

// =============================================================================
// Shape Tests
// =============================================================================

#[test]
fn test_table_only_request() {
    let stmt = statement(json!({"table": "customers"}));
    assert_eq!(stmt.text, "SELECT * FROM `customers`");
    assert!(stmt.params.is_empty());
}

#[test]
fn test_search_terms_bind_in_order() {
    let stmt = statement(json!({
        "table": "customers",
        "search": [
            {"column": "city", "value": "Oslo"},
            {"column": "active", "value": true}
        ]
    }));

    assert_eq!(
        stmt.text,
        "SELECT * FROM `customers` WHERE `city` = ? AND `active` = ?"
    );
    assert_eq!(stmt.params, vec![json!("Oslo"), json!(true)]);
}

#[test]
fn test_filter_chain_with_or() {
    let stmt = statement(json!({
        "table": "orders",
        "filters": [
            {"leftCol": "total", "op": ">=", "rightValue": 100},
            {"logic": "OR", "leftCol": "status", "op": "like", "rightValue": "open%"}
        ]
    }));

    assert_eq!(
        stmt.text,
        "SELECT * FROM `orders` WHERE (`total` >= ?) OR (`status` LIKE ?)"
    );
    assert_eq!(stmt.params, vec![json!(100), json!("open%")]);
}

#[test]
fn test_aggregate_and_column_operands() {
    let stmt = statement(json!({
        "table": "orders",
        "filters": [
            {
                "leftCol": "amount",
                "leftAgg": "SUM",
                "op": ">",
                "rightCol": "budget",
                "rightAgg": "max"
            },
            {"leftCol": "shipped", "op": "<>", "rightCol": "ordered"}
        ]
    }));

    assert_eq!(
        stmt.text,
        "SELECT * FROM `orders` WHERE (SUM(`amount`) > MAX(`budget`)) AND (`shipped` <> `ordered`)"
    );
    assert!(stmt.params.is_empty());
}

#[test]
fn test_search_values_precede_filter_values() {
    let stmt = statement(json!({
        "table": "orders",
        "search": [{"column": "region", "value": "north"}],
        "filters": [{"leftCol": "total", "op": "<", "rightValue": 50}]
    }));

    assert_eq!(stmt.params, vec![json!("north"), json!(50)]);
    assert!(stmt.is_aligned());
}

// =============================================================================
// Sort Tests
// =============================================================================

#[test]
fn test_plain_sort_defaults_to_ascending() {
    let stmt = statement(json!({"table": "t", "sort": {"column": "name"}}));
    assert_eq!(stmt.text, "SELECT * FROM `t` ORDER BY `name` ASC");

    let stmt = statement(json!({"table": "t", "sort": {"column": "name", "order": "descending"}}));
    assert_eq!(stmt.text, "SELECT * FROM `t` ORDER BY `name` ASC");
}

#[test]
fn test_aggregate_sort_wraps_statement() {
    let stmt = statement(json!({
        "table": "sales",
        "filters": [{"leftCol": "qty", "op": ">", "rightValue": 0}],
        "sort": {"column": " SUM(amount) ", "order": "desc"}
    }));

    assert_eq!(
        stmt.text,
        "SELECT * FROM (SELECT * FROM `sales` WHERE (`qty` > ?)) AS subquery ORDER BY SUM(amount) DESC"
    );
    assert_eq!(stmt.params, vec![json!(0)]);
}

#[test]
fn test_aggregate_sort_text_is_emitted_verbatim() {
    let stmt = explain(json!({"table": "t", "sort": {"column": "MAX(a) = ?"}})).unwrap();

    assert_eq!(
        stmt.text,
        "SELECT * FROM (SELECT * FROM `t`) AS subquery ORDER BY MAX(a) = ? ASC"
    );
    assert!(stmt.params.is_empty());
    assert_eq!(stmt.placeholder_count(), 1);
    assert!(!stmt.is_aligned());
}

// =============================================================================
// Safety Tests
// =============================================================================

#[test]
fn test_literals_never_reach_statement_text() {
    let hostile = "x'; DROP TABLE users; --";
    let stmt = statement(json!({
        "table": "users",
        "search": [{"column": "name", "value": hostile}],
        "filters": [{"leftCol": "email", "op": "=", "rightValue": hostile}]
    }));

    assert!(!stmt.text.contains("DROP"));
    assert_eq!(stmt.params, vec![json!(hostile), json!(hostile)]);
}

#[test]
fn test_backticks_in_identifiers_are_doubled() {
    let stmt = statement(json!({"table": "we`ird", "sort": {"column": "a`b"}}));
    assert_eq!(stmt.text, "SELECT * FROM `we``ird` ORDER BY `a``b` ASC");
}

#[test]
fn test_unknown_operator_is_rejected() {
    let err = validate_payload(json!({
        "table": "t",
        "filters": [{"leftCol": "a", "op": "; DELETE", "rightValue": 1}]
    }))
    .unwrap_err();

    assert!(matches!(err, ValidationError::InvalidOperator { index: 0, .. }));
}

#[test]
fn test_unknown_aggregate_is_rejected() {
    let err = validate_payload(json!({
        "table": "t",
        "filters": [{"leftCol": "a", "leftAgg": "COUNT", "op": "=", "rightValue": 1}]
    }))
    .unwrap_err();

    assert!(matches!(err, ValidationError::InvalidAggregate { index: 0, .. }));
}

#[test]
fn test_placeholders_align_across_requests() {
    let requests = vec![
        json!({"table": "t"}),
        json!({"table": "t", "search": [{"column": "a", "value": 1}]}),
        json!({"table": "t", "filters": [{"leftCol": "a", "op": "!=", "rightValue": null}]}),
        json!({
            "table": "t",
            "search": [{"column": "a", "value": 1}, {"column": "b", "value": 2}],
            "filters": [
                {"leftCol": "c", "op": "<=", "rightValue": 3},
                {"logic": "or", "leftCol": "d", "op": "NOT LIKE", "rightCol": "e"},
                {"leftCol": "f", "op": "=", "rightValue": "g"}
            ],
            "sort": {"column": "AVG(c)", "order": "DESC"}
        }),
    ];

    for request in requests {
        let stmt = statement(request);
        assert!(stmt.is_aligned(), "misaligned: {}", stmt.text);
    }
}

#[test]
fn test_building_is_deterministic() {
    let request = json!({
        "table": "orders",
        "search": [{"column": "region", "value": "north"}],
        "filters": [{"leftCol": "total", "leftAgg": "avg", "op": ">", "rightValue": 10}],
        "sort": {"column": "total", "order": "desc"}
    });

    let first = statement(request.clone());
    for _ in 0..10 {
        assert_eq!(statement(request.clone()), first);
    }
}
