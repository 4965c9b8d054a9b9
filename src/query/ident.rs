//! Identifier quoting and aggregate detection

use std::sync::OnceLock;

use regex::Regex;

static AGGREGATE_WORD: OnceLock<Regex> = OnceLock::new();

/// Wrap an identifier in backticks, doubling any embedded backtick
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Whether `expr` contains MAX, MIN, AVG or SUM as a whole word, ignoring case
pub fn contains_aggregate(expr: &str) -> bool {
    AGGREGATE_WORD
        .get_or_init(|| {
            Regex::new(r"(?i)\b(MAX|MIN|AVG|SUM)\b").expect("aggregate pattern is valid")
        })
        .is_match(expr)
}
