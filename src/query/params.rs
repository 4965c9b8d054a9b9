//! # Parameter Binding
//!
//! Positional parameters for generated statements. Every `?` pushed into
//! the statement text is paired with exactly one value here, in the same
//! left-to-right order.

use serde::Serialize;
use serde_json::Value;

/// Ordered values for the `?` placeholders of one statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamBinder {
    values: Vec<Value>,
}

impl ParamBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value and return the placeholder that stands for it
    pub fn bind(&mut self, value: Value) -> &'static str {
        self.values.push(value);
        "?"
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Finished statement text plus its bound values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedStatement {
    #[serde(rename = "query")]
    pub text: String,
    pub params: Vec<Value>,
}

impl GeneratedStatement {
    pub fn new(text: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            text: text.into(),
            params,
        }
    }

    /// Number of `?` placeholders outside backtick-quoted identifiers
    pub fn placeholder_count(&self) -> usize {
        let mut in_ident = false;
        let mut count = 0;
        for c in self.text.chars() {
            match c {
                // A doubled backtick toggles twice, leaving the state unchanged
                '`' => in_ident = !in_ident,
                '?' if !in_ident => count += 1,
                _ => {}
            }
        }
        count
    }

    /// Placeholders and parameters line up one to one
    pub fn is_aligned(&self) -> bool {
        self.placeholder_count() == self.params.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bind_preserves_order() {
        let mut binder = ParamBinder::new();
        assert_eq!(binder.bind(json!(1)), "?");
        binder.bind(json!("two"));
        binder.bind(Value::Null);
        assert_eq!(binder.len(), 3);
        assert_eq!(binder.into_values(), vec![json!(1), json!("two"), Value::Null]);
    }

    #[test]
    fn test_placeholder_count_skips_identifiers() {
        let stmt = GeneratedStatement::new("SELECT * FROM `t` WHERE `what?` = ?", vec![json!(1)]);
        assert_eq!(stmt.placeholder_count(), 1);
        assert!(stmt.is_aligned());

        let stmt = GeneratedStatement::new("SELECT * FROM `a``b?` WHERE `x` = ?", vec![]);
        assert_eq!(stmt.placeholder_count(), 1);
        assert!(!stmt.is_aligned());
    }
}
