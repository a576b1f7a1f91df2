//
//  bitbucket-mcp
//  output/json.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # JSON Output Formatting
//!
//! Pretty-printing and JMESPath filtering for the generic API tools.
//!
//! Filters use [JMESPath](https://jmespath.org) syntax, the same language
//! the Atlassian CLIs accept in `--query`:
//!
//! | Filter | Result |
//! |--------|--------|
//! | `values[*].slug` | Array of slugs |
//! | `values[0].links.html.href` | A single URL |
//! | `{name: display_name, id: account_id}` | A projected object |
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_mcp::output::json::{apply_jq_filter, to_json_string};
//! use serde_json::json;
//!
//! let value = json!({"values": [{"slug": "a"}, {"slug": "b"}]});
//! let slugs = apply_jq_filter(&value, Some("values[*].slug"))?;
//! assert_eq!(to_json_string(&slugs)?, "[\n  \"a\",\n  \"b\"\n]");
//! # Ok::<(), bitbucket_mcp::api::ApiError>(())
//! ```

use serde_json::Value;

use crate::api::ApiError;

/// Applies a JMESPath filter to `value`.
///
/// A `None` or blank filter returns the value unchanged.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] when the expression does not
/// compile or cannot be evaluated against the value.
pub fn apply_jq_filter(value: &Value, filter: Option<&str>) -> Result<Value, ApiError> {
    let Some(expression) = filter.map(str::trim).filter(|f| !f.is_empty()) else {
        return Ok(value.clone());
    };

    let compiled = jmespath::compile(expression).map_err(|e| {
        ApiError::InvalidRequest(format!("Invalid JMESPath expression '{}': {}", expression, e))
    })?;
    let result = compiled.search(value).map_err(|e| {
        ApiError::InvalidRequest(format!("Failed to apply JMESPath expression: {}", e))
    })?;

    tracing::debug!("Applied JMESPath filter: {}", expression);
    Ok(serde_json::to_value(&*result)?)
}

/// Serializes a value as pretty-printed JSON with two-space indentation.
pub fn to_json_string(value: &Value) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_filter_returns_input() {
        let value = json!({"a": 1});
        assert_eq!(apply_jq_filter(&value, None).unwrap(), value);
        assert_eq!(apply_jq_filter(&value, Some("  ")).unwrap(), value);
    }

    #[test]
    fn test_projection() {
        let value = json!({
            "values": [
                {"slug": "api", "is_private": true},
                {"slug": "web", "is_private": false}
            ]
        });
        assert_eq!(
            apply_jq_filter(&value, Some("values[?is_private].slug")).unwrap(),
            json!(["api"])
        );
        assert_eq!(
            apply_jq_filter(&value, Some("values[1].slug")).unwrap(),
            json!("web")
        );
    }

    #[test]
    fn test_missing_field_is_null() {
        let value = json!({"a": 1});
        assert_eq!(apply_jq_filter(&value, Some("b")).unwrap(), Value::Null);
    }

    #[test]
    fn test_invalid_expression() {
        let err = apply_jq_filter(&json!({}), Some("values[")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn test_pretty_print() {
        assert_eq!(
            to_json_string(&json!({"k": [1]})).unwrap(),
            "{\n  \"k\": [\n    1\n  ]\n}"
        );
    }
}
