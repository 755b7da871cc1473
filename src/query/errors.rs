//! Error types for query flattening.
//!
//! Malformed declarative input is rejected while the trees are flattened
//! into wire tokens. Each variant names the offending value so the caller
//! can find the faulty `sideload`, `filter` or `sort` call.

use thiserror::Error;

/// Error raised when a sideload, filter or sort tree cannot be flattened.
///
/// # Example
///
/// ```rust
/// use jsonapi_orchestrator::query::{flatten_sortings, QueryError};
/// use serde_json::json;
///
/// let result = flatten_sortings(&[json!({ "name": "up" })]);
/// assert!(matches!(result, Err(QueryError::InvalidSortDirection { value }) if value == "up"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A sideload leaf is neither `true` nor a nested mapping.
    #[error("Sideloading only accepts true or nested objects as sideloads, but received {value}")]
    InvalidSideloadLeaf {
        /// The rejected value, rendered as text.
        value: String,
    },

    /// A filter leaf is not a string, a boolean, or a list of those.
    #[error("Filtering only accepts nested objects, strings, booleans or lists of those, but received {value}")]
    InvalidFilterLeaf {
        /// The rejected value, rendered as text.
        value: String,
    },

    /// A sort path does not end in `asc` or `desc`.
    #[error("Sorting only accepts nested objects ending in 'asc' or 'desc', but received {value}")]
    InvalidSortDirection {
        /// The rejected value, rendered as text.
        value: String,
    },
}

/// Renders a JSON value for an error message; strings are shown unquoted.
pub(crate) fn describe(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Verify QueryError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<QueryError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_sideload_leaf_names_value() {
        let error = QueryError::InvalidSideloadLeaf {
            value: describe(&json!(42)),
        };
        let message = error.to_string();
        assert!(message.contains("42"));
        assert!(message.contains("Sideloading"));
    }

    #[test]
    fn test_invalid_sort_direction_names_value() {
        let error = QueryError::InvalidSortDirection {
            value: describe(&json!("upward")),
        };
        assert!(error.to_string().ends_with("but received upward"));
    }

    #[test]
    fn test_describe_renders_non_strings_as_json() {
        assert_eq!(describe(&json!(null)), "null");
        assert_eq!(describe(&json!([1, 2])), "[1,2]");
        assert_eq!(describe(&json!("plain")), "plain");
    }
}
