//! Flattening of nested sideload, filter and sort trees into wire tokens.
//!
//! The three functions here are pure: they walk a `serde_json::Value`
//! tree in insertion order and either return the flat tokens or fail on
//! the first malformed leaf.
//!
//! ```rust
//! use jsonapi_orchestrator::query::{flatten_filters, flatten_includes, flatten_sortings};
//! use serde_json::json;
//!
//! let includes = flatten_includes(&json!({ "avatar": true, "profiles": { "user": true } })).unwrap();
//! assert_eq!(includes, vec!["avatar", "profiles.user"]);
//!
//! let sorts = flatten_sortings(&[json!({ "a": { "b": "desc" } }), json!({ "c": "asc" })]).unwrap();
//! assert_eq!(sorts, vec!["-a.b", "c"]);
//!
//! let filters = flatten_filters(&json!({ "company": { "name": ["air france", "axa"] } })).unwrap();
//! assert_eq!(filters[0].0, "filter[company][name]");
//! ```

use serde_json::Value;

use super::errors::{describe, QueryError};

/// Sort direction terminating a sort path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending, emitted as the bare path.
    Asc,
    /// Descending, emitted with a `-` prefix.
    Desc,
}

impl SortDirection {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Flattens a sideload tree into dotted include paths.
///
/// # Errors
///
/// Returns [`QueryError::InvalidSideloadLeaf`] when a value is neither
/// `true` nor a mapping, or when the root itself is not a mapping.
pub fn flatten_includes(tree: &Value) -> Result<Vec<String>, QueryError> {
    let Value::Object(root) = tree else {
        return Err(QueryError::InvalidSideloadLeaf {
            value: describe(tree),
        });
    };

    let mut paths = Vec::new();
    let mut stack = Vec::new();
    collect_includes(root, &mut stack, &mut paths)?;
    Ok(paths)
}

fn collect_includes<'a>(
    node: &'a serde_json::Map<String, Value>,
    prefix: &mut Vec<&'a str>,
    paths: &mut Vec<String>,
) -> Result<(), QueryError> {
    for (key, value) in node {
        prefix.push(key);
        match value {
            Value::Bool(true) => paths.push(prefix.join(".")),
            Value::Object(children) => collect_includes(children, prefix, paths)?,
            other => {
                return Err(QueryError::InvalidSideloadLeaf {
                    value: describe(other),
                })
            }
        }
        prefix.pop();
    }
    Ok(())
}

/// Flattens a filter tree into `(bracketed-path, values)` pairs.
///
/// Scalar leaves become single-element lists; booleans are rendered as
/// `true` / `false`.
///
/// # Errors
///
/// Returns [`QueryError::InvalidFilterLeaf`] for numbers, nulls, lists
/// holding anything other than strings or booleans, or a non-mapping root.
pub fn flatten_filters(tree: &Value) -> Result<Vec<(String, Vec<String>)>, QueryError> {
    let Value::Object(root) = tree else {
        return Err(QueryError::InvalidFilterLeaf {
            value: describe(tree),
        });
    };

    let mut filters = Vec::new();
    for (key, value) in root {
        collect_filters(format!("filter[{key}]"), value, &mut filters)?;
    }
    Ok(filters)
}

fn collect_filters(
    path: String,
    value: &Value,
    filters: &mut Vec<(String, Vec<String>)>,
) -> Result<(), QueryError> {
    match value {
        Value::Object(children) => {
            for (key, child) in children {
                collect_filters(format!("{path}[{key}]"), child, filters)?;
            }
        }
        Value::Array(items) => {
            let values = items
                .iter()
                .map(filter_scalar)
                .collect::<Result<Vec<_>, _>>()?;
            filters.push((path, values));
        }
        scalar => filters.push((path, vec![filter_scalar(scalar)?])),
    }
    Ok(())
}

fn filter_scalar(value: &Value) -> Result<String, QueryError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(QueryError::InvalidFilterLeaf {
            value: describe(other),
        }),
    }
}

/// Flattens an ordered list of sort trees into sort tokens.
///
/// Each tree is descended through its first key at every level until a
/// string is reached. `asc` yields the dotted path, `desc` yields it with
/// a leading `-`. Order of the input list is preserved.
///
/// # Errors
///
/// Returns [`QueryError::InvalidSortDirection`] when a path ends in
/// anything other than `asc` or `desc`.
pub fn flatten_sortings(sortings: &[Value]) -> Result<Vec<String>, QueryError> {
    sortings.iter().map(flatten_sorting).collect()
}

fn flatten_sorting(sorting: &Value) -> Result<String, QueryError> {
    let mut path: Vec<&str> = Vec::new();
    let mut current = sorting;

    while let Value::Object(map) = current {
        let Some((key, next)) = map.iter().next() else {
            break;
        };
        path.push(key);
        current = next;
    }

    let direction = match current {
        Value::String(s) if !path.is_empty() => SortDirection::parse(s),
        _ => None,
    }
    .ok_or_else(|| QueryError::InvalidSortDirection {
        value: describe(current),
    })?;

    let joined = path.join(".");
    Ok(match direction {
        SortDirection::Asc => joined,
        SortDirection::Desc => format!("-{joined}"),
    })
}
