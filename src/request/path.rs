//! URL template resolution.
//!
//! Templates name their path parameters with `:name` placeholders:
//!
//! - `/conversations/:id`
//! - `/organizations/:organization_id/users/:id`
//!
//! [`resolve_url`] substitutes the placeholders it has values for and
//! merges every remaining parameter into the query string.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_orchestrator::query::QueryParams;
//! use jsonapi_orchestrator::request::resolve_url;
//!
//! let params: QueryParams = [("id", "cafebabe"), ("otherURIParam", "deadbeef")]
//!     .into_iter()
//!     .collect();
//!
//! let url = resolve_url("/conversations/:id", &params);
//! assert_eq!(url, "/conversations/cafebabe?otherURIParam=deadbeef");
//! ```

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::query::{encode_key, QueryParams};

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits a template into path, optional query and optional fragment.
fn split_template(template: &str) -> (&str, Option<&str>, Option<&str>) {
    let (rest, fragment) = match template.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (template, None),
    };
    match rest.split_once('?') {
        Some((path, query)) => (path, Some(query), fragment),
        None => (rest, None, fragment),
    }
}

/// Walks the `:name` tokens of `path`, handing each name to `replace`.
///
/// `replace` returns the substitution, or `None` to keep the token as
/// written.
fn substitute<F>(path: &str, mut replace: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut result = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(index) = rest.find(':') {
        result.push_str(&rest[..index]);
        let after = &rest[index + 1..];
        let name_len = after.find(|c: char| !is_name_char(c)).unwrap_or(after.len());
        let name = &after[..name_len];

        let replacement = if name.is_empty() { None } else { replace(name) };
        match replacement {
            Some(value) => result.push_str(&value),
            None => {
                result.push(':');
                result.push_str(name);
            }
        }
        rest = &after[name_len..];
    }

    result.push_str(rest);
    result
}

/// Returns the placeholder names of the template, in order.
///
/// # Example
///
/// ```rust
/// use jsonapi_orchestrator::request::template_placeholders;
///
/// let names = template_placeholders("/organizations/:organization_id/users/:id?owner=:user_id");
/// assert_eq!(names, vec!["organization_id", "id", "user_id"]);
/// ```
#[must_use]
pub fn template_placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    substitute(template, |name| {
        if !names.iter().any(|known| known == name) {
            names.push(name.to_string());
        }
        None
    });
    names
}

/// Re-encodes a query key written in the template so that it compares
/// equal to the keys produced by [`encode_key`].
fn normalize_key(key: &str) -> String {
    urlencoding::decode(key).map_or_else(|_| key.to_string(), |decoded| encode_key(&decoded))
}

/// Resolves a URL template against a set of parameters.
///
/// Every `:name` placeholder with a matching parameter, in the path or in
/// the query string, is replaced by the encoded value, and the parameter is
/// consumed. Placeholders without a value are left as written. Remaining
/// parameters are merged into the template's query string: existing keys
/// keep their position and take the new value, new keys are appended in
/// iteration order. A `#fragment` is kept at the end.
///
/// Query values already present in the template are emitted verbatim. Their
/// keys are compared in encoded form, so `filter%5Bx%5D` and `filter[x]`
/// name the same parameter.
#[must_use]
pub fn resolve_url(template: &str, params: &QueryParams) -> String {
    let (path, existing_query, fragment) = split_template(template);

    let mut consumed = HashSet::new();
    let mut replace = |name: &str| {
        let value = params.get(name)?;
        consumed.insert(name.to_string());
        Some(value.to_wire())
    };

    let mut url = substitute(path, &mut replace);
    let existing_query = existing_query.map(|q| substitute(q, &mut replace));
    let fragment = fragment.map(|f| substitute(f, &mut replace));

    let mut query: IndexMap<String, String> = IndexMap::new();
    for pair in existing_query.iter().flat_map(|q| q.split('&')) {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        query.insert(normalize_key(key), value.to_string());
    }

    for (key, value) in params.iter() {
        if consumed.contains(key.as_str()) {
            continue;
        }
        query.insert(encode_key(key), value.to_wire());
    }

    if !query.is_empty() {
        url.push('?');
        let pairs: Vec<String> = query
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        url.push_str(&pairs.join("&"));
    }

    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(&fragment);
    }

    url
}
