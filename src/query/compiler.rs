//! Compilation of a read query into an ordered parameter map.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::errors::QueryError;
use super::flatten::{flatten_filters, flatten_includes, flatten_sortings};
use super::merge::{merge_filters, merge_sideloads};
use super::params::{encode_joined, QueryParams, QueryValue};

/// The declarative part of a read: sideloads, filters, sortings and pages.
///
/// Trees are kept as written and only validated when compiled, so a
/// malformed leaf surfaces as a [`QueryError`] from [`QuerySpec::compile`].
///
/// # Example
///
/// ```rust
/// use jsonapi_orchestrator::query::QuerySpec;
/// use indexmap::IndexMap;
/// use serde_json::json;
///
/// let mut spec = QuerySpec::default();
/// spec.sideload(json!({ "school": true }));
/// spec.filter(json!({ "companyname": ["airfrance", "axa"] }));
/// spec.sort(json!({ "companyname": "desc" }));
///
/// let params = spec.compile(&IndexMap::new()).unwrap();
/// assert_eq!(params.to_query_string(), "sort=-companyname&include=school&filter[companyname]=airfrance,axa");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct QuerySpec {
    sideloads: Value,
    filters: Value,
    sortings: Vec<Value>,
    pages: IndexMap<String, u64>,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            sideloads: Value::Object(Map::new()),
            filters: Value::Object(Map::new()),
            sortings: Vec::new(),
            pages: IndexMap::new(),
        }
    }
}

impl QuerySpec {
    /// Unions a sideload tree into the existing one.
    pub fn sideload(&mut self, tree: Value) {
        merge_sideloads(&mut self.sideloads, tree);
    }

    /// Deep-merges a filter tree; colliding leaves are overwritten.
    pub fn filter(&mut self, tree: Value) {
        merge_filters(&mut self.filters, tree);
    }

    /// Appends a sort tree, or every element of an array of sort trees.
    pub fn sort(&mut self, sorting: Value) {
        match sorting {
            Value::Array(items) => self.sortings.extend(items),
            single => self.sortings.push(single),
        }
    }

    /// Sets one pagination key, overwriting a previous value.
    pub fn page(&mut self, key: impl Into<String>, value: u64) {
        self.pages.insert(key.into(), value);
    }

    /// Returns the merged sideload tree.
    #[must_use]
    pub const fn sideloads(&self) -> &Value {
        &self.sideloads
    }

    /// Returns the merged filter tree.
    #[must_use]
    pub const fn filters(&self) -> &Value {
        &self.filters
    }

    /// Returns the sort trees in the order they were added.
    #[must_use]
    pub fn sortings(&self) -> &[Value] {
        &self.sortings
    }

    /// Returns the pagination mapping.
    #[must_use]
    pub const fn pages(&self) -> &IndexMap<String, u64> {
        &self.pages
    }

    /// Joined `sort` value, e.g. `-positivelikecount,companyname`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidSortDirection`] for a malformed sort.
    pub fn joined_sortings(&self) -> Result<String, QueryError> {
        Ok(encode_joined(flatten_sortings(&self.sortings)?))
    }

    /// Joined `include` value, e.g. `avatar,profiles.user`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidSideloadLeaf`] for a malformed sideload.
    pub fn joined_sideloads(&self) -> Result<String, QueryError> {
        Ok(encode_joined(flatten_includes(&self.sideloads)?))
    }

    /// Filter keys mapped to their encoded, comma-joined values.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidFilterLeaf`] for a malformed filter.
    pub fn joined_filters(&self) -> Result<IndexMap<String, String>, QueryError> {
        Ok(flatten_filters(&self.filters)?
            .into_iter()
            .map(|(path, values)| (path, encode_joined(values)))
            .collect())
    }

    /// Compiles the query into wire parameters.
    ///
    /// Order: `sort`, `include`, `page[<key>]`, `filter[...]`, then the
    /// `ambient` params. Ambient params never replace a compiled key and
    /// empty values are left out entirely.
    ///
    /// # Errors
    ///
    /// Returns the first [`QueryError`] raised while flattening.
    pub fn compile(&self, ambient: &IndexMap<String, String>) -> Result<QueryParams, QueryError> {
        let mut params = QueryParams::new();

        let sort = self.joined_sortings()?;
        if !sort.is_empty() {
            params.insert("sort", QueryValue::Encoded(sort));
        }

        let include = self.joined_sideloads()?;
        if !include.is_empty() {
            params.insert("include", QueryValue::Encoded(include));
        }

        for (key, value) in &self.pages {
            params.insert(format!("page[{key}]"), *value);
        }

        for (path, joined) in self.joined_filters()? {
            if !joined.is_empty() {
                params.insert(path, QueryValue::Encoded(joined));
            }
        }

        for (key, value) in ambient {
            if !value.is_empty() && !params.insert_if_absent(key.clone(), value.as_str()) {
                tracing::debug!("Ignoring ambient query param '{}' shadowed by compiled query", key);
            }
        }

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sortings_concatenate_in_definition_order() {
        let mut spec = QuerySpec::default();
        spec.sort(json!({ "positivelikecount": "desc" }));
        spec.sort(json!({ "companyname": "asc" }));
        assert_eq!(spec.joined_sortings().unwrap(), "-positivelikecount,companyname");
    }

    #[test]
    fn test_sort_accepts_array_of_sortings() {
        let mut spec = QuerySpec::default();
        spec.sort(json!([{ "positive_like_count": "desc" }, { "company_name": "asc" }]));
        assert_eq!(spec.joined_sortings().unwrap(), "-positive_like_count,company_name");
    }

    #[test]
    fn test_multiple_filters_are_encoded_per_element() {
        let mut spec = QuerySpec::default();
        spec.filter(json!({ "company": { "name": ["air france", "axa"] } }));
        spec.filter(json!({ "company": { "sector": ["it, digital", "business"] } }));

        let filters = spec.joined_filters().unwrap();
        assert_eq!(filters["filter[company][name]"], "air%20france,axa");
        assert_eq!(filters["filter[company][sector]"], "it%2C%20digital,business");
    }

    #[test]
    fn test_merges_multiple_sideloads_sharing_common_path() {
        let mut spec = QuerySpec::default();
        spec.sideload(json!({ "profiles": { "user": true } }));
        spec.sideload(json!({ "profiles": { "user": { "organization": true } } }));
        assert_eq!(spec.joined_sideloads().unwrap(), "profiles.user.organization");
    }

    #[test]
    fn test_compile_orders_keys() {
        let mut spec = QuerySpec::default();
        spec.filter(json!({ "cancelled": [false] }));
        spec.page("size", 12);
        spec.page("number", 3);
        spec.sideload(json!({ "appointments": true }));
        spec.sort(json!({ "last_message_at": "desc" }));

        let mut ambient = IndexMap::new();
        ambient.insert("locale".to_string(), "fr".to_string());

        let params = spec.compile(&ambient).unwrap();
        let keys: Vec<_> = params.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "sort",
                "include",
                "page[size]",
                "page[number]",
                "filter[cancelled]",
                "locale"
            ]
        );
    }

    #[test]
    fn test_compile_omits_empty_values() {
        let spec = QuerySpec::default();
        let mut ambient = IndexMap::new();
        ambient.insert("blank".to_string(), String::new());

        let params = spec.compile(&ambient).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_ambient_params_do_not_overwrite_compiled_keys() {
        let mut spec = QuerySpec::default();
        spec.sort(json!({ "name": "asc" }));

        let mut ambient = IndexMap::new();
        ambient.insert("sort".to_string(), "-hacked".to_string());
        ambient.insert("extra".to_string(), "1".to_string());

        let params = spec.compile(&ambient).unwrap();
        assert_eq!(params.wire_value("sort"), Some("name".to_string()));
        assert_eq!(params.wire_value("extra"), Some("1".to_string()));
    }

    #[test]
    fn test_page_overwrites_identical_keys() {
        let mut spec = QuerySpec::default();
        spec.page("size", 10);
        spec.page("size", 25);
        let params = spec.compile(&IndexMap::new()).unwrap();
        assert_eq!(params.wire_value("page[size]"), Some("25".to_string()));
    }

    #[test]
    fn test_compile_is_idempotent() {
        let mut spec = QuerySpec::default();
        spec.sideload(json!({ "user": true }));
        spec.filter(json!({ "name": "bob" }));
        let ambient = IndexMap::new();
        assert_eq!(spec.compile(&ambient).unwrap(), spec.compile(&ambient).unwrap());
    }

    #[test]
    fn test_compile_surfaces_flattening_errors() {
        let mut spec = QuerySpec::default();
        spec.sideload(json!({ "user": 1 }));
        assert!(matches!(
            spec.compile(&IndexMap::new()),
            Err(QueryError::InvalidSideloadLeaf { .. })
        ));
    }
}
