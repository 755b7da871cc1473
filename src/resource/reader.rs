//! Read descriptors: what to fetch and how fresh it must be.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::query::{deep_merge, QueryError, QueryParams, QuerySpec};

/// Describes a single read (`show`) or list read (`index`).
///
/// A reader is built once per logical query, refined through its builder
/// methods, then handed to a [`RequestBuilder`](crate::request::RequestBuilder)
/// wrapped in [`Resource::Read`](crate::request::Resource::Read) or
/// [`Resource::ReadList`](crate::request::Resource::ReadList).
///
/// # Example
///
/// ```rust
/// use jsonapi_orchestrator::resource::ResourceReader;
/// use serde_json::json;
///
/// let mut reader = ResourceReader::new("employee/profile");
/// reader
///     .sideload(json!({ "user": true }))
///     .sideload(json!({ "educations": { "school": true } }))
///     .sort(json!({ "educations": { "school": { "name": "asc" } } }))
///     .filter(json!({ "company_name": ["air_france", "axa"] }))
///     .data_must_be_fresh();
///
/// let params = reader.query_params().unwrap();
/// assert_eq!(params.wire_value("include").as_deref(), Some("user,educations.school"));
/// assert_eq!(params.wire_value("sort").as_deref(), Some("educations.school.name"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceReader {
    jsonapi_type: String,
    query: QuerySpec,
    params: IndexMap<String, String>,
    meta: Value,
    fresher_than: Option<DateTime<Utc>>,
}

impl ResourceReader {
    /// Creates a reader for the given JSON:API type.
    #[must_use]
    pub fn new(jsonapi_type: impl Into<String>) -> Self {
        Self {
            jsonapi_type: jsonapi_type.into(),
            query: QuerySpec::default(),
            params: IndexMap::new(),
            meta: Value::Object(Map::new()),
            fresher_than: None,
        }
    }

    /// Returns the JSON:API type.
    #[must_use]
    pub fn jsonapi_type(&self) -> &str {
        &self.jsonapi_type
    }

    /// Unions a nested sideload tree (`include`).
    pub fn sideload(&mut self, sideloads: Value) -> &mut Self {
        self.query.sideload(sideloads);
        self
    }

    /// Deep-merges a nested filter tree; colliding leaves are replaced.
    pub fn filter(&mut self, filters: Value) -> &mut Self {
        self.query.filter(filters);
        self
    }

    /// Appends a sort tree, or an array of sort trees, after existing ones.
    pub fn sort(&mut self, sortings: Value) -> &mut Self {
        self.query.sort(sortings);
        self
    }

    /// Sets a pagination key such as `size` or `number`.
    pub fn page(&mut self, key: impl Into<String>, value: u64) -> &mut Self {
        self.query.page(key, value);
        self
    }

    /// Adds an ambient URL param, used for placeholders or the query string.
    pub fn param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Deep-merges request meta handed back to the dispatcher.
    pub fn add_meta(&mut self, meta: Value) -> &mut Self {
        deep_merge(&mut self.meta, meta);
        self
    }

    /// Requires data fetched after the current instant.
    pub fn data_must_be_fresh(&mut self) -> &mut Self {
        self.data_must_be_fresher_than(Utc::now())
    }

    /// Accepts any cached data.
    pub fn data_can_be_old(&mut self) -> &mut Self {
        self.data_must_be_fresher_than(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Requires data fetched after `watermark`.
    pub fn data_must_be_fresher_than(&mut self, watermark: DateTime<Utc>) -> &mut Self {
        self.fresher_than = Some(watermark);
        self
    }

    /// Returns the freshness watermark, if one was set.
    #[must_use]
    pub const fn fresher_than(&self) -> Option<DateTime<Utc>> {
        self.fresher_than
    }

    /// Returns the declarative query.
    #[must_use]
    pub const fn query(&self) -> &QuerySpec {
        &self.query
    }

    /// Returns the ambient params.
    #[must_use]
    pub const fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    /// Returns the request meta.
    #[must_use]
    pub const fn meta(&self) -> &Value {
        &self.meta
    }

    /// Joined `sort` value.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidSortDirection`] for a malformed sort.
    pub fn joined_sortings(&self) -> Result<String, QueryError> {
        self.query.joined_sortings()
    }

    /// Joined `include` value.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidSideloadLeaf`] for a malformed sideload.
    pub fn joined_sideloads(&self) -> Result<String, QueryError> {
        self.query.joined_sideloads()
    }

    /// Filter keys mapped to encoded, comma-joined values.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidFilterLeaf`] for a malformed filter.
    pub fn joined_filters(&self) -> Result<IndexMap<String, String>, QueryError> {
        self.query.joined_filters()
    }

    /// Compiles the query together with the ambient params.
    ///
    /// # Errors
    ///
    /// Returns the first [`QueryError`] raised while flattening.
    pub fn query_params(&self) -> Result<QueryParams, QueryError> {
        self.query.compile(&self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_reader_is_empty() {
        let reader = ResourceReader::new("conversation");
        assert_eq!(reader.jsonapi_type(), "conversation");
        assert!(reader.query_params().unwrap().is_empty());
        assert!(reader.fresher_than().is_none());
        assert_eq!(reader.meta(), &json!({}));
    }

    #[test]
    fn test_aggregates_all_params_for_a_request() {
        let mut reader = ResourceReader::new("employee");
        reader
            .sideload(json!({ "school": true }))
            .filter(json!({ "companyname": ["airfrance", "axa"] }))
            .sort(json!({ "companyname": "desc" }));

        let params = reader.query_params().unwrap();
        assert_eq!(params.wire_value("sort").as_deref(), Some("-companyname"));
        assert_eq!(params.wire_value("include").as_deref(), Some("school"));
        assert_eq!(
            params.wire_value("filter[companyname]").as_deref(),
            Some("airfrance,axa")
        );
    }

    #[test]
    fn test_freshness_watermarks() {
        let mut reader = ResourceReader::new("conversation");

        reader.data_can_be_old();
        assert_eq!(reader.fresher_than(), Some(DateTime::<Utc>::UNIX_EPOCH));

        let before = Utc::now();
        reader.data_must_be_fresh();
        assert!(reader.fresher_than().unwrap() >= before);

        let watermark = DateTime::parse_from_rfc3339("2018-09-09T08:42:00+01:00")
            .unwrap()
            .with_timezone(&Utc);
        reader.data_must_be_fresher_than(watermark);
        assert_eq!(reader.fresher_than(), Some(watermark));
    }

    #[test]
    fn test_add_meta_merges() {
        let mut reader = ResourceReader::new("conversation");
        reader.add_meta(json!({ "invitationToken": "42" }));
        reader.add_meta(json!({ "token": "deadbeef" }));
        assert_eq!(
            reader.meta(),
            &json!({ "invitationToken": "42", "token": "deadbeef" })
        );
    }

    #[test]
    fn test_params_flow_into_query() {
        let mut reader = ResourceReader::new("conversation");
        reader.param("locale", "fr").page("size", 12).page("number", 3);

        let params = reader.query_params().unwrap();
        assert_eq!(
            params.to_query_string(),
            "page[size]=12&page[number]=3&locale=fr"
        );
    }
}
