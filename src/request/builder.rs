//! The request compiler: descriptor + path template in, wire request out.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use super::action::{request_action_type, ActionPrefix};
use super::errors::{IncompleteRequestError, RequestError};
use super::path::{resolve_url, template_placeholders};
use crate::clients::HttpMethod;
use crate::config::ApiConfig;
use crate::query::{deep_merge, QueryParams};
use crate::resource::{Method, ResourceDocument, ResourceReader, ResourceWriter, WriteDocument};

/// The resource a request is about.
#[derive(Debug)]
pub enum Resource {
    /// Fetch one resource.
    Read(ResourceReader),
    /// Fetch a collection.
    ReadList(ResourceReader),
    /// Persist a write graph rooted at this node.
    Write(ResourceWriter),
}

impl Resource {
    /// Returns the JSON:API type of the resource.
    #[must_use]
    pub fn jsonapi_type(&self) -> &str {
        match self {
            Self::Read(reader) | Self::ReadList(reader) => reader.jsonapi_type(),
            Self::Write(writer) => writer.jsonapi_type(),
        }
    }

    /// Returns the verb prefix of the action-type tag.
    #[must_use]
    pub const fn action_prefix(&self) -> ActionPrefix {
        match self {
            Self::Read(_) => ActionPrefix::Read,
            Self::ReadList(_) => ActionPrefix::ReadList,
            Self::Write(writer) => match writer.effective_method() {
                Method::Create => ActionPrefix::Create,
                _ => ActionPrefix::Update,
            },
        }
    }

    /// `GET` for reads, the root verb's method for writes.
    #[must_use]
    pub const fn inferred_method(&self) -> HttpMethod {
        match self {
            Self::Read(_) | Self::ReadList(_) => HttpMethod::Get,
            Self::Write(writer) => writer.http_method(),
        }
    }

    /// Returns the request meta carried by the descriptor.
    #[must_use]
    pub const fn meta(&self) -> &Value {
        match self {
            Self::Read(reader) | Self::ReadList(reader) => reader.meta(),
            Self::Write(writer) => writer.meta(),
        }
    }

    /// Returns the freshness watermark of a read.
    #[must_use]
    pub const fn fresher_than(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Read(reader) | Self::ReadList(reader) => reader.fresher_than(),
            Self::Write(_) => None,
        }
    }

    /// The parameters contributed by the descriptor itself.
    fn descriptor_params(&self, template: &str) -> Result<QueryParams, RequestError> {
        match self {
            Self::Read(reader) | Self::ReadList(reader) => Ok(reader.query_params()?),
            Self::Write(writer) => {
                let mut params: QueryParams = writer
                    .params()
                    .iter()
                    .filter(|(_, value)| !value.is_empty())
                    .map(|(key, value)| (key.as_str(), value.as_str()))
                    .collect();
                if let Some(id) = writer.id() {
                    if template_placeholders(template).iter().any(|name| name == "id") {
                        params.insert("id", id);
                    }
                }
                Ok(params)
            }
        }
    }

    fn body(&self) -> Option<WriteDocument> {
        match self {
            Self::Read(_) | Self::ReadList(_) => None,
            Self::Write(writer) => Some(writer.as_write_document()),
        }
    }
}

/// The outcome of compiling a request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompiledRequest {
    /// The `{PREFIX}_{TYPE}_RESOURCE` tag.
    pub action_type: String,
    /// The HTTP method to use.
    pub http_method: HttpMethod,
    /// The resolved URL, prefixed with the API endpoint when configured.
    pub url: String,
    /// Every parameter handed to the URL resolver.
    pub query: QueryParams,
    /// The write document, `None` for reads.
    pub body: Option<WriteDocument>,
    /// Descriptor meta merged with request meta.
    pub meta: Value,
    /// Extra headers for the transport.
    pub headers: IndexMap<String, String>,
    /// Cached data older than this must be refetched.
    pub fresher_than: Option<DateTime<Utc>>,
}

/// The dispatchable action describing a compiled request.
///
/// ```json
/// { "type": "CREATE_CONVERSATION_RESOURCE", "meta": {}, "url": "…",
///   "method": "POST", "params": {}, "data": { … }, "included": [ … ] }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequestAction {
    /// The action-type tag.
    #[serde(rename = "type")]
    pub action_type: String,
    /// Request meta.
    pub meta: Value,
    /// The resolved URL.
    pub url: String,
    /// The HTTP method.
    pub method: HttpMethod,
    /// The parameters the URL was resolved with.
    pub params: QueryParams,
    /// The primary write document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResourceDocument>,
    /// The sideposted documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceDocument>>,
    /// Freshness watermark of a read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fresher_than: Option<DateTime<Utc>>,
}

impl From<CompiledRequest> for RequestAction {
    fn from(request: CompiledRequest) -> Self {
        let (data, included) = match request.body {
            Some(document) => (Some(document.data), Some(document.included)),
            None => (None, None),
        };
        Self {
            action_type: request.action_type,
            meta: request.meta,
            url: request.url,
            method: request.http_method,
            params: request.query,
            data,
            included,
            fresher_than: request.fresher_than,
        }
    }
}

/// Builder compiling a resource descriptor into a request.
///
/// # Example
///
/// ```rust
/// use jsonapi_orchestrator::request::{RequestBuilder, Resource};
/// use jsonapi_orchestrator::resource::ResourceReader;
/// use jsonapi_orchestrator::HttpMethod;
///
/// let mut reader = ResourceReader::new("conversation");
/// reader.param("id", "cafebabe");
///
/// let request = RequestBuilder::new()
///     .resource(Resource::Read(reader))
///     .path("/conversations/:id")
///     .param("otherURIParam", "deadbeef")
///     .compile()
///     .unwrap();
///
/// assert_eq!(request.http_method, HttpMethod::Get);
/// assert_eq!(request.url, "/conversations/cafebabe?otherURIParam=deadbeef");
/// assert_eq!(request.action_type, "READ_CONVERSATION_RESOURCE");
/// ```
#[derive(Debug)]
pub struct RequestBuilder {
    resource: Option<Resource>,
    method: Option<HttpMethod>,
    path: String,
    params: IndexMap<String, String>,
    api: Option<ApiConfig>,
    meta: Value,
    headers: IndexMap<String, String>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            resource: None,
            method: None,
            path: String::new(),
            params: IndexMap::new(),
            api: None,
            meta: Value::Object(Map::new()),
            headers: IndexMap::new(),
        }
    }
}

impl RequestBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the resource descriptor (required).
    #[must_use]
    pub fn resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Overrides the inferred HTTP method.
    #[must_use]
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the path template with `:name` placeholders (required).
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Adds a request param. Params contributed by the descriptor win on
    /// collision.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Prefixes the resolved URL with this API's endpoint.
    #[must_use]
    pub fn api(mut self, api: ApiConfig) -> Self {
        self.api = Some(api);
        self
    }

    /// Deep-merges request meta over the descriptor's meta.
    #[must_use]
    pub fn add_meta(mut self, meta: Value) -> Self {
        deep_merge(&mut self.meta, meta);
        self
    }

    /// Adds an extra header for the transport.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Returns the resource descriptor, if set.
    #[must_use]
    pub const fn resource_ref(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    /// Returns the path template.
    #[must_use]
    pub fn path_template(&self) -> &str {
        &self.path
    }

    /// Returns the request meta.
    #[must_use]
    pub const fn meta(&self) -> &Value {
        &self.meta
    }

    /// Returns the request params.
    #[must_use]
    pub const fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    /// Checks that resource and path are set and resolves the method.
    ///
    /// Every [`Resource`] variant infers a method, so an explicit one is
    /// only needed to override it.
    ///
    /// # Errors
    ///
    /// Returns the [`IncompleteRequestError`] naming the first missing piece.
    pub fn ensure_ready(&self) -> Result<(&Resource, HttpMethod), IncompleteRequestError> {
        let resource = self
            .resource
            .as_ref()
            .ok_or(IncompleteRequestError::MissingResource)?;
        if self.path.trim().is_empty() {
            return Err(IncompleteRequestError::MissingPath);
        }
        let method = self
            .method
            .unwrap_or_else(|| resource.inferred_method());
        Ok((resource, method))
    }

    /// Compiles the request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Incomplete`] when resource, path or method is
    /// missing, [`RequestError::Query`] for a malformed read query, and
    /// [`RequestError::ActionType`] when the resource type is empty.
    pub fn compile(&self) -> Result<CompiledRequest, RequestError> {
        let (resource, http_method) = self.ensure_ready()?;

        let action_type =
            request_action_type(resource.action_prefix().as_str(), resource.jsonapi_type())?;

        let mut query = resource.descriptor_params(&self.path)?;
        for (key, value) in &self.params {
            if value.is_empty() {
                continue;
            }
            if !query.insert_if_absent(key.as_str(), value.as_str()) {
                tracing::debug!(
                    "Request param '{}' is shadowed by the {} descriptor",
                    key,
                    resource.jsonapi_type()
                );
            }
        }

        let resolved = resolve_url(&self.path, &query);
        let url = match &self.api {
            Some(api) => api.build_endpoint(&resolved),
            None => resolved,
        };

        let mut meta = resource.meta().clone();
        deep_merge(&mut meta, self.meta.clone());

        tracing::debug!("Compiled {} {} ({})", http_method, url, action_type);

        Ok(CompiledRequest {
            action_type,
            http_method,
            url,
            query,
            body: resource.body(),
            meta,
            headers: self.headers.clone(),
            fresher_than: resource.fresher_than(),
        })
    }

    /// Compiles the request into its dispatchable action.
    ///
    /// # Errors
    ///
    /// Same as [`RequestBuilder::compile`].
    pub fn action(&self) -> Result<RequestAction, RequestError> {
        self.compile().map(RequestAction::from)
    }
}

// Verify request types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource>();
    assert_send_sync::<RequestBuilder>();
    assert_send_sync::<CompiledRequest>();
    assert_send_sync::<RequestAction>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiUrl;
    use serde_json::json;

    fn conversation_reader() -> ResourceReader {
        let mut reader = ResourceReader::new("conversation");
        reader.param("id", "cafebabe");
        reader
    }

    #[test]
    fn test_missing_resource() {
        let result = RequestBuilder::new().path("/conversations").compile();
        assert_eq!(
            result,
            Err(RequestError::Incomplete(IncompleteRequestError::MissingResource))
        );
    }

    #[test]
    fn test_missing_path() {
        let result = RequestBuilder::new()
            .resource(Resource::Read(conversation_reader()))
            .compile();
        assert_eq!(
            result,
            Err(RequestError::Incomplete(IncompleteRequestError::MissingPath))
        );
    }

    #[test]
    fn test_read_action_with_explicit_method() {
        let action = RequestBuilder::new()
            .resource(Resource::Read(conversation_reader()))
            .method(HttpMethod::Options)
            .path("/conversations")
            .action()
            .unwrap();

        assert_eq!(action.action_type, "READ_CONVERSATION_RESOURCE");
        assert_eq!(action.method, HttpMethod::Options);
        assert_eq!(action.meta, json!({}));
        assert_eq!(action.url, "/conversations?id=cafebabe");
        assert!(action.data.is_none());
    }

    #[test]
    fn test_read_list_tag_and_query() {
        let mut reader = ResourceReader::new("conversation");
        reader
            .sideload(json!({ "messages": true }))
            .sort(json!({ "updatedAt": "desc" }))
            .page("size", 10);

        let request = RequestBuilder::new()
            .resource(Resource::ReadList(reader))
            .path("/conversations")
            .compile()
            .unwrap();

        assert_eq!(request.action_type, "READ_LIST_CONVERSATION_RESOURCE");
        assert_eq!(
            request.url,
            "/conversations?sort=-updatedAt&include=messages&page[size]=10"
        );
    }

    #[test]
    fn test_descriptor_params_win_over_request_params() {
        let mut reader = ResourceReader::new("employee");
        reader.sort(json!({ "name": "asc" }));

        let request = RequestBuilder::new()
            .resource(Resource::Read(reader))
            .path("/employees")
            .param("sort", "hacked")
            .param("locale", "fr")
            .compile()
            .unwrap();

        assert_eq!(request.url, "/employees?sort=name&locale=fr");
    }

    #[test]
    fn test_api_prefix() {
        let api = ApiConfig::new(ApiUrl::new("https://www.example.com/api/v1/").unwrap());
        let request = RequestBuilder::new()
            .resource(Resource::Read(conversation_reader()))
            .path("/conversations/:id")
            .api(api)
            .compile()
            .unwrap();

        assert_eq!(request.url, "https://www.example.com/api/v1/conversations/cafebabe");
    }

    #[test]
    fn test_create_write() {
        let mut writer = ResourceWriter::new("conversation");
        writer.add_attributes(json!({ "subject": "Hi" }));

        let request = RequestBuilder::new()
            .resource(Resource::Write(writer))
            .path("/conversations")
            .compile()
            .unwrap();

        assert_eq!(request.http_method, HttpMethod::Post);
        assert_eq!(request.action_type, "CREATE_CONVERSATION_RESOURCE");
        let body = request.body.unwrap();
        assert_eq!(body.data.attributes, json!({ "subject": "Hi" }));
        assert!(body.data.identifier.temp_id().is_some());
    }

    #[test]
    fn test_update_write_substitutes_persisted_id() {
        let writer = ResourceWriter::persisted("conversation", "cafebabe");

        let request = RequestBuilder::new()
            .resource(Resource::Write(writer))
            .path("/conversations/:id")
            .compile()
            .unwrap();

        assert_eq!(request.http_method, HttpMethod::Patch);
        assert_eq!(request.action_type, "UPDATE_CONVERSATION_RESOURCE");
        assert_eq!(request.url, "/conversations/cafebabe");
    }

    #[test]
    fn test_write_id_not_added_without_placeholder() {
        let writer = ResourceWriter::persisted("conversation", "cafebabe");

        let request = RequestBuilder::new()
            .resource(Resource::Write(writer))
            .path("/conversations")
            .compile()
            .unwrap();

        assert_eq!(request.url, "/conversations");
    }

    #[test]
    fn test_meta_merges_descriptor_and_request() {
        let mut reader = conversation_reader();
        reader.add_meta(json!({ "invitationToken": "42" }));

        let request = RequestBuilder::new()
            .resource(Resource::Read(reader))
            .path("/conversations")
            .add_meta(json!({ "token": "deadbeef" }))
            .compile()
            .unwrap();

        assert_eq!(
            request.meta,
            json!({ "invitationToken": "42", "token": "deadbeef" })
        );
    }

    #[test]
    fn test_malformed_query_fails_compilation() {
        let mut reader = ResourceReader::new("conversation");
        reader.sort(json!({ "name": "up" }));

        let result = RequestBuilder::new()
            .resource(Resource::ReadList(reader))
            .path("/conversations")
            .compile();

        assert!(matches!(result, Err(RequestError::Query(_))));
    }

    #[test]
    fn test_empty_type_fails_action_tag() {
        let result = RequestBuilder::new()
            .resource(Resource::Read(ResourceReader::new("")))
            .path("/things")
            .compile();

        assert!(matches!(result, Err(RequestError::ActionType(_))));
    }

    #[test]
    fn test_action_serialization() {
        let mut writer = ResourceWriter::new("conversation");
        writer.sidepost("messages", vec![ResourceWriter::new("message")]);

        let action = RequestBuilder::new()
            .resource(Resource::Write(writer))
            .path("/conversations")
            .header("X-Locale", "fr")
            .action()
            .unwrap();

        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], json!("CREATE_CONVERSATION_RESOURCE"));
        assert_eq!(value["method"], json!("POST"));
        assert_eq!(value["included"].as_array().unwrap().len(), 1);
        assert!(value.get("fresher_than").is_none());
    }
}
