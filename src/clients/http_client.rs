//! Async HTTP client executing compiled requests.

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpRequest, JSONAPI_MEDIA_TYPE};
use crate::clients::http_response::HttpResponse;
use crate::request::CompiledRequest;

/// Library version used in the User-Agent header.
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Thin transport for compiled JSON:API requests.
///
/// Sends the method, URL and document of a [`CompiledRequest`] with the
/// JSON:API media type, and checks the status. There are no retries and
/// the body is returned as received.
///
/// # Example
///
/// ```rust,ignore
/// use jsonapi_orchestrator::clients::HttpClient;
///
/// let client = HttpClient::new()?;
/// let response = client.request(&compiled).await?;
/// println!("{}", response.body);
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client backed by a rustls `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, HttpError> {
        let client = reqwest::Client::builder().use_rustls_tls().build()?;
        Ok(Self::with_client(client))
    }

    /// Creates a client around an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert(
            "User-Agent".to_string(),
            format!("jsonapi-orchestrator v{LIBRARY_VERSION}"),
        );
        default_headers.insert("Accept".to_string(), JSONAPI_MEDIA_TYPE.to_string());
        default_headers.insert("Content-Type".to_string(), JSONAPI_MEDIA_TYPE.to_string());

        Self {
            client,
            default_headers,
        }
    }

    /// Returns the headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends a compiled request.
    ///
    /// # Errors
    ///
    /// - [`HttpError::Request`] if the request is invalid (relative URL,
    ///   missing document)
    /// - [`HttpError::Network`] on connection failures
    /// - [`HttpError::Response`] when the status is outside `200..400`
    pub async fn request(&self, compiled: &CompiledRequest) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::from_compiled(compiled)?;
        self.send(request).await
    }

    /// Sends a transport-level request.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::request`].
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let mut headers = self.default_headers.clone();
        for (key, value) in &request.extra_headers {
            headers.insert(key.clone(), value.clone());
        }

        let mut req_builder = self
            .client
            .request(request.http_method.into(), &request.url);
        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        tracing::debug!("Sending {} {}", request.http_method, request.url);

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        let body = if body_text.is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&body_text)
                .unwrap_or_else(|_| serde_json::json!({ "raw_body": body_text }))
        };

        let response = HttpResponse::new(code, res_headers, body);

        if response.is_ok() {
            return Ok(response);
        }

        tracing::warn!(
            "{} {} failed with status {}",
            request.http_method,
            request.url,
            code
        );

        Err(HttpError::Response(HttpResponseError {
            code,
            message: Self::serialize_error(&response),
            error_reference: response.request_id().map(String::from),
        }))
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    fn serialize_error(response: &HttpResponse) -> String {
        let mut error_body = serde_json::Map::new();

        if let Some(errors) = response.body.get("errors") {
            error_body.insert("errors".to_string(), errors.clone());
        }

        if let Some(request_id) = response.request_id() {
            error_body.insert(
                "error_reference".to_string(),
                serde_json::json!(format!(
                    "If you report this error, please include this id: {request_id}."
                )),
            );
        }

        serde_json::to_string(&error_body).unwrap_or_else(|_| "{}".to_string())
    }
}
