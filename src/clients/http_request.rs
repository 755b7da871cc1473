//! HTTP request types for the transport.
//!
//! An [`HttpRequest`] is the transport-level view of a
//! [`CompiledRequest`]: method, absolute URL, headers and optional body.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clients::errors::InvalidHttpRequestError;
use crate::request::CompiledRequest;

/// Media type of JSON:API documents, used for `Accept` and `Content-Type`.
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

/// HTTP methods a compiled request can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Reads.
    Get,
    /// Creation of the root resource.
    Post,
    /// Full replacement.
    Put,
    /// Update of the root resource.
    Patch,
    /// Deletion.
    Delete,
    /// Capability discovery.
    Options,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        }
    }

    /// Returns `true` for methods that must carry a document.
    #[must_use]
    pub const fn requires_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
            HttpMethod::Options => Self::OPTIONS,
        }
    }
}

/// A request ready to be sent by [`HttpClient`](crate::clients::HttpClient).
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method.
    pub http_method: HttpMethod,
    /// The absolute URL, query string included.
    pub url: String,
    /// The JSON:API document, if any.
    pub body: Option<serde_json::Value>,
    /// Headers added on top of the client defaults.
    pub extra_headers: HashMap<String, String>,
}

impl HttpRequest {
    /// Converts a compiled request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::UnserializableBody`] if the write
    /// document cannot be turned into JSON.
    pub fn from_compiled(compiled: &CompiledRequest) -> Result<Self, InvalidHttpRequestError> {
        let body = compiled
            .body
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| InvalidHttpRequestError::UnserializableBody {
                message: e.to_string(),
            })?;

        Ok(Self {
            http_method: compiled.http_method,
            url: compiled.url.clone(),
            body,
            extra_headers: compiled
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        })
    }

    /// Validates the request before it is sent.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::MissingBody`] when a `POST`, `PUT`
    /// or `PATCH` carries no document, and
    /// [`InvalidHttpRequestError::RelativeUrl`] when the URL has no scheme.
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.http_method.requires_body() && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }
        if !self.url.contains("://") {
            return Err(InvalidHttpRequestError::RelativeUrl {
                url: self.url.clone(),
            });
        }
        Ok(())
    }
}
