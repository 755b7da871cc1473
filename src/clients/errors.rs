//! HTTP-specific error types for the transport.
//!
//! - [`HttpResponseError`]: the server answered outside `200..400`
//! - [`InvalidHttpRequestError`]: the request failed validation before sending
//! - [`HttpError`]: unified error type of [`HttpClient`](crate::clients::HttpClient)
//!
//! # Example
//!
//! ```rust,ignore
//! use jsonapi_orchestrator::clients::HttpError;
//!
//! match client.request(&compiled).await {
//!     Ok(response) => println!("{}", response.body),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::Request(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when the server answers with a failing status.
///
/// `message` holds the JSON:API `errors` member of the body, serialized,
/// plus an `error_reference` when the server sent an `X-Request-Id`.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Serialized error message in JSON format.
    pub message: String,
    /// Reference ID for error reporting (from the X-Request-Id header).
    pub error_reference: Option<String>,
}

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A `POST`, `PUT` or `PATCH` request has no document.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The URL cannot be sent without a base endpoint.
    #[error("Cannot send a request to relative URL '{url}'. Configure an ApiConfig on the request.")]
    RelativeUrl {
        /// The relative URL.
        url: String,
    },

    /// The write document could not be serialized.
    #[error("Cannot serialize the request document: {message}")]
    UnserializableBody {
        /// The serializer error.
        message: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A response with a failing status code.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    Request(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
