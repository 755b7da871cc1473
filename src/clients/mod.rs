//! Thin HTTP transport for compiled requests.
//!
//! The compiler stops at a [`CompiledRequest`](crate::request::CompiledRequest);
//! this module sends it:
//!
//! - [`HttpClient`]: the async client
//! - [`HttpRequest`]: the transport-level request
//! - [`HttpResponse`]: the raw response
//! - [`HttpMethod`]: supported HTTP methods
//!
//! Statuses in `200..400` succeed, anything else is an
//! [`HttpError::Response`]. Requests are never retried.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, LIBRARY_VERSION};
pub use http_request::{HttpMethod, HttpRequest, JSONAPI_MEDIA_TYPE};
pub use http_response::HttpResponse;
