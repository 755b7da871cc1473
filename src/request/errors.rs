//! Error types for request compilation.
//!
//! Compilation never produces a partial artifact: it either returns the
//! complete request or one of the errors below.

use thiserror::Error;

use crate::query::QueryError;

/// A piece required to compile a request was not supplied.
///
/// # Example
///
/// ```rust
/// use jsonapi_orchestrator::request::IncompleteRequestError;
///
/// let error = IncompleteRequestError::MissingPath;
/// assert!(error.to_string().contains("path"));
/// ```
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IncompleteRequestError {
    /// No resource descriptor was supplied.
    #[error("A resource descriptor is required. Set one with RequestBuilder::resource().")]
    MissingResource,

    /// The path template is empty.
    #[error("A path template is required, e.g. '/conversations/:id'.")]
    MissingPath,

    /// The HTTP method could not be inferred and none was supplied.
    #[error("The HTTP method cannot be inferred. Set one with RequestBuilder::method().")]
    MissingMethod,
}

/// An input of the action-type tag is missing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MissingActionTypeInputError {
    /// The verb prefix (`READ`, `CREATE`, ...) is empty.
    #[error("The action type prefix (READ, READ_LIST, CREATE, UPDATE) must not be empty.")]
    MissingTypePrefix,

    /// The JSON:API type of the resource is empty.
    #[error("The JSON:API type of the resource must not be empty.")]
    MissingJsonapiType,
}

/// Unified error type for request compilation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// A required piece of the request is missing.
    #[error(transparent)]
    Incomplete(#[from] IncompleteRequestError),

    /// The action-type tag could not be built.
    #[error(transparent)]
    ActionType(#[from] MissingActionTypeInputError),

    /// The read query is malformed.
    #[error(transparent)]
    Query(#[from] QueryError),
}
