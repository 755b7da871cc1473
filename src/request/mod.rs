//! Request compilation.
//!
//! [`RequestBuilder`] is the entry point: given a [`Resource`], a path
//! template and optional [`ApiConfig`](crate::ApiConfig), it produces a
//! [`CompiledRequest`] holding the resolved URL, the HTTP method, the
//! write document and the action-type tag used by external dispatch.

mod action;
mod builder;
mod errors;
mod path;

pub use action::{error_action_type, request_action_type, success_action_type, ActionPrefix};
pub use builder::{CompiledRequest, RequestAction, RequestBuilder, Resource};
pub use errors::{IncompleteRequestError, MissingActionTypeInputError, RequestError};
pub use path::{resolve_url, template_placeholders};
