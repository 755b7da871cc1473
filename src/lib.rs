//! # JSON:API orchestrator
//!
//! Compiles declarative resource descriptions into JSON:API requests.
//!
//! ## Overview
//!
//! - Read descriptors ([`ResourceReader`]) with nested sideloads, filters,
//!   ordered sorts, pagination and a freshness watermark, compiled into
//!   `include`, `filter[...]`, `sort` and `page[...]` parameters
//! - Write graphs ([`ResourceWriter`]) whose relationships carry a
//!   persistence verb (`create`, `update`, `associate`, `disassociate`),
//!   serialized into a sideposting `{ data, included }` document with
//!   client-minted temp-ids
//! - URL templates with `:name` placeholders resolved against the
//!   remaining parameters
//! - A request compiler ([`RequestBuilder`]) producing the URL, HTTP method,
//!   document and the action-type tag used by external dispatch
//! - Explicit API configuration via [`ApiConfig`] and a thin async transport
//!   in [`clients`]
//!
//! ## Reading
//!
//! ```rust
//! use jsonapi_orchestrator::{ApiConfig, ApiUrl, RequestBuilder, Resource, ResourceReader};
//! use serde_json::json;
//!
//! let api = ApiConfig::new(ApiUrl::new("https://www.example.com/api/v1").unwrap());
//!
//! let mut reader = ResourceReader::new("employee");
//! reader
//!     .sideload(json!({ "user": true, "educations": { "school": true } }))
//!     .filter(json!({ "company": { "name": ["air france", "axa"] } }))
//!     .sort(json!({ "lastName": "desc" }))
//!     .page("size", 12);
//!
//! let request = RequestBuilder::new()
//!     .resource(Resource::ReadList(reader))
//!     .path("/employees")
//!     .api(api)
//!     .compile()
//!     .unwrap();
//!
//! assert_eq!(request.action_type, "READ_LIST_EMPLOYEE_RESOURCE");
//! assert_eq!(
//!     request.url,
//!     "https://www.example.com/api/v1/employees?sort=-lastName&include=user,educations.school\
//!      &page[size]=12&filter[company][name]=air%20france,axa"
//! );
//! ```
//!
//! ## Writing
//!
//! ```rust
//! use jsonapi_orchestrator::{RequestBuilder, Resource, ResourceWriter, HttpMethod};
//! use serde_json::json;
//!
//! let mut message = ResourceWriter::new("message");
//! message.add_attributes(json!({ "text": "Hello World!" }));
//!
//! let mut conversation = ResourceWriter::new("conversation");
//! conversation
//!     .add_attributes(json!({ "subject": "Greetings" }))
//!     .sidepost("messages", vec![message])
//!     .associate("initiator", ResourceWriter::persisted("user", "42"));
//!
//! let request = RequestBuilder::new()
//!     .resource(Resource::Write(conversation))
//!     .path("/conversations")
//!     .compile()
//!     .unwrap();
//!
//! assert_eq!(request.http_method, HttpMethod::Post);
//! let document = request.body.unwrap();
//! assert_eq!(document.included.len(), 1);
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (request compilation, relationship
//! collisions, failing responses). It never installs a subscriber.

pub mod clients;
pub mod config;
pub mod error;
pub mod query;
pub mod request;
pub mod resource;

// Re-export public types at crate root for convenience
pub use config::{ApiConfig, ApiConfigBuilder, ApiUrl};
pub use error::ConfigError;

pub use query::{QueryError, QueryParams, QuerySpec, QueryValue};
pub use request::{
    CompiledRequest, IncompleteRequestError, MissingActionTypeInputError, RequestAction,
    RequestBuilder, RequestError, Resource,
};
pub use resource::{Method, Related, ResourceReader, ResourceWriter, WriteDocument};

// Re-export HTTP client types
pub use clients::{HttpClient, HttpError, HttpMethod, HttpResponse};
