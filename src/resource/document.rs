//! JSON:API wire documents produced by the write serializer.
//!
//! ```json
//! {
//!   "data": {
//!     "type": "conversation",
//!     "temp-id": "…",
//!     "attributes": { "subject": "Hi" },
//!     "relationships": {
//!       "messages": { "data": [{ "type": "message", "temp-id": "…", "method": "create" }] }
//!     },
//!     "meta": {}
//!   },
//!   "included": [
//!     { "type": "message", "temp-id": "…", "attributes": {}, "relationships": {}, "meta": {} }
//!   ]
//! }
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::method::Method;

/// How a resource is identified on the wire: exactly one of `id` or `temp-id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Identifier {
    /// Persisted identifier. `None` serializes as `"id": null`.
    #[serde(rename = "id")]
    Id(Option<String>),
    /// Client-minted temporary identifier.
    #[serde(rename = "temp-id")]
    TempId(String),
}

impl Identifier {
    /// Returns the persisted id, if this is an `id` identifier.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => id.as_deref(),
            Self::TempId(_) => None,
        }
    }

    /// Returns the temp-id, if this is a `temp-id` identifier.
    #[must_use]
    pub fn temp_id(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::TempId(temp_id) => Some(temp_id),
        }
    }
}

/// A full resource object, used under `data` and in `included`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceDocument {
    /// The JSON:API type.
    #[serde(rename = "type")]
    pub jsonapi_type: String,
    /// The `id` or `temp-id` entry.
    #[serde(flatten)]
    pub identifier: Identifier,
    /// Attributes to persist.
    pub attributes: Value,
    /// Relationship name to linkage.
    pub relationships: IndexMap<String, RelationshipDocument>,
    /// Resource-level meta.
    pub meta: Value,
}

/// The `{ "data": … }` wrapper of one relationship.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RelationshipDocument {
    /// To-one or to-many linkage.
    pub data: RelationshipData,
}

/// Linkage of a relationship, a single entry or an ordered list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RelationshipData {
    /// To-one relationship.
    One(RelationshipEntry),
    /// To-many relationship, in attachment order.
    Many(Vec<RelationshipEntry>),
}

impl RelationshipData {
    /// Returns the entries as a slice regardless of cardinality.
    #[must_use]
    pub fn entries(&self) -> &[RelationshipEntry] {
        match self {
            Self::One(entry) => std::slice::from_ref(entry),
            Self::Many(entries) => entries,
        }
    }
}

/// Compact `{ type, id|temp-id, method }` linkage entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RelationshipEntry {
    /// The JSON:API type of the target.
    #[serde(rename = "type")]
    pub jsonapi_type: String,
    /// The `id` or `temp-id` of the target.
    #[serde(flatten)]
    pub identifier: Identifier,
    /// The persistence verb of this edge.
    pub method: Method,
}

/// The complete write payload: primary resource plus sideposted resources.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WriteDocument {
    /// The primary resource.
    pub data: ResourceDocument,
    /// Every sideposted resource, each exactly once.
    pub included: Vec<ResourceDocument>,
}
