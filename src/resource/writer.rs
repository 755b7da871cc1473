//! Write graphs and their serialization into `{ data, included }`.
//!
//! A [`ResourceWriter`] is one node of the graph. Related nodes are
//! attached under a relationship name with a persistence verb:
//!
//! - [`sidepost`](ResourceWriter::sidepost) creates the related resource in
//!   the same request; it is embedded in `included`.
//! - [`associate`](ResourceWriter::associate) and
//!   [`disassociate`](ResourceWriter::disassociate) link or unlink an
//!   already persisted resource; it is only referenced.
//!
//! The verb belongs to the edge, not to the related node, so one node can
//! be linked from several parents under different verbs. Nodes are held
//! through [`Arc`]: attach the same `Arc` twice and the node is emitted
//! once in `included`, referenced by the same temp-id from every edge.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_orchestrator::resource::ResourceWriter;
//! use serde_json::json;
//!
//! let mut first = ResourceWriter::new("message");
//! first.add_attributes(json!({ "text": "Hello World!" }));
//! let mut second = ResourceWriter::new("message");
//! second.add_attributes(json!({ "text": "Magic World!" }));
//!
//! let mut conversation = ResourceWriter::new("conversation");
//! conversation.sidepost("messages", vec![first, second]);
//!
//! let document = conversation.as_write_document();
//! assert_eq!(document.included.len(), 2);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::document::{
    Identifier, RelationshipData, RelationshipDocument, RelationshipEntry, ResourceDocument,
    WriteDocument,
};
use super::method::Method;
use crate::clients::HttpMethod;
use crate::query::deep_merge;

/// One or many nodes handed to a relationship call.
///
/// Built through `From` from a node, an `Arc` of a node, or a `Vec` of
/// either. A `Vec` attaches a to-many relationship.
#[derive(Debug)]
pub enum Related {
    /// To-one target.
    One(Arc<ResourceWriter>),
    /// To-many targets, in attachment order.
    Many(Vec<Arc<ResourceWriter>>),
}

impl From<ResourceWriter> for Related {
    fn from(node: ResourceWriter) -> Self {
        Self::One(Arc::new(node))
    }
}

impl From<Arc<ResourceWriter>> for Related {
    fn from(node: Arc<ResourceWriter>) -> Self {
        Self::One(node)
    }
}

impl From<Vec<ResourceWriter>> for Related {
    fn from(nodes: Vec<ResourceWriter>) -> Self {
        Self::Many(nodes.into_iter().map(Arc::new).collect())
    }
}

impl From<Vec<Arc<ResourceWriter>>> for Related {
    fn from(nodes: Vec<Arc<ResourceWriter>>) -> Self {
        Self::Many(nodes)
    }
}

/// A related node together with the verb of the edge pointing to it.
#[derive(Clone, Debug)]
pub struct Edge {
    node: Arc<ResourceWriter>,
    method: Method,
}

impl Edge {
    /// Returns the related node.
    #[must_use]
    pub const fn node(&self) -> &Arc<ResourceWriter> {
        &self.node
    }

    /// Returns the verb of this edge.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    fn entry(&self) -> RelationshipEntry {
        RelationshipEntry {
            jsonapi_type: self.node.jsonapi_type.clone(),
            identifier: self.node.identifier_for(self.method),
            method: self.method,
        }
    }
}

/// All edges attached under one relationship name.
#[derive(Clone, Debug)]
pub struct Relationship {
    to_many: bool,
    edges: Vec<Edge>,
}

impl Relationship {
    /// Returns `true` for a to-many relationship.
    #[must_use]
    pub const fn is_to_many(&self) -> bool {
        self.to_many
    }

    /// Returns the edges in attachment order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn document(&self) -> RelationshipDocument {
        let data = match (self.to_many, self.edges.as_slice()) {
            (false, [edge]) => RelationshipData::One(edge.entry()),
            _ => RelationshipData::Many(self.edges.iter().map(Edge::entry).collect()),
        };
        RelationshipDocument { data }
    }
}

/// A node of a write graph.
///
/// Every node mints a temp-id when constructed. It is emitted instead of
/// `id` whenever the node is written with [`Method::Create`].
#[derive(Debug)]
pub struct ResourceWriter {
    jsonapi_type: String,
    id: Option<String>,
    temp_id: String,
    method: Option<Method>,
    attributes: Value,
    data_meta: Value,
    meta: Value,
    params: IndexMap<String, String>,
    sideposts: IndexMap<String, Relationship>,
    associations: IndexMap<String, Relationship>,
    disassociations: IndexMap<String, Relationship>,
}

impl ResourceWriter {
    /// Creates a node that does not exist server-side yet.
    #[must_use]
    pub fn new(jsonapi_type: impl Into<String>) -> Self {
        Self {
            jsonapi_type: jsonapi_type.into(),
            id: None,
            temp_id: Uuid::new_v4().to_string(),
            method: None,
            attributes: Value::Object(Map::new()),
            data_meta: Value::Object(Map::new()),
            meta: Value::Object(Map::new()),
            params: IndexMap::new(),
            sideposts: IndexMap::new(),
            associations: IndexMap::new(),
            disassociations: IndexMap::new(),
        }
    }

    /// Creates a node for an already persisted resource.
    #[must_use]
    pub fn persisted(jsonapi_type: impl Into<String>, id: impl Into<String>) -> Self {
        let mut node = Self::new(jsonapi_type);
        node.id = Some(id.into());
        node
    }

    /// Returns the JSON:API type.
    #[must_use]
    pub fn jsonapi_type(&self) -> &str {
        &self.jsonapi_type
    }

    /// Returns the persisted id, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the temp-id minted at construction.
    #[must_use]
    pub fn temp_id(&self) -> &str {
        &self.temp_id
    }

    /// Returns the explicit method, if one was set.
    #[must_use]
    pub const fn method(&self) -> Option<Method> {
        self.method
    }

    /// Returns the attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Value {
        &self.attributes
    }

    /// Returns the request meta.
    #[must_use]
    pub const fn meta(&self) -> &Value {
        &self.meta
    }

    /// Returns the ambient URL params.
    #[must_use]
    pub const fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    /// Returns the sidepost relationships.
    #[must_use]
    pub const fn sideposts(&self) -> &IndexMap<String, Relationship> {
        &self.sideposts
    }

    /// Returns the association relationships.
    #[must_use]
    pub const fn associations(&self) -> &IndexMap<String, Relationship> {
        &self.associations
    }

    /// Returns the disassociation relationships.
    #[must_use]
    pub const fn disassociations(&self) -> &IndexMap<String, Relationship> {
        &self.disassociations
    }

    /// Sets the persisted id.
    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = Some(id.into());
        self
    }

    /// Forces the method of this node when it is the primary resource.
    pub fn set_method(&mut self, method: Method) -> &mut Self {
        self.method = Some(method);
        self
    }

    /// Deep-merges attributes into the existing ones.
    pub fn add_attributes(&mut self, attributes: Value) -> &mut Self {
        deep_merge(&mut self.attributes, attributes);
        self
    }

    /// Sets the meta object written under this resource.
    pub fn set_data_meta(&mut self, data_meta: Value) -> &mut Self {
        self.data_meta = data_meta;
        self
    }

    /// Deep-merges request meta handed back to the dispatcher.
    pub fn add_meta(&mut self, meta: Value) -> &mut Self {
        deep_merge(&mut self.meta, meta);
        self
    }

    /// Adds an ambient URL param.
    pub fn param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Creates `related` alongside this resource.
    ///
    /// A list appends to an existing list under the same name; a single
    /// node replaces whatever was attached.
    pub fn sidepost(&mut self, name: impl Into<String>, related: impl Into<Related>) -> &mut Self {
        self.sidepost_with_method(name, related, Method::Create)
    }

    /// Sideposts `related` under an explicit verb, e.g. [`Method::Update`]
    /// to persist changes to an existing resource in the same request.
    pub fn sidepost_with_method(
        &mut self,
        name: impl Into<String>,
        related: impl Into<Related>,
        method: Method,
    ) -> &mut Self {
        attach(&mut self.sideposts, name.into(), related.into(), method);
        self
    }

    /// Links already persisted `related` resources.
    pub fn associate(&mut self, name: impl Into<String>, related: impl Into<Related>) -> &mut Self {
        attach(&mut self.associations, name.into(), related.into(), Method::Associate);
        self
    }

    /// Unlinks already persisted `related` resources.
    pub fn disassociate(&mut self, name: impl Into<String>, related: impl Into<Related>) -> &mut Self {
        attach(
            &mut self.disassociations,
            name.into(),
            related.into(),
            Method::Disassociate,
        );
        self
    }

    /// The explicit method, else `create` without an id and `update` with one.
    #[must_use]
    pub const fn effective_method(&self) -> Method {
        match (self.method, &self.id) {
            (Some(method), _) => method,
            (None, None) => Method::Create,
            (None, Some(_)) => Method::Update,
        }
    }

    /// `POST` when the node is created, `PATCH` otherwise.
    #[must_use]
    pub const fn http_method(&self) -> HttpMethod {
        match self.effective_method() {
            Method::Create => HttpMethod::Post,
            _ => HttpMethod::Patch,
        }
    }

    /// This node as the primary `data` document.
    #[must_use]
    pub fn as_data_document(&self) -> ResourceDocument {
        self.document_as(self.effective_method())
    }

    /// The sideposted resources in depth-first pre-order.
    ///
    /// A node reached several times is emitted once per identity it is
    /// written under (`temp-id` or `id`).
    #[must_use]
    pub fn included_documents(&self) -> Vec<ResourceDocument> {
        let mut visited = HashSet::new();
        visited.insert((
            std::ptr::from_ref(self),
            self.effective_method().uses_temp_id(),
        ));
        let mut included = Vec::new();
        self.collect_included(&mut visited, &mut included);
        included
    }

    /// The complete `{ data, included }` payload.
    #[must_use]
    pub fn as_write_document(&self) -> WriteDocument {
        WriteDocument {
            data: self.as_data_document(),
            included: self.included_documents(),
        }
    }

    fn identifier_for(&self, method: Method) -> Identifier {
        if method.uses_temp_id() {
            return Identifier::TempId(self.temp_id.clone());
        }
        if self.id.is_none() {
            tracing::warn!(
                "{} resource written with method '{}' has no persisted id",
                self.jsonapi_type,
                method
            );
        }
        Identifier::Id(self.id.clone())
    }

    fn document_as(&self, method: Method) -> ResourceDocument {
        ResourceDocument {
            jsonapi_type: self.jsonapi_type.clone(),
            identifier: self.identifier_for(method),
            attributes: self.attributes.clone(),
            relationships: self.relationship_documents(),
            meta: self.data_meta.clone(),
        }
    }

    fn relationship_documents(&self) -> IndexMap<String, RelationshipDocument> {
        let mut relationships = IndexMap::new();
        let all = self
            .sideposts
            .iter()
            .chain(&self.associations)
            .chain(&self.disassociations);
        for (name, relationship) in all {
            if relationships
                .insert(name.clone(), relationship.document())
                .is_some()
            {
                tracing::warn!(
                    "Relationship '{}' of {} is attached under several verbs, the last one wins",
                    name,
                    self.jsonapi_type
                );
            }
        }
        relationships
    }

    fn collect_included(
        &self,
        visited: &mut HashSet<(*const Self, bool)>,
        included: &mut Vec<ResourceDocument>,
    ) {
        for relationship in self.sideposts.values() {
            let fresh: Vec<&Edge> = relationship
                .edges
                .iter()
                .filter(|edge| {
                    visited.insert((Arc::as_ptr(&edge.node), edge.method.uses_temp_id()))
                })
                .collect();
            for edge in &fresh {
                included.push(edge.node.document_as(edge.method));
            }
            for edge in fresh {
                edge.node.collect_included(visited, included);
            }
        }
    }
}

fn attach(
    relationships: &mut IndexMap<String, Relationship>,
    name: String,
    related: Related,
    method: Method,
) {
    let into_edges = |nodes: Vec<Arc<ResourceWriter>>| {
        nodes
            .into_iter()
            .map(|node| Edge { node, method })
            .collect::<Vec<_>>()
    };

    match related {
        Related::Many(nodes) => {
            let edges = into_edges(nodes);
            match relationships.get_mut(&name) {
                Some(existing) if existing.to_many => existing.edges.extend(edges),
                _ => {
                    relationships.insert(
                        name,
                        Relationship {
                            to_many: true,
                            edges,
                        },
                    );
                }
            }
        }
        Related::One(node) => {
            relationships.insert(
                name,
                Relationship {
                    to_many: false,
                    edges: into_edges(vec![node]),
                },
            );
        }
    }
}

// Verify ResourceWriter is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceWriter>();
};
