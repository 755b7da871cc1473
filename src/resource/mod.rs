//! Resource descriptors for reads and writes.
//!
//! - [`ResourceReader`] describes what to fetch: sideloads, filters, sorts,
//!   pagination and the freshness watermark of cached data.
//! - [`ResourceWriter`] is one node of a write graph. Its relationships
//!   carry a [`Method`] and serialize into a sideposting document.

mod document;
mod method;
mod reader;
mod writer;

pub use document::{
    Identifier, RelationshipData, RelationshipDocument, RelationshipEntry, ResourceDocument,
    WriteDocument,
};
pub use method::Method;
pub use reader::ResourceReader;
pub use writer::{Edge, Related, Relationship, ResourceWriter};
