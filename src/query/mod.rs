//! Read-query flattening and compilation.
//!
//! JSON:API reads are parameterised through the URL:
//!
//! - `include=avatar,profiles.user` from a nested sideload tree
//! - `sort=-educations.school.name,company_name` from ordered sort trees
//! - `filter[company][name]=air%20france,axa` from a nested filter tree
//! - `page[size]=12&page[number]=3` from a flat pagination mapping
//!
//! [`flatten_includes`], [`flatten_filters`] and [`flatten_sortings`] turn
//! the declarative trees into those tokens, and [`QuerySpec::compile`]
//! assembles them into one ordered [`QueryParams`] map.

mod compiler;
mod errors;
mod flatten;
mod merge;
mod params;

pub use compiler::QuerySpec;
pub use errors::QueryError;
pub use flatten::{flatten_filters, flatten_includes, flatten_sortings, SortDirection};
pub use merge::{deep_merge, merge_filters, merge_sideloads};
pub use params::{encode_joined, encode_key, QueryParams, QueryValue};
