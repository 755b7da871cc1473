//! Deep-merge rules for successive `sideload` and `filter` calls.
//!
//! The two trees merge differently:
//!
//! - Sideloads union without loss. Mappings merge key by key; when a
//!   `true` leaf meets a mapping at the same path the mapping is kept,
//!   since including `a.b.c` already includes `a.b`.
//! - Filters merge mappings recursively, but a colliding leaf is replaced
//!   by the newer one. Lists are not unioned: the last write wins.
//!
//! [`deep_merge`] is the plain recursive merge also used for attributes
//! and meta.

use serde_json::Value;

/// Merges `source` into the sideload tree `target`.
pub fn merge_sideloads(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) => merge_sideloads(slot, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (Value::Object(_), Value::Bool(true)) => {}
        (slot, incoming) => *slot = incoming,
    }
}

/// Merges `source` into the filter tree `target`.
pub fn merge_filters(target: &mut Value, source: Value) {
    deep_merge(target, source);
}

/// Recursively merges mappings; any other colliding value is replaced.
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (slot, incoming) => *slot = incoming,
    }
}
