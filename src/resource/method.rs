//! Persistence verbs carried by write relationships.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the server should persist a resource or relationship.
///
/// The verb is written as the `method` field of every relationship entry,
/// following the JSON:API sideposting draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Create a new resource, identified by its temp-id.
    Create,
    /// Update an already persisted resource.
    Update,
    /// Link an already persisted resource.
    Associate,
    /// Unlink an already persisted resource without deleting it.
    Disassociate,
}

impl Method {
    /// Returns the wire name of the verb.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Associate => "associate",
            Self::Disassociate => "disassociate",
        }
    }

    /// Returns `true` if resources under this verb are keyed by temp-id.
    #[must_use]
    pub const fn uses_temp_id(&self) -> bool {
        matches!(self, Self::Create)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_wire_names() {
        assert_eq!(Method::Create.to_string(), "create");
        assert_eq!(Method::Update.to_string(), "update");
        assert_eq!(Method::Associate.to_string(), "associate");
        assert_eq!(Method::Disassociate.to_string(), "disassociate");
    }

    #[test]
    fn test_method_serializes_lowercase() {
        let json = serde_json::to_string(&Method::Disassociate).unwrap();
        assert_eq!(json, r#""disassociate""#);
    }

    #[test]
    fn test_only_create_uses_temp_id() {
        assert!(Method::Create.uses_temp_id());
        assert!(!Method::Update.uses_temp_id());
        assert!(!Method::Associate.uses_temp_id());
        assert!(!Method::Disassociate.uses_temp_id());
    }
}
