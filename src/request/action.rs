//! Action-type tags routing a compiled request through external dispatch.
//!
//! A tag combines a verb prefix with the resource type:
//! `READ_CONVERSATION_RESOURCE`, `CREATE_EMPLOYEE_RESOURCE`, ... The
//! dispatcher answers with the same tag suffixed by `_SUCCESS` or `_ERROR`.

use std::fmt;

use super::errors::MissingActionTypeInputError;

/// Verb prefix of an action-type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionPrefix {
    /// Single read.
    Read,
    /// List read.
    ReadList,
    /// Creation of the root write node.
    Create,
    /// Update of the root write node.
    Update,
}

impl ActionPrefix {
    /// Returns the prefix as it appears in the tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::ReadList => "READ_LIST",
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
        }
    }
}

impl fmt::Display for ActionPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the `{PREFIX}_{TYPE}_RESOURCE` tag, upper-cased.
///
/// # Errors
///
/// Returns [`MissingActionTypeInputError`] when either input is empty.
///
/// # Example
///
/// ```rust
/// use jsonapi_orchestrator::request::request_action_type;
///
/// let tag = request_action_type("read", "conversation").unwrap();
/// assert_eq!(tag, "READ_CONVERSATION_RESOURCE");
/// ```
pub fn request_action_type(
    type_prefix: &str,
    jsonapi_type: &str,
) -> Result<String, MissingActionTypeInputError> {
    if type_prefix.is_empty() {
        return Err(MissingActionTypeInputError::MissingTypePrefix);
    }
    if jsonapi_type.is_empty() {
        return Err(MissingActionTypeInputError::MissingJsonapiType);
    }
    Ok(format!(
        "{}_{}_RESOURCE",
        type_prefix.to_uppercase(),
        jsonapi_type.to_uppercase()
    ))
}

/// Tag dispatched when the request succeeded.
#[must_use]
pub fn success_action_type(action_type: &str) -> String {
    format!("{action_type}_SUCCESS")
}

/// Tag dispatched when the request failed.
#[must_use]
pub fn error_action_type(action_type: &str) -> String {
    format!("{action_type}_ERROR")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_is_upper_cased() {
        assert_eq!(
            request_action_type(ActionPrefix::ReadList.as_str(), "conversation").unwrap(),
            "READ_LIST_CONVERSATION_RESOURCE"
        );
        assert_eq!(
            request_action_type("create", "employee").unwrap(),
            "CREATE_EMPLOYEE_RESOURCE"
        );
    }

    #[test]
    fn test_missing_inputs_are_rejected() {
        assert_eq!(
            request_action_type("", "conversation"),
            Err(MissingActionTypeInputError::MissingTypePrefix)
        );
        assert_eq!(
            request_action_type("READ", ""),
            Err(MissingActionTypeInputError::MissingJsonapiType)
        );
    }

    #[test]
    fn test_success_and_error_suffixes() {
        let tag = "READ_EMPLOYEE_RESOURCE";
        assert_eq!(success_action_type(tag), "READ_EMPLOYEE_RESOURCE_SUCCESS");
        assert_eq!(error_action_type(tag), "READ_EMPLOYEE_RESOURCE_ERROR");
    }

    #[test]
    fn test_prefix_display() {
        assert_eq!(ActionPrefix::Update.to_string(), "UPDATE");
    }
}
