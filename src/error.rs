//! Configuration error types.
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_orchestrator::{ApiUrl, ConfigError};
//!
//! let result = ApiUrl::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiUrl)));
//! ```

use thiserror::Error;

/// Errors that can occur while building an [`ApiConfig`](crate::ApiConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API base URL cannot be empty.
    #[error("API URL cannot be empty. Please provide the base URL of your JSON:API server.")]
    EmptyApiUrl,

    /// API base URL is malformed.
    #[error("Invalid API URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://api.example.com/v1').")]
    InvalidApiUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
