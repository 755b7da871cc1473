//! API connector configuration.
//!
//! An [`ApiConfig`] describes one JSON:API server: its base URL and an
//! optional friendly name used in logs. It is handed explicitly to the
//! request compiler, there is no process-wide "active connector".
//!
//! # Example
//!
//! ```rust
//! use jsonapi_orchestrator::{ApiConfig, ApiUrl};
//!
//! let config = ApiConfig::builder()
//!     .name("hermes")
//!     .url(ApiUrl::new("https://www.example.com/api/v1").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     config.build_endpoint("/conversations"),
//!     "https://www.example.com/api/v1/conversations"
//! );
//! ```

mod newtypes;

pub use newtypes::ApiUrl;

use crate::error::ConfigError;

/// Configuration for one JSON:API server.
///
/// `ApiConfig` is `Clone`, `Send`, and `Sync`, so a single value can be
/// shared by every request compiled against that server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    name: Option<String>,
    url: ApiUrl,
}

impl ApiConfig {
    /// Creates a new builder for constructing an `ApiConfig`.
    #[must_use]
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::new()
    }

    /// Shorthand for a config with only a base URL.
    #[must_use]
    pub const fn new(url: ApiUrl) -> Self {
        Self { name: None, url }
    }

    /// Returns the friendly name, if configured.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn url(&self) -> &ApiUrl {
        &self.url
    }

    /// Joins the base URL and a resolved path with exactly one slash.
    #[must_use]
    pub fn build_endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url.as_ref(), path.trim_start_matches('/'))
    }
}

// Verify ApiConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiConfig>();
};

/// Builder for constructing [`ApiConfig`] instances.
///
/// `url` is required, `name` is optional.
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    name: Option<String>,
    url: Option<ApiUrl>,
}

impl ApiConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a friendly name, handy when several APIs are configured.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the base URL (required).
    #[must_use]
    pub fn url(mut self, url: ApiUrl) -> Self {
        self.url = Some(url);
        self
    }

    /// Builds the [`ApiConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `url` is not set.
    pub fn build(self) -> Result<ApiConfig, ConfigError> {
        let url = self
            .url
            .ok_or(ConfigError::MissingRequiredField { field: "url" })?;

        Ok(ApiConfig {
            name: self.name,
            url,
        })
    }
}
