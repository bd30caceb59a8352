//! Configuration types for the REST client.
//!
//! # Overview
//!
//! - [`ClientConfig`]: base URL, default headers, API versioning and transport settings
//! - [`ClientConfigBuilder`]: a builder for constructing [`ClientConfig`] instances
//! - [`BaseUrl`]: a validated base URL with no trailing slash
//!
//! # Example
//!
//! ```rust
//! use rest_api::{BaseUrl, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com").unwrap())
//!     .default_header("X-Api-Key", "abc")
//!     .api_version(2)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.version_segment(), Some("/v2".to_string()));
//! ```

mod newtypes;

pub use newtypes::BaseUrl;

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Content types accepted for JSON bodies when strict checking is enabled.
pub const ACCEPTABLE_CONTENT_TYPES: [&str; 3] =
    ["application/json", "text/json", "text/javascript"];

/// Configuration for a [`RestClient`](crate::RestClient).
///
/// # Mutability
///
/// A long-lived client may have its configuration changed through
/// [`RestClient::config_mut`](crate::RestClient::config_mut). Each request takes a
/// snapshot of the configuration when it is dispatched, so a change only
/// affects requests sent afterwards. Sharing one client between tasks that
/// also mutate it requires external synchronization, which is the caller's
/// responsibility.
///
/// # Serialization
///
/// `ClientConfig` can be loaded from JSON. Every field except `base_url` has
/// a default:
///
/// ```rust
/// use rest_api::ClientConfig;
///
/// let config = ClientConfig::from_json(r#"{
///     "base_url": "https://api.example.com",
///     "api_version": 3,
///     "uses_api_version": true,
///     "timeout_ms": 5000
/// }"#).unwrap();
///
/// assert_eq!(config.api_version(), 3);
/// assert!(config.uses_api_version());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    base_url: BaseUrl,
    #[serde(default)]
    default_headers: HashMap<String, String>,
    #[serde(default)]
    api_version: u32,
    #[serde(default)]
    uses_api_version: bool,
    #[serde(
        default,
        rename = "timeout_ms",
        with = "duration_ms",
        skip_serializing_if = "Option::is_none"
    )]
    timeout: Option<Duration>,
    #[serde(default)]
    strict_content_type: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_agent: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Loads a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidJson`] if the document is malformed,
    /// is missing `base_url`, or carries an invalid base URL.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson {
            reason: e.to_string(),
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the API version number.
    ///
    /// Only used when [`uses_api_version`](Self::uses_api_version) is `true`.
    #[must_use]
    pub const fn api_version(&self) -> u32 {
        self.api_version
    }

    /// Returns whether URLs carry a `/v{api_version}` segment.
    #[must_use]
    pub const fn uses_api_version(&self) -> bool {
        self.uses_api_version
    }

    /// Returns the transport timeout, if one is configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns whether response content types are checked before decoding.
    #[must_use]
    pub const fn strict_content_type(&self) -> bool {
        self.strict_content_type
    }

    /// Returns the custom user agent, if configured.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Returns the version path segment (e.g. `/v2`), or `None` when
    /// versioning is disabled.
    #[must_use]
    pub fn version_segment(&self) -> Option<String> {
        self.uses_api_version
            .then(|| format!("/v{}", self.api_version))
    }

    /// Replaces the base URL.
    pub fn set_base_url(&mut self, base_url: BaseUrl) {
        self.base_url = base_url;
    }

    /// Replaces all default headers.
    pub fn set_default_headers(&mut self, headers: HashMap<String, String>) {
        self.default_headers = headers;
    }

    /// Adds or replaces a single default header.
    ///
    /// Names compare case-insensitively, so `x-key` replaces an existing
    /// `X-Key` entry.
    pub fn insert_default_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        insert_header(&mut self.default_headers, name.into(), value.into());
    }

    /// Sets the API version number without changing whether it is used.
    pub fn set_api_version(&mut self, version: u32) {
        self.api_version = version;
    }

    /// Turns the `/v{api_version}` URL segment on or off.
    pub fn set_uses_api_version(&mut self, enabled: bool) {
        self.uses_api_version = enabled;
    }

    /// Sets or clears the transport timeout.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Sets or clears the custom user agent.
    pub fn set_user_agent(&mut self, user_agent: Option<String>) {
        self.user_agent = user_agent;
    }

    /// Turns response content type checking on or off.
    pub fn set_strict_content_type(&mut self, strict: bool) {
        self.strict_content_type = strict;
    }
}

impl Default for ClientConfig {
    /// A configuration pointing at `http://localhost` with no headers and
    /// versioning disabled.
    fn default() -> Self {
        Self {
            base_url: BaseUrl::localhost(),
            default_headers: HashMap::new(),
            api_version: 0,
            uses_api_version: false,
            timeout: None,
            strict_content_type: false,
            user_agent: None,
        }
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// `base_url` is required. Setting [`api_version`](Self::api_version) also
/// turns versioning on unless [`uses_api_version`](Self::uses_api_version)
/// says otherwise.
///
/// # Defaults
///
/// - `default_headers`: empty
/// - `api_version`: `0`, unused
/// - `timeout`: `None` (transport default)
/// - `strict_content_type`: `false`
/// - `user_agent`: `None` (`rest-api-client/<version>`)
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<BaseUrl>,
    default_headers: HashMap<String, String>,
    api_version: Option<u32>,
    uses_api_version: Option<bool>,
    timeout: Option<Duration>,
    strict_content_type: bool,
    user_agent: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (required).
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets all default headers at once.
    #[must_use]
    pub fn default_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.default_headers = headers;
        self
    }

    /// Adds a single default header, replacing any entry whose name differs
    /// only by case.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_header(&mut self.default_headers, name.into(), value.into());
        self
    }

    /// Sets the API version and enables versioned URLs.
    #[must_use]
    pub const fn api_version(mut self, version: u32) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Explicitly enables or disables versioned URLs.
    #[must_use]
    pub const fn uses_api_version(mut self, enabled: bool) -> Self {
        self.uses_api_version = Some(enabled);
        self
    }

    /// Sets the transport timeout applied to every request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Requires a JSON content type on non-empty successful responses.
    #[must_use]
    pub const fn strict_content_type(mut self, strict: bool) -> Self {
        self.strict_content_type = strict;
        self
    }

    /// Overrides the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        Ok(ClientConfig {
            base_url,
            default_headers: self.default_headers,
            api_version: self.api_version.unwrap_or_default(),
            uses_api_version: self
                .uses_api_version
                .unwrap_or(self.api_version.is_some()),
            timeout: self.timeout,
            strict_content_type: self.strict_content_type,
            user_agent: self.user_agent,
        })
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => {
                serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

fn insert_header(headers: &mut HashMap<String, String>, name: String, value: String) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}
