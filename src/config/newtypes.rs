//! Validated newtypes for client configuration.

use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A validated base URL for an API.
///
/// The URL must be absolute, with a scheme and a host. Any trailing slashes
/// are removed, so endpoint paths can always be joined with a single `/`.
///
/// # Example
///
/// ```rust
/// use rest_api::BaseUrl;
///
/// let url = BaseUrl::new("https://api.example.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.example.com");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), Some("api.example.com"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaseUrl {
    url: String,
    parsed: Url,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL does not parse, has
    /// no host, or carries a query string or fragment.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let invalid = || ConfigError::InvalidBaseUrl { url: url.clone() };

        let parsed = Url::parse(&url).map_err(|_| invalid())?;
        if parsed.cannot_be_a_base() || parsed.host_str().map_or(true, str::is_empty) {
            return Err(invalid());
        }

        // Endpoint paths are appended, so a query or fragment would swallow them.
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid());
        }

        Ok(Self { url, parsed })
    }

    /// `http://localhost`, used by default configurations.
    pub(crate) fn localhost() -> Self {
        Self::new("http://localhost").expect("literal localhost URL is valid")
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.parsed.scheme()
    }

    /// Returns the host name portion of the URL.
    ///
    /// IPv6 hosts keep their brackets (`[::1]`); credentials and ports are
    /// never part of the host.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.parsed.host_str()
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl TryFrom<String> for BaseUrl {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BaseUrl> for String {
    fn from(value: BaseUrl) -> Self {
        value.url
    }
}
