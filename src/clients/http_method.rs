//! HTTP verbs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clients::errors::InvalidHttpRequestError;

/// The HTTP method of a request.
///
/// The five common REST verbs have their own variants. Any other method
/// (`HEAD`, `OPTIONS`, or a non-standard verb such as `PURGE`) is carried
/// as [`HttpMethod::Custom`]. Parsing a string picks the dedicated variant
/// whenever one exists, so `"get".parse()` and `HttpMethod::Get` compare equal.
///
/// # Example
///
/// ```rust
/// use rest_api::HttpMethod;
///
/// assert_eq!("patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
/// assert_eq!(HttpMethod::from("purge"), HttpMethod::Custom("PURGE".to_string()));
/// assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    /// HTTP GET. Parameters are always encoded into the URL.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
    /// HTTP PATCH.
    Patch,
    /// Any other method.
    ///
    /// Parsing stores the name upper-cased. A directly constructed value
    /// keeps its case in [`as_str`](Self::as_str) but is upper-cased when
    /// sent, matching how the verb is classified.
    Custom(String),
}

impl HttpMethod {
    /// Returns the method name as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Custom(method) => method,
        }
    }

    /// Converts to the transport's method type. Custom methods are
    /// upper-cased.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::InvalidMethod`] if a custom method
    /// is not a valid HTTP token.
    pub fn to_reqwest(&self) -> Result<reqwest::Method, InvalidHttpRequestError> {
        match self {
            Self::Get => Ok(reqwest::Method::GET),
            Self::Post => Ok(reqwest::Method::POST),
            Self::Put => Ok(reqwest::Method::PUT),
            Self::Delete => Ok(reqwest::Method::DELETE),
            Self::Patch => Ok(reqwest::Method::PATCH),
            Self::Custom(method) => {
                reqwest::Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|_| {
                    InvalidHttpRequestError::InvalidMethod {
                        method: method.clone(),
                    }
                })
            }
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = s.trim().to_ascii_uppercase();
        Ok(match method.as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "PATCH" => Self::Patch,
            _ => Self::Custom(method),
        })
    }
}

impl From<&str> for HttpMethod {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(method) => method,
            Err(never) => match never {},
        }
    }
}

impl From<String> for HttpMethod {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<HttpMethod> for String {
    fn from(value: HttpMethod) -> Self {
        match value {
            HttpMethod::Custom(method) => method,
            other => other.as_str().to_string(),
        }
    }
}
