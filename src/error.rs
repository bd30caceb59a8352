//! Configuration error types.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that a
//! bad base URL or missing field is reported before any request is sent.
//!
//! # Example
//!
//! ```rust
//! use rest_api::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("api.example.com");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while building or loading a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The base URL is not an absolute URL with a scheme and host.
    #[error("Invalid base URL '{url}'. Expected a full URL with scheme (e.g., 'https://api.example.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A serialized configuration could not be parsed.
    #[error("Invalid client configuration: {reason}")]
    InvalidJson {
        /// The parser's description of the problem.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_url_error_message() {
        let error = ConfigError::InvalidBaseUrl {
            url: "not a url".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("not a url"));
        assert!(message.contains("scheme"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "base_url" };
        let message = error.to_string();
        assert!(message.contains("base_url"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::InvalidJson {
            reason: "eof".to_string(),
        };
        let _: &dyn std::error::Error = &error;
    }
}
