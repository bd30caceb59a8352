//! HTTP error types.
//!
//! Every failed request is described by an [`HttpError`]:
//!
//! - [`HttpError::Transport`]: the request never produced a response
//!   (connection refused, DNS failure, timeout)
//! - [`HttpError::Status`]: the server answered outside the 2xx range
//! - [`HttpError::Decode`]: a 2xx response whose body is not a JSON object or array
//! - [`HttpError::InvalidRequest`]: the request could not be built
//!
//! All variants except `InvalidRequest` carry a [`RequestSnapshot`] of what
//! was sent, and the response variants also carry the [`HttpResponse`] that
//! came back.
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_api::HttpError;
//!
//! let outcome = client.get("users", params).await;
//! match outcome.error {
//!     None => println!("Body: {:?}", outcome.body),
//!     Some(HttpError::Status(e)) => println!("Server said {}", e.code),
//!     Some(HttpError::Decode { reason, .. }) => println!("Bad body: {reason}"),
//!     Some(other) => println!("Failed: {other}"),
//! }
//! ```

use std::collections::HashMap;

use thiserror::Error;

use crate::clients::http_response::HttpResponse;

/// What was sent to the server, kept for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestSnapshot {
    /// The HTTP method on the wire.
    pub method: String,
    /// The fully built URL, including any query string.
    pub url: String,
    /// The merged request headers.
    pub headers: HashMap<String, String>,
    /// The serialized request body, if any.
    pub body: Option<String>,
}

/// Error returned when the server responds with a non-2xx status.
#[derive(Debug, Error)]
#[error("Request to {} failed with status {code}", .request.url)]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The request that was sent.
    pub request: RequestSnapshot,
    /// The response that came back.
    pub response: HttpResponse,
}

impl HttpResponseError {
    /// Returns the response body parsed as JSON, if it is valid JSON.
    ///
    /// Error responses frequently carry a JSON description of the problem.
    #[must_use]
    pub fn json_body(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.response.body).ok()
    }
}

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The HTTP method is not a valid token.
    #[error("Invalid Http method {method}.")]
    InvalidMethod {
        /// The invalid method that was provided.
        method: String,
    },

    /// The endpoint path starts with a slash.
    #[error("Invalid path '{path}'. Endpoint paths are relative and must not start with '/'.")]
    InvalidPath {
        /// The path that was provided.
        path: String,
    },

    /// A header name or value cannot be sent over HTTP.
    #[error("Invalid header '{name}'.")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },

    /// The joined URL does not parse.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// The parser's description of the problem.
        reason: String,
    },

    /// The parameters could not be serialized.
    #[error("Cannot serialize parameters: {reason}")]
    InvalidParams {
        /// The serializer's description of the problem.
        reason: String,
    },
}

/// Unified error type for a failed request.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or connection error reported by the transport.
    #[error("Network error: {source}")]
    Transport {
        /// The transport's error.
        #[source]
        source: reqwest::Error,
        /// The request that was being sent.
        request: Box<RequestSnapshot>,
    },

    /// The server answered with a status outside the 2xx range.
    #[error(transparent)]
    Status(#[from] Box<HttpResponseError>),

    /// The server answered 2xx but the body is not a JSON object or array.
    #[error("Cannot decode response from {}: {reason}", .request.url)]
    Decode {
        /// Why decoding failed.
        reason: String,
        /// The request that was sent.
        request: Box<RequestSnapshot>,
        /// The response that came back.
        response: Box<HttpResponse>,
    },

    /// The request could not be built.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),
}

impl HttpError {
    /// Returns the HTTP status code, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response().map(|response| response.code)
    }

    /// Returns the request snapshot, if the request was built.
    #[must_use]
    pub fn request(&self) -> Option<&RequestSnapshot> {
        match self {
            Self::Transport { request, .. } | Self::Decode { request, .. } => Some(&**request),
            Self::Status(error) => Some(&error.request),
            Self::InvalidRequest(_) => None,
        }
    }

    /// Returns the response snapshot, if a response was received.
    #[must_use]
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Status(error) => Some(&error.response),
            Self::Decode { response, .. } => Some(&**response),
            Self::Transport { .. } | Self::InvalidRequest(_) => None,
        }
    }

    /// Returns `true` if the transport reported a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> RequestSnapshot {
        RequestSnapshot {
            method: "GET".to_string(),
            url: "https://api.example.com/users".to_string(),
            headers: HashMap::new(),
            body: None,
        }
    }

    fn response(code: u16, body: &str) -> HttpResponse {
        HttpResponse::new(code, HashMap::new(), body.to_string())
    }

    #[test]
    fn test_status_error_message_includes_url_and_code() {
        let error = HttpResponseError {
            code: 404,
            request: snapshot(),
            response: response(404, r#"{"error":"Not Found"}"#),
        };
        let message = error.to_string();
        assert!(message.contains("https://api.example.com/users"));
        assert!(message.contains("404"));
    }

    #[test]
    fn test_status_error_exposes_json_body() {
        let error = HttpResponseError {
            code: 422,
            request: snapshot(),
            response: response(422, r#"{"errors":["name is required"]}"#),
        };
        assert_eq!(
            error.json_body().unwrap()["errors"][0],
            "name is required"
        );
    }

    #[test]
    fn test_http_error_accessors() {
        let error = HttpError::Status(Box::new(HttpResponseError {
            code: 500,
            request: snapshot(),
            response: response(500, "oops"),
        }));
        assert_eq!(error.status(), Some(500));
        assert_eq!(error.request().unwrap().method, "GET");
        assert_eq!(error.response().unwrap().body, "oops");
        assert!(!error.is_timeout());

        let decode = HttpError::Decode {
            reason: "expected value".to_string(),
            request: Box::new(snapshot()),
            response: Box::new(response(200, "<html>")),
        };
        assert_eq!(decode.status(), Some(200));
        assert!(decode.to_string().contains("expected value"));

        let invalid = HttpError::from(InvalidHttpRequestError::InvalidPath {
            path: "/users".to_string(),
        });
        assert!(invalid.status().is_none());
        assert!(invalid.request().is_none());
    }

    #[test]
    fn test_invalid_request_error_messages() {
        let error = InvalidHttpRequestError::InvalidPath {
            path: "/users".to_string(),
        };
        assert!(error.to_string().contains("must not start with '/'"));

        let error = InvalidHttpRequestError::InvalidHeader {
            name: "Bad Header".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid header 'Bad Header'.");
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let invalid: &dyn std::error::Error = &InvalidHttpRequestError::InvalidMethod {
            method: "BAD VERB".to_string(),
        };
        let _ = invalid;

        let http: &dyn std::error::Error = &HttpError::from(InvalidHttpRequestError::InvalidParams {
            reason: "test".to_string(),
        });
        let _ = http;
    }
}
