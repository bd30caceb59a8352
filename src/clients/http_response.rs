//! Response and outcome types.
//!
//! [`HttpResponse`] is a snapshot of what the transport returned.
//! [`RequestOutcome`] is the normalized result handed to callers: a success
//! flag, the parsed JSON body and the error, if any.

use std::collections::HashMap;

use crate::clients::errors::HttpError;

/// A raw HTTP response from the API.
///
/// Header names are stored lower-cased; a header may have multiple values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lower-cased name.
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, lower-casing header names.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: String) -> Self {
        let mut normalized: HashMap<String, Vec<String>> = HashMap::new();
        for (name, values) in headers {
            normalized
                .entry(name.to_ascii_lowercase())
                .or_default()
                .extend(values);
        }

        Self {
            code,
            headers: normalized,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the media type of the `Content-Type` header, without parameters.
    ///
    /// `application/json; charset=utf-8` yields `application/json`.
    #[must_use]
    pub fn content_type(&self) -> Option<String> {
        self.header("content-type").map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns `true` if the body is empty or only whitespace.
    #[must_use]
    pub fn has_empty_body(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// The normalized result of a request.
///
/// `successful` is `true` exactly when `error` is `None`. `body` holds the
/// parsed JSON object or array on success; it is `None` on failure and for
/// successful responses with an empty body.
#[derive(Debug)]
pub struct RequestOutcome {
    /// Whether the request succeeded.
    pub successful: bool,
    /// The parsed JSON body.
    pub body: Option<serde_json::Value>,
    /// The error, on failure.
    pub error: Option<HttpError>,
}

impl RequestOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub const fn success(body: Option<serde_json::Value>) -> Self {
        Self {
            successful: true,
            body,
            error: None,
        }
    }

    /// Creates a failed outcome.
    #[must_use]
    pub const fn failure(error: HttpError) -> Self {
        Self {
            successful: false,
            body: None,
            error: Some(error),
        }
    }

    /// Converts the outcome into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the outcome's [`HttpError`] if the request failed.
    pub fn into_result(self) -> Result<Option<serde_json::Value>, HttpError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.body),
        }
    }
}

impl From<Result<Option<serde_json::Value>, HttpError>> for RequestOutcome {
    fn from(result: Result<Option<serde_json::Value>, HttpError>) -> Self {
        match result {
            Ok(body) => Self::success(body),
            Err(error) => Self::failure(error),
        }
    }
}
