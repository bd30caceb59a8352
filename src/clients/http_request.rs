//! Request types and parameter encoding.
//!
//! A [`RestRequest`] describes one call: the verb, the endpoint path relative
//! to the configured base URL, parameters, optional per-call headers, and
//! whether parameters must go into the URL regardless of verb.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::clients::errors::InvalidHttpRequestError;
use crate::clients::http_method::HttpMethod;

/// Request parameters: a JSON object keyed by parameter name.
pub type Params = Map<String, Value>;

/// Where a request's parameters are serialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamEncoding {
    /// Appended to the URL query string.
    Query,
    /// Sent as a JSON object in the request body.
    JsonBody,
}

/// A request to be sent through a [`RestClient`](crate::RestClient).
///
/// Use [`RestRequest::builder`] to construct requests.
///
/// # Example
///
/// ```rust
/// use rest_api::{HttpMethod, RestRequest};
/// use serde_json::json;
///
/// let request = RestRequest::builder(HttpMethod::Post, "users")
///     .param("name", "Ada")
///     .param("tags", json!(["admin", "ops"]))
///     .header("X-Trace", "1")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.params.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RestRequest {
    /// The HTTP method for this request.
    pub method: HttpMethod,
    /// The endpoint path, relative to the base URL, without a leading slash.
    pub path: String,
    /// The request parameters.
    pub params: Params,
    /// Headers that override the client's defaults for this call only.
    pub headers: Option<HashMap<String, String>>,
    /// Forces parameters into the query string even for non-GET verbs.
    pub url_encode_params: bool,
    /// Overrides the client's timeout for this call only.
    pub timeout: Option<Duration>,
}

impl RestRequest {
    /// Creates a new builder for constructing a `RestRequest`.
    ///
    /// The method can be an [`HttpMethod`] or any string, e.g. `"PURGE"`.
    #[must_use]
    pub fn builder(method: impl Into<HttpMethod>, path: impl Into<String>) -> RestRequestBuilder {
        RestRequestBuilder::new(method.into(), path)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::InvalidPath`] if the path starts
    /// with `/`, or [`InvalidHttpRequestError::InvalidMethod`] if the method
    /// is not a valid HTTP token.
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.path.starts_with('/') {
            return Err(InvalidHttpRequestError::InvalidPath {
                path: self.path.clone(),
            });
        }
        self.method.to_reqwest()?;
        Ok(())
    }

    /// Returns where this request's parameters will be serialized.
    ///
    /// GET requests and requests with `url_encode_params` set use the query
    /// string; everything else sends a JSON body.
    #[must_use]
    pub fn param_encoding(&self) -> ParamEncoding {
        if self.url_encode_params || self.method.as_str().eq_ignore_ascii_case("GET") {
            ParamEncoding::Query
        } else {
            ParamEncoding::JsonBody
        }
    }
}

/// Builder for constructing [`RestRequest`] instances.
#[derive(Debug)]
pub struct RestRequestBuilder {
    method: HttpMethod,
    path: String,
    params: Params,
    headers: Option<HashMap<String, String>>,
    url_encode_params: bool,
    timeout: Option<Duration>,
}

impl RestRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Params::new(),
            headers: None,
            url_encode_params: false,
            timeout: None,
        }
    }

    /// Replaces all parameters at once.
    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Adds a single parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Sets all per-call headers at once.
    #[must_use]
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Adds a single per-call header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Forces parameters into the URL query string.
    #[must_use]
    pub const fn url_encode_params(mut self, url_encode: bool) -> Self {
        self.url_encode_params = url_encode;
        self
    }

    /// Overrides the client timeout for this request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`RestRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<RestRequest, InvalidHttpRequestError> {
        let request = RestRequest {
            method: self.method,
            path: self.path,
            params: self.params,
            headers: self.headers,
            url_encode_params: self.url_encode_params,
            timeout: self.timeout,
        };
        request.verify()?;
        Ok(request)
    }
}

/// Serializes parameters into a percent-encoded query string.
///
/// Keys are emitted in sorted order. Nested objects become `key[sub]=v`,
/// arrays become `key[]=v`. Strings are written as-is, other scalars use
/// their JSON text and `null` yields an empty value. Empty objects and
/// arrays contribute nothing.
///
/// # Example
///
/// ```rust
/// use rest_api::clients::encode_query;
/// use serde_json::json;
///
/// let params = json!({"q": "a b", "page": 2, "tags": ["x", "y"]});
/// let query = encode_query(params.as_object().unwrap());
/// assert_eq!(query, "page=2&q=a%20b&tags%5B%5D=x&tags%5B%5D=y");
/// ```
#[must_use]
pub fn encode_query(params: &Params) -> String {
    let mut pairs = Vec::new();
    for (name, value) in sorted(params) {
        collect_pairs(name, value, &mut pairs);
    }
    pairs
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn sorted(params: &Params) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = params.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

fn collect_pairs(name: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in sorted(map) {
                collect_pairs(&format!("{name}[{key}]"), nested, pairs);
            }
        }
        Value::Array(items) => {
            let array_name = format!("{name}[]");
            for item in items {
                collect_pairs(&array_name, item, pairs);
            }
        }
        Value::String(s) => pairs.push((name.to_string(), s.clone())),
        Value::Null => pairs.push((name.to_string(), String::new())),
        Value::Bool(_) | Value::Number(_) => pairs.push((name.to_string(), value.to_string())),
    }
}

/// Serializes parameters as a JSON object body.
///
/// # Errors
///
/// Returns [`InvalidHttpRequestError::InvalidParams`] if serialization fails.
pub fn encode_json_body(params: &Params) -> Result<String, InvalidHttpRequestError> {
    serde_json::to_string(params).map_err(|e| InvalidHttpRequestError::InvalidParams {
        reason: e.to_string(),
    })
}
