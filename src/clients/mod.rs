//! HTTP client types.
//!
//! # Overview
//!
//! - [`RestClient`]: sends requests and reports a [`RequestOutcome`]
//! - [`RestRequest`]: one call: verb, relative path, parameters, per-call headers
//! - [`HttpMethod`]: GET/POST/PUT/DELETE/PATCH or any custom verb
//! - [`RequestOutcome`]: success flag, parsed JSON body, error
//! - [`HttpResponse`]: raw response snapshot kept for diagnostics
//! - [`HttpError`]: why a request failed
//!
//! # Parameter Encoding
//!
//! GET requests, and any request built with
//! [`url_encode_params(true)`](RestRequestBuilder::url_encode_params), put
//! their parameters into the URL query string (see [`encode_query`]). All
//! other requests send them as a JSON object body with
//! `Content-Type: application/json`.
//!
//! # Completion
//!
//! A 2xx response whose body is a JSON object or array (or empty) is a
//! success. Anything else, including transport failures, is reported
//! through the outcome's `error` with `successful == false`. Nothing is
//! retried; timeouts come from [`ClientConfig`](crate::ClientConfig) or the
//! request, falling back to the transport default.
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_api::{BaseUrl, ClientConfig, HttpMethod, RestClient, RestRequest};
//!
//! let client = RestClient::new(
//!     ClientConfig::builder()
//!         .base_url(BaseUrl::new("https://api.example.com")?)
//!         .build()?,
//! );
//!
//! let request = RestRequest::builder(HttpMethod::Patch, "users/42")
//!     .param("name", "Ada")
//!     .header("If-Match", "\"v3\"")
//!     .build()?;
//!
//! let outcome = client.send(request).await;
//! ```

mod errors;
mod headers;
mod http_method;
mod http_request;
mod http_response;
mod rest_client;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError, RequestSnapshot};
pub use headers::merge_headers;
pub use http_method::HttpMethod;
pub use http_request::{
    encode_json_body, encode_query, ParamEncoding, Params, RestRequest, RestRequestBuilder,
};
pub use http_response::{HttpResponse, RequestOutcome};
pub use rest_client::{RestClient, SDK_VERSION};
