//! # REST API Client
//!
//! A small async client for talking to a single REST API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Instance-based configuration via [`ClientConfig`] and [`ClientConfigBuilder`]:
//!   base URL, default headers, optional `/v{n}` API versioning, timeouts
//! - A validated [`BaseUrl`] newtype
//! - [`RestClient`], which builds URLs, merges headers, encodes parameters
//!   for the verb and normalizes every response into a [`RequestOutcome`]
//! - Both `async` and callback-based completion
//!
//! HTTP transport, TLS and connection pooling come from `reqwest`; JSON
//! decoding comes from `serde_json`.
//!
//! ## Quick Start
//!
//! ```rust
//! use rest_api::{BaseUrl, ClientConfig, RestClient};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com").unwrap())
//!     .default_header("X-Api-Key", "abc")
//!     .api_version(2)
//!     .build()
//!     .unwrap();
//!
//! let client = RestClient::new(config);
//! assert_eq!(client.build_url("users"), "https://api.example.com/v2/users");
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use rest_api::{HttpMethod, RestRequest};
//! use serde_json::json;
//!
//! // GET: parameters go into the query string
//! let params = json!({"q": "test"}).as_object().cloned().unwrap();
//! let outcome = client.get("users", params).await;
//!
//! // Any verb, per-call headers, forced URL encoding
//! let request = RestRequest::builder("PURGE", "cache/users")
//!     .param("scope", "all")
//!     .header("X-Api-Key", "override")
//!     .url_encode_params(true)
//!     .build()?;
//! let outcome = client.send(request).await;
//!
//! match outcome.into_result() {
//!     Ok(body) => println!("{body:?}"),
//!     Err(error) => eprintln!("{error}"),
//! }
//! ```
//!
//! ## Callbacks
//!
//! ```rust,ignore
//! let handle = client.send_with_callback(request, |outcome| {
//!     // Runs once, on a Tokio worker thread.
//!     println!("successful: {}", outcome.successful);
//! });
//! ```
//!
//! ## Design Principles
//!
//! - **Instances first**: [`RestClient::shared`] exists for convenience, but
//!   every client can be constructed and configured independently
//! - **One attempt, one outcome**: no retries; every failure arrives through
//!   [`RequestOutcome::error`]
//! - **Fail-fast validation**: base URLs, paths, methods and headers are
//!   checked before anything is sent
//! - **Thread-safe**: all types are `Send + Sync`

pub mod clients;
pub mod config;
pub mod error;

pub use config::{BaseUrl, ClientConfig, ClientConfigBuilder};
pub use error::ConfigError;

pub use clients::{
    HttpError, HttpMethod, HttpResponse, HttpResponseError, InvalidHttpRequestError, Params,
    RequestOutcome, RequestSnapshot, RestClient, RestRequest, RestRequestBuilder,
};
