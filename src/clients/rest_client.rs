//! The REST client.
//!
//! [`RestClient`] joins endpoint paths onto the configured base URL, merges
//! headers, encodes parameters for the verb, sends the request through
//! `reqwest` and folds whatever happens into a single [`RequestOutcome`].

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::clients::errors::{HttpError, HttpResponseError, InvalidHttpRequestError, RequestSnapshot};
use crate::clients::headers::{header_snapshot, merge_headers, response_headers};
use crate::clients::http_method::HttpMethod;
use crate::clients::http_request::{encode_json_body, encode_query, ParamEncoding, Params, RestRequest};
use crate::clients::http_response::{HttpResponse, RequestOutcome};
use crate::config::{ClientConfig, ACCEPTABLE_CONTENT_TYPES};

/// Library version for the default User-Agent header.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

static SHARED: OnceLock<RwLock<RestClient>> = OnceLock::new();

/// Client for a single REST API.
///
/// Every call sends exactly one HTTP request and produces exactly one
/// [`RequestOutcome`]. Nothing is retried.
///
/// # Thread Safety
///
/// `RestClient` is `Clone`, `Send` and `Sync`. Clones share the underlying
/// connection pool but own their configuration, so cloning is the way to
/// hand a client to another task. Concurrent calls may complete in any order.
///
/// # Example
///
/// ```rust,ignore
/// use rest_api::{BaseUrl, ClientConfig, RestClient};
/// use serde_json::json;
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://api.example.com")?)
///     .default_header("X-Api-Key", "abc")
///     .api_version(2)
///     .build()?;
/// let client = RestClient::new(config);
///
/// // GET https://api.example.com/v2/users?q=test
/// let params = json!({"q": "test"});
/// let outcome = client.get("users", params.as_object().cloned().unwrap_or_default()).await;
/// if outcome.successful {
///     println!("{:?}", outcome.body);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct RestClient {
    client: reqwest::Client,
    config: ClientConfig,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

/// A request ready to hand to the transport.
struct PreparedRequest {
    method: reqwest::Method,
    url: reqwest::Url,
    headers: HeaderMap,
    body: Option<String>,
    timeout: Option<Duration>,
    strict_content_type: bool,
    snapshot: RequestSnapshot,
}

impl RestClient {
    /// Creates a new client with its own connection pool.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self::with_http_client(config, client)
    }

    /// Creates a client on top of an existing `reqwest::Client`.
    ///
    /// Use this to share a connection pool or to configure transport
    /// settings such as proxies or connect timeouts.
    #[must_use]
    pub const fn with_http_client(config: ClientConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    /// Returns the process-wide shared client.
    ///
    /// It starts out with [`ClientConfig::default`]; reconfigure it through
    /// the write lock before use. Using it is optional: independent clients
    /// built with [`RestClient::new`] never touch it.
    ///
    /// ```rust,ignore
    /// use rest_api::{BaseUrl, RestClient};
    ///
    /// RestClient::shared()
    ///     .write()
    ///     .await
    ///     .config_mut()
    ///     .set_base_url(BaseUrl::new("https://api.example.com")?);
    ///
    /// // Clone out of the lock so writers are not blocked by requests in
    /// // flight. Clones share the connection pool.
    /// let client = RestClient::shared().read().await.clone();
    /// let outcome = client.get("users", Default::default()).await;
    /// ```
    pub fn shared() -> &'static RwLock<Self> {
        SHARED.get_or_init(|| RwLock::new(Self::new(ClientConfig::default())))
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the client configuration for modification.
    ///
    /// Changes apply to requests sent afterwards; requests already in
    /// flight keep the configuration they were sent with.
    pub fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    /// Builds the full URL for an endpoint path.
    ///
    /// The result is `base_url`, then `/v{api_version}` when versioning is
    /// enabled, then `/` and the path. The path is not normalized.
    #[must_use]
    pub fn build_url(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.config.base_url(),
            self.config.version_segment().unwrap_or_default(),
            path
        )
    }

    /// Sends a request and waits for its outcome.
    ///
    /// Never fails: transport errors, non-2xx statuses, undecodable bodies
    /// and invalid requests are all reported through the outcome.
    pub async fn send(&self, request: RestRequest) -> RequestOutcome {
        match self.prepare(&request) {
            Ok(prepared) => execute(&self.client, prepared).await,
            Err(error) => rejected(&request, error),
        }
    }

    /// Sends a request in the background and hands the outcome to `callback`.
    ///
    /// The request is built from the configuration as it is now, so the
    /// client may be changed or dropped right after this returns. The
    /// callback runs exactly once, on a Tokio worker thread rather than the
    /// calling thread; hop back to a UI or main thread yourself if needed.
    ///
    /// Aborting the returned handle cancels the request, and a cancelled
    /// request never invokes its callback.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn send_with_callback<F>(&self, request: RestRequest, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(RequestOutcome) + Send + 'static,
    {
        let prepared = self.prepare(&request);
        let client = self.client.clone();

        tokio::spawn(async move {
            let outcome = match prepared {
                Ok(prepared) => execute(&client, prepared).await,
                Err(error) => rejected(&request, error),
            };
            callback(outcome);
        })
    }

    /// Sends a request with the given method and parameters.
    pub async fn request(
        &self,
        method: impl Into<HttpMethod>,
        path: &str,
        params: Params,
    ) -> RequestOutcome {
        match RestRequest::builder(method, path).params(params).build() {
            Ok(request) => self.send(request).await,
            Err(error) => RequestOutcome::failure(error.into()),
        }
    }

    /// Sends a GET request; parameters go into the query string.
    pub async fn get(&self, path: &str, params: Params) -> RequestOutcome {
        self.request(HttpMethod::Get, path, params).await
    }

    /// Sends a POST request; parameters go into a JSON body.
    pub async fn post(&self, path: &str, params: Params) -> RequestOutcome {
        self.request(HttpMethod::Post, path, params).await
    }

    /// Sends a PUT request; parameters go into a JSON body.
    pub async fn put(&self, path: &str, params: Params) -> RequestOutcome {
        self.request(HttpMethod::Put, path, params).await
    }

    /// Sends a DELETE request; parameters go into a JSON body.
    pub async fn delete(&self, path: &str, params: Params) -> RequestOutcome {
        self.request(HttpMethod::Delete, path, params).await
    }

    /// Sends a PATCH request; parameters go into a JSON body.
    pub async fn patch(&self, path: &str, params: Params) -> RequestOutcome {
        self.request(HttpMethod::Patch, path, params).await
    }

    fn prepare(&self, request: &RestRequest) -> Result<PreparedRequest, InvalidHttpRequestError> {
        request.verify()?;
        let method = request.method.to_reqwest()?;

        let url_string = self.build_url(&request.path);
        let mut url =
            reqwest::Url::parse(&url_string).map_err(|e| InvalidHttpRequestError::InvalidUrl {
                url: url_string.clone(),
                reason: e.to_string(),
            })?;

        let mut headers = self.baseline_headers()?;
        headers.extend(merge_headers(
            self.config.default_headers(),
            request.headers.as_ref(),
        )?);

        let mut body = None;
        if !request.params.is_empty() {
            match request.param_encoding() {
                ParamEncoding::Query => {
                    let encoded = encode_query(&request.params);
                    let query = match url.query() {
                        Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
                        _ => encoded,
                    };
                    url.set_query(Some(&query));
                }
                ParamEncoding::JsonBody => {
                    body = Some(encode_json_body(&request.params)?);
                    if !headers.contains_key(CONTENT_TYPE) {
                        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                    }
                }
            }
        }

        let snapshot = RequestSnapshot {
            method: method.as_str().to_string(),
            url: url.to_string(),
            headers: header_snapshot(&headers),
            body: body.clone(),
        };

        Ok(PreparedRequest {
            method,
            url,
            headers,
            body,
            timeout: request.timeout.or_else(|| self.config.timeout()),
            strict_content_type: self.config.strict_content_type(),
            snapshot,
        })
    }

    /// Headers every request starts from; defaults and per-call headers
    /// may replace them.
    fn baseline_headers(&self) -> Result<HeaderMap, InvalidHttpRequestError> {
        let user_agent = self
            .config
            .user_agent()
            .map_or_else(|| format!("rest-api-client/{SDK_VERSION}"), String::from);

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&user_agent).map_err(|_| InvalidHttpRequestError::InvalidHeader {
                name: USER_AGENT.to_string(),
            })?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

fn rejected(request: &RestRequest, error: InvalidHttpRequestError) -> RequestOutcome {
    tracing::warn!(
        "Rejected {} request to {}: {}",
        request.method,
        request.path,
        error
    );
    RequestOutcome::failure(error.into())
}

async fn execute(client: &reqwest::Client, prepared: PreparedRequest) -> RequestOutcome {
    let PreparedRequest {
        method,
        url,
        headers,
        body,
        timeout,
        strict_content_type,
        snapshot,
    } = prepared;

    tracing::debug!("Sending {} request to {}", snapshot.method, snapshot.url);

    let mut builder = client.request(method, url).headers(headers);
    if let Some(body) = body {
        builder = builder.body(body);
    }
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    let res = match builder.send().await {
        Ok(res) => res,
        Err(source) => return transport_failure(source, snapshot),
    };

    let code = res.status().as_u16();
    let res_headers = response_headers(res.headers());
    let body_text = match res.text().await {
        Ok(text) => text,
        Err(source) => return transport_failure(source, snapshot),
    };

    tracing::debug!(
        "Received status {} from {} {}",
        code,
        snapshot.method,
        snapshot.url
    );

    let outcome = classify(
        snapshot,
        HttpResponse::new(code, res_headers, body_text),
        strict_content_type,
    );
    if let Some(error) = &outcome.error {
        tracing::warn!("Request failed: {}", error);
    }
    outcome
}

fn transport_failure(source: reqwest::Error, snapshot: RequestSnapshot) -> RequestOutcome {
    tracing::warn!(
        "{} request to {} failed before a response arrived: {}",
        snapshot.method,
        snapshot.url,
        source
    );
    RequestOutcome::failure(HttpError::Transport {
        source,
        request: Box::new(snapshot),
    })
}

/// Turns a received response into an outcome.
///
/// Success requires a 2xx status and a body that is empty or a JSON object
/// or array.
fn classify(request: RequestSnapshot, response: HttpResponse, strict_content_type: bool) -> RequestOutcome {
    if !response.is_ok() {
        return RequestOutcome::failure(HttpError::Status(Box::new(HttpResponseError {
            code: response.code,
            request,
            response,
        })));
    }

    if response.has_empty_body() {
        return RequestOutcome::success(None);
    }

    if strict_content_type {
        let content_type = response.content_type();
        let acceptable = content_type
            .as_deref()
            .is_some_and(|ct| ACCEPTABLE_CONTENT_TYPES.iter().any(|accepted| *accepted == ct));
        if !acceptable {
            return decode_failure(
                format!(
                    "unacceptable content type {}",
                    content_type.as_deref().unwrap_or("(none)")
                ),
                request,
                response,
            );
        }
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(body @ (Value::Object(_) | Value::Array(_))) => RequestOutcome::success(Some(body)),
        Ok(_) => decode_failure(
            "expected a JSON object or array".to_string(),
            request,
            response,
        ),
        Err(e) => decode_failure(e.to_string(), request, response),
    }
}

fn decode_failure(reason: String, request: RequestSnapshot, response: HttpResponse) -> RequestOutcome {
    RequestOutcome::failure(HttpError::Decode {
        reason,
        request: Box::new(request),
        response: Box::new(response),
    })
}
