//! Integration tests for callback-based completion and the shared client.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rest_api::{BaseUrl, ClientConfig, HttpError, HttpMethod, RestClient, RestRequest};
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_client(server: &MockServer) -> RestClient {
    RestClient::new(
        ClientConfig::builder()
            .base_url(BaseUrl::new(server.uri()).unwrap())
            .build()
            .unwrap(),
    )
}

#[tokio::test]
async fn test_callback_fires_once_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": ["ada"]})))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = mpsc::unbounded_channel();

    let counter = Arc::clone(&calls);
    let request = RestRequest::builder(HttpMethod::Get, "users").build().unwrap();
    let handle = client.send_with_callback(request, move |outcome| {
        counter.fetch_add(1, Ordering::SeqCst);
        tx.send(outcome).unwrap();
    });

    handle.await.unwrap();
    let outcome = rx.recv().await.unwrap();

    assert!(outcome.successful);
    assert_eq!(outcome.body, Some(json!({"users": ["ada"]})));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_callback_fires_once_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = mpsc::unbounded_channel();

    let counter = Arc::clone(&calls);
    let request = RestRequest::builder(HttpMethod::Post, "jobs")
        .param("n", 1)
        .build()
        .unwrap();
    client
        .send_with_callback(request, move |outcome| {
            counter.fetch_add(1, Ordering::SeqCst);
            tx.send(outcome).unwrap();
        })
        .await
        .unwrap();

    let outcome = rx.recv().await.unwrap();
    assert!(!outcome.successful);
    assert_eq!(outcome.error.unwrap().status(), Some(500));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_callback_reports_invalid_request() {
    let client = RestClient::default();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let request = RestRequest::builder(HttpMethod::Get, "users")
        .header("Bad Header", "x")
        .build()
        .unwrap();
    client
        .send_with_callback(request, move |outcome| {
            tx.send(outcome).unwrap();
        })
        .await
        .unwrap();

    let outcome = rx.recv().await.unwrap();
    assert!(!outcome.successful);
    assert!(matches!(outcome.error, Some(HttpError::InvalidRequest(_))));
}

#[tokio::test]
async fn test_callback_uses_config_at_send_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"v": 1}))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut client = create_client(&server);
    client.config_mut().set_api_version(1);
    client.config_mut().set_uses_api_version(true);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let request = RestRequest::builder(HttpMethod::Get, "status").build().unwrap();
    let handle = client.send_with_callback(request, move |outcome| {
        tx.send(outcome).unwrap();
    });

    // Reconfiguring after dispatch does not affect the request in flight.
    client.config_mut().set_uses_api_version(false);

    handle.await.unwrap();
    let outcome = rx.recv().await.unwrap();
    assert_eq!(outcome.body, Some(json!({"v": 1})));
}

#[tokio::test]
async fn test_concurrent_callbacks_each_fire_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(8)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let calls = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let counter = Arc::clone(&calls);
            let request = RestRequest::builder(HttpMethod::Get, format!("items/{i}"))
                .build()
                .unwrap();
            client.send_with_callback(request, move |outcome| {
                assert!(outcome.successful);
                counter.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn test_aborted_request_never_calls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = create_client(&server);
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    let request = RestRequest::builder(HttpMethod::Get, "slow").build().unwrap();
    let handle = client.send_with_callback(request, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    handle.abort();
    let result = handle.await;

    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_shared_client_is_reconfigurable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v9/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "up"})))
        .expect(1)
        .mount(&server)
        .await;

    {
        let mut shared = RestClient::shared().write().await;
        let config = shared.config_mut();
        config.set_base_url(BaseUrl::new(server.uri()).unwrap());
        config.set_api_version(9);
        config.set_uses_api_version(true);
    }

    assert!(std::ptr::eq(RestClient::shared(), RestClient::shared()));

    let client = RestClient::shared().read().await.clone();

    // A writer is not blocked while the cloned client has a request in flight.
    let (outcome, ()) = tokio::join!(client.get("health", Default::default()), async {
        RestClient::shared()
            .write()
            .await
            .config_mut()
            .insert_default_header("X-Later", "1");
    });
    assert_eq!(outcome.body, Some(json!({"status": "up"})));
    assert!(RestClient::shared()
        .read()
        .await
        .config()
        .default_headers()
        .contains_key("X-Later"));
}
