//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against an in-process
//! remote backend.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use dual_cache::{
    api::create_router,
    cache::{LocalStore, MemoryBackend, RemoteStore},
    AppState, DualCache,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app(capacity: usize) -> Router {
    create_router(AppState::new(DualCache::in_memory("api"), capacity))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == SET / GET ==

#[tokio::test]
async fn test_set_and_get_roundtrip() {
    let app = create_test_app(10);

    let (status, json) = send(
        &app,
        "PUT",
        "/set",
        Some(r#"{"key":"get_key","value":"get_value"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("get_key"));

    let (status, json) = send(&app, "GET", "/get/get_key", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "get_key");
    assert_eq!(json["value"], "get_value");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app(10);

    let (status, json) = send(&app, "GET", "/get/missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_eviction_scenario() {
    let app = create_test_app(2);

    send(&app, "PUT", "/set", Some(r#"{"key":"a","value":"1"}"#)).await;
    send(&app, "PUT", "/set", Some(r#"{"key":"b","value":"2"}"#)).await;

    let (_, json) = send(&app, "GET", "/get/a", None).await;
    assert_eq!(json["value"], "1");

    send(&app, "PUT", "/set", Some(r#"{"key":"c","value":"3"}"#)).await;

    // "a" was touched by the read, so "b" is the one evicted
    let (status, _) = send(&app, "GET", "/get/b", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, json) = send(&app, "GET", "/get/c", None).await;
    assert_eq!(json["value"], "3");

    let (_, local) = send(&app, "GET", "/print/local", None).await;
    let (_, remote) = send(&app, "GET", "/print/remote", None).await;
    assert_eq!(local["contents"], remote["contents"]);
}

#[tokio::test]
async fn test_request_capacity_overrides_default() {
    let app = create_test_app(10);

    for key in ["a", "b", "c"] {
        let body = format!(r#"{{"key":"{}","value":"v","capacity":1}}"#, key);
        let (status, _) = send(&app, "PUT", "/set", Some(&body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, json) = send(&app, "GET", "/print/local", None).await;
    assert_eq!(json["backend"], "local");
    assert_eq!(json["contents"], "c:v");
}

// == Validation ==

#[tokio::test]
async fn test_invalid_ttl_returns_bad_request() {
    let app = create_test_app(10);

    let (status, json) = send(
        &app,
        "PUT",
        "/set",
        Some(r#"{"key":"k","value":"v","ttl":0}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("TTL"));

    let (_, json) = send(&app, "GET", "/print/local", None).await;
    assert_eq!(json["contents"], "");
}

#[tokio::test]
async fn test_oversized_ttl_returns_bad_request() {
    let app = create_test_app(10);

    let body = format!(r#"{{"key":"k","value":"v","ttl":{}}}"#, i64::MAX);
    let (status, _) = send(&app, "PUT", "/set", Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = send(&app, "GET", "/print/local", None).await;
    assert_eq!(json["contents"], "");
    let (_, json) = send(&app, "GET", "/print/remote", None).await;
    assert_eq!(json["contents"], "");
}

#[tokio::test]
async fn test_empty_key_request() {
    let app = create_test_app(10);

    let (status, _) = send(&app, "PUT", "/set", Some(r#"{"key":"","value":"v"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app(10);

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// == DELETE ==

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = create_test_app(10);

    send(&app, "PUT", "/set", Some(r#"{"key":"d","value":"1"}"#)).await;

    let (status, json) = send(&app, "DELETE", "/del/d", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "d");

    let (status, _) = send(&app, "DELETE", "/del/d", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/get/d", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_all_endpoint() {
    let app = create_test_app(10);

    for key in ["x", "y", "z"] {
        let body = format!(r#"{{"key":"{}","value":"1"}}"#, key);
        send(&app, "PUT", "/set", Some(&body)).await;
    }

    let (status, _) = send(&app, "DELETE", "/del_all", None).await;
    assert_eq!(status, StatusCode::OK);

    for key in ["x", "y", "z"] {
        let (status, _) = send(&app, "GET", &format!("/get/{}", key), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    let (_, remote) = send(&app, "GET", "/print/remote", None).await;
    assert_eq!(remote["contents"], "");
}

// == Stats / Health ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app(10);

    send(&app, "PUT", "/set", Some(r#"{"key":"s","value":"1"}"#)).await;
    send(&app, "GET", "/get/s", None).await;
    send(&app, "GET", "/get/nope", None).await;

    let (status, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["local_entries"], 1);
    assert_eq!(json["remote_entries"], 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(10);

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

// == Remote failures ==

#[tokio::test]
async fn test_remote_failure_returns_bad_gateway() {
    let backend = Arc::new(MemoryBackend::new());
    let cache = DualCache::new(
        Arc::new(LocalStore::new()),
        Arc::new(RemoteStore::new(backend.clone(), "api")),
    );
    let app = create_router(AppState::new(cache, 10));

    backend.set_failing(true);

    let (status, json) = send(&app, "PUT", "/set", Some(r#"{"key":"k","value":"v"}"#)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("Remote"));

    let (status, _) = send(&app, "GET", "/get/k", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    // The local write went through: no rollback across backends
    let (_, json) = send(&app, "GET", "/print/local", None).await;
    assert_eq!(json["contents"], "k:v");
}

// == TTL ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let app = create_test_app(10);

    send(
        &app,
        "PUT",
        "/set",
        Some(r#"{"key":"ttl_key","value":"v","ttl":1}"#),
    )
    .await;

    let (status, _) = send(&app, "GET", "/get/ttl_key", None).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let (status, _) = send(&app, "GET", "/get/ttl_key", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
