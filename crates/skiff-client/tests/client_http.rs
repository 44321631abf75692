//! Integration tests for the client against a local HTTP server.
//!
//! Each test spins up an axum server on an ephemeral loopback port and
//! exercises one request-shaping contract end-to-end: handlers echo what
//! they received so assertions can inspect the exact wire payload.

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use skiff_client::{Client, ClientError, Config, ContainerRef, DEFAULT_IMAGE_PATH};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config_for(base_url: &str) -> Config {
    Config {
        base_url: base_url.to_string(),
        timeout_ms: 2_000,
        ..Default::default()
    }
}

/// A loopback address with nothing listening on it.
async fn refused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn echo_create(axum::Json(body): axum::Json<Value>) -> axum::Json<Value> {
    axum::Json(json!({ "id": "c-new", "request": body }))
}

async fn echo_exec(
    Path(id): Path<String>,
    axum::Json(body): axum::Json<Value>,
) -> axum::Json<Value> {
    axum::Json(json!({ "id": id, "request": body, "exit_code": 0 }))
}

async fn list_containers(Query(params): Query<HashMap<String, String>>) -> axum::Json<Value> {
    match params.get("name").map(String::as_str) {
        Some("web") => axum::Json(json!([{ "id": "c-aaa", "name": "web" }])),
        _ => axum::Json(json!([])),
    }
}

// ============================================================================
// Defaulting & normalization
// ============================================================================

#[tokio::test]
async fn test_create_applies_defaults_and_forces_async() {
    let app = Router::new().route("/containers", post(echo_create));
    let base = serve(app).await;
    let client = Client::new(&config_for(&base));

    let created = client
        .create_container(json!({ "cmd": ["node", "app.js"] }))
        .await
        .unwrap();

    let request = &created["request"];
    assert_eq!(request["command"], json!(["node", "app.js"]));
    assert_eq!(request["async_mode"], json!(true));
    assert_eq!(request["image_path"], json!(DEFAULT_IMAGE_PATH));
    // Table defaults fill the rest without touching caller fields.
    assert_eq!(request["memory_mb"], json!(512));
    assert!(request.get("cmd").is_none());
}

#[tokio::test]
async fn test_create_preserves_explicit_values() {
    let app = Router::new().route("/containers", post(echo_create));
    let base = serve(app).await;
    let client = Client::new(&config_for(&base));

    let created = client
        .create_container(json!({ "async_mode": false, "cmd": ["x"], "memoryMb": 128 }))
        .await
        .unwrap();

    let request = &created["request"];
    assert_eq!(request["async_mode"], json!(false));
    assert_eq!(request["memory_mb"], json!(128));
}

// ============================================================================
// Exec shaping & name resolution
// ============================================================================

#[tokio::test]
async fn test_exec_script_transcoded_to_base64() {
    let app = Router::new().route("/containers/{id}/exec", post(echo_exec));
    let base = serve(app).await;
    let client = Client::new(&config_for(&base));

    let script = "echo A\necho B";
    let result = client
        .exec(&ContainerRef::Id("c-1".to_string()), json!({ "script": script }))
        .await
        .unwrap();

    let encoded = result["request"]["command"]["script_base64"].as_str().unwrap();
    assert_eq!(BASE64.decode(encoded).unwrap(), script.as_bytes());
    assert!(result["request"].get("script").is_none());
}

#[tokio::test]
async fn test_exec_resolves_name_before_primary_call() {
    let app = Router::new()
        .route("/containers", get(list_containers))
        .route("/containers/{id}/exec", post(echo_exec));
    let base = serve(app).await;
    let client = Client::new(&config_for(&base));

    let result = client
        .exec(&ContainerRef::Name("web".to_string()), json!({ "command": "uptime" }))
        .await
        .unwrap();

    // The primary request went to the resolved identifier, not the name.
    assert_eq!(result["id"], json!("c-aaa"));
}

#[tokio::test]
async fn test_exec_unresolved_name_sends_no_exec_request() {
    async fn count_exec(State(hits): State<Arc<AtomicUsize>>) -> axum::Json<Value> {
        hits.fetch_add(1, Ordering::SeqCst);
        axum::Json(json!({}))
    }

    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/containers", get(list_containers))
        .route("/containers/{id}/exec", post(count_exec))
        .with_state(hits.clone());
    let base = serve(app).await;
    let client = Client::new(&config_for(&base));

    let err = client
        .exec(
            &ContainerRef::Name("my-app".to_string()),
            json!({ "script": "echo A\necho B" }),
        )
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(err.to_string().contains("my-app"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_exec_without_command_never_touches_network() {
    // No server at all: validation must fire before any request.
    let client = Client::new(&config_for(&refused_base_url().await));

    let err = client
        .exec(&ContainerRef::Id("c-1".to_string()), json!({ "env": {} }))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(err.to_string().contains("command or script"));
}

// ============================================================================
// Volume inspection
// ============================================================================

#[tokio::test]
async fn test_volume_inspect_translates_not_found() {
    async fn inspect_volume(Path(name): Path<String>) -> (StatusCode, axum::Json<Value>) {
        if name == "data" {
            (StatusCode::OK, axum::Json(json!({ "name": "data", "driver": "local" })))
        } else {
            (StatusCode::NOT_FOUND, axum::Json(json!({ "error": "Volume not found" })))
        }
    }

    let app = Router::new().route("/volumes/{name}", get(inspect_volume));
    let base = serve(app).await;
    let client = Client::new(&config_for(&base));

    let missing = client.inspect_volume("missing").await.unwrap();
    assert!(!missing.found);
    assert_eq!(missing.error_message.as_deref(), Some("Volume not found"));
    assert!(missing.volume.is_none());

    let found = client.inspect_volume("data").await.unwrap();
    assert!(found.found);
    assert_eq!(found.volume.unwrap()["driver"], json!("local"));
}

// ============================================================================
// Transport classification
// ============================================================================

#[tokio::test]
async fn test_timeout_reported_as_408() {
    async fn slow() -> axum::Json<Value> {
        tokio::time::sleep(Duration::from_millis(500)).await;
        axum::Json(json!({ "status": "ok" }))
    }

    let app = Router::new().route("/health", get(slow));
    let base = serve(app).await;
    let config = Config {
        timeout_ms: 50,
        ..config_for(&base)
    };
    let client = Client::new(&config);

    let err = client.health().await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.status(), Some(408));
}

#[tokio::test]
async fn test_connection_failure_reported_as_0() {
    let client = Client::new(&config_for(&refused_base_url().await));

    let err = client.health().await.unwrap_err();
    assert_eq!(err.status(), Some(0));
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_connect_probe_failure_is_connection_error() {
    let base = refused_base_url().await;

    let err = Client::connect(&config_for(&base)).await.unwrap_err();
    match err {
        ClientError::Connection { base_url } => assert_eq!(base_url, base),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_service_error_carries_message_and_detail() {
    async fn failing() -> (StatusCode, axum::Json<Value>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": "boom", "detail": "disk full" })),
        )
    }

    let app = Router::new().route("/containers", post(failing));
    let base = serve(app).await;
    let client = Client::new(&config_for(&base));

    let err = client.create_container(json!({})).await.unwrap_err();
    match err {
        ClientError::Api { operation, status, message, detail } => {
            assert_eq!(operation, "container create");
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
            assert_eq!(detail.as_deref(), Some("disk full"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_no_content_yields_empty_result() {
    async fn stop() -> StatusCode {
        StatusCode::NO_CONTENT
    }

    let app = Router::new().route("/containers/{id}/stop", post(stop));
    let base = serve(app).await;
    let client = Client::new(&config_for(&base));

    let result = client
        .stop_container(&ContainerRef::Id("c-9".to_string()), json!({}))
        .await
        .unwrap();
    assert!(result.is_none());
}

// ============================================================================
// Authentication & query shaping
// ============================================================================

#[tokio::test]
async fn test_bearer_credential_attached() {
    async fn auth_echo(headers: HeaderMap) -> axum::Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        axum::Json(json!({ "authorization": auth }))
    }

    let app = Router::new().route("/health", get(auth_echo));
    let base = serve(app).await;

    // Unauthenticated calls are sent as-is.
    let anon = Client::new(&config_for(&base)).health().await.unwrap();
    assert_eq!(anon["authorization"], json!(""));

    let config = Config {
        token: Some("from-token".to_string()),
        ..config_for(&base)
    };
    let with_token = Client::new(&config).health().await.unwrap();
    assert_eq!(with_token["authorization"], json!("Bearer from-token"));

    // The api_key alias takes precedence over token.
    let config = Config {
        token: Some("from-token".to_string()),
        api_key: Some("from-api-key".to_string()),
        ..config_for(&base)
    };
    let with_alias = Client::new(&config).health().await.unwrap();
    assert_eq!(with_alias["authorization"], json!("Bearer from-api-key"));
}

#[tokio::test]
async fn test_metrics_merges_query_defaults() {
    async fn metrics(Query(params): Query<HashMap<String, String>>) -> axum::Json<Value> {
        axum::Json(json!({ "params": params }))
    }

    let app = Router::new().route("/system/metrics", get(metrics));
    let base = serve(app).await;
    let client = Client::new(&config_for(&base));

    let report = client.metrics(json!({ "scope": "containers" })).await.unwrap();
    // Caller filter wins, table default fills the rest.
    assert_eq!(report["params"]["scope"], json!("containers"));
    assert_eq!(report["params"]["period_s"], json!("60"));
}
