use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderName, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use magicgen_api::config::ServerConfig;
use magicgen_api::engine::GenerationEngine;
use magicgen_api::routes;
use magicgen_api::state::AppState;
use magicgen_replicate::ReplicateClient;

/// Build a test `ServerConfig` rooted at the given data directory.
///
/// The Replicate endpoint is unroutable and the engine runs zero workers,
/// so submitted generations stay `pending` until a test flips them.
pub fn test_config(data_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        data_dir: data_dir.to_str().unwrap().to_string(),
        replicate_api_key: "test-key".to_string(),
        replicate_api_url: "http://127.0.0.1:9".to_string(),
        generation_workers: 0,
        generation_queue_capacity: 32,
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and data directory.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(pool: SqlitePool, data_dir: &Path) -> Router {
    build_test_app_with_queue(pool, data_dir, 32)
}

/// Like [`build_test_app`], but with an explicit generation queue capacity
/// so tests can exercise the full-queue rejection path.
pub fn build_test_app_with_queue(
    pool: SqlitePool,
    data_dir: &Path,
    queue_capacity: usize,
) -> Router {
    let mut config = test_config(data_dir);
    config.generation_queue_capacity = queue_capacity;

    let client = Arc::new(ReplicateClient::new(
        config.replicate_api_url.clone(),
        config.replicate_api_key.clone(),
    ));
    let engine = GenerationEngine::start(
        pool.clone(),
        client,
        config.generation_workers,
        config.generation_queue_capacity,
    );

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine,
    };

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::app_routes(&config.data_dir))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}

/// Issue a GET request against the app.
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Issue a form-encoded POST request against the app.
pub async fn post_form(app: &Router, uri: &str, body: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Collect a response body into a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body and parse it as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
