//! Local HTTP server the integration tests dispatch against.

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::Request;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{any, get};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Binds the test server to a random local port and serves it from a
/// background task on the ambient runtime.
pub async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/json", get(fixed_json))
        .route("/echo", any(echo))
        .route("/echo-body", any(echo_body))
        .route("/plain", get(plain))
        .route("/slow", get(slow))
        .route("/missing", get(missing))
        .route("/dup-headers", get(dup_headers));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("test server addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    addr
}

async fn fixed_json() -> impl IntoResponse {
    ([("x-flavor", "lemon")], Json(json!({"a": 1})))
}

/// Reflects the request line and headers back as JSON.
async fn echo(req: Request) -> Json<Value> {
    let headers: serde_json::Map<String, Value> = req
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                Value::String(value.to_str().unwrap_or("").to_string()),
            )
        })
        .collect();

    Json(json!({
        "method": req.method().as_str(),
        "query": req.uri().query().unwrap_or(""),
        "headers": headers,
    }))
}

/// Returns the request body bytes untouched, labeled as JSON.
async fn echo_body(body: Bytes) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], body)
}

async fn plain() -> &'static str {
    "not json"
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(800)).await;
    Json(json!({"slow": true}))
}

async fn missing() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({"error": "no such thing"})))
}

async fn dup_headers() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.append("x-dup", "first".parse().expect("header value"));
    headers.append("x-dup", "second".parse().expect("header value"));
    (headers, Json(json!({})))
}
