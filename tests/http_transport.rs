/// Streamable HTTP transport tests: a real listener on an ephemeral port.

use std::sync::Arc;

use serde_json::json;

use kma_nowcast::config::Config;
use kma_nowcast::server::{http, SERVER_NAME};
use kma_nowcast::Nowcaster;

async fn spawn_server() -> String {
    let nowcaster = Arc::new(Nowcaster::new(Config::default().with_service_key("test-key")));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, http::router(nowcaster)).await.ok();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_healthz_is_ok() {
    let base = spawn_server().await;
    let response = reqwest::get(format!("{}/healthz", base)).await.expect("healthz reachable");
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_initialize_over_http_names_the_server() {
    let base = spawn_server().await;
    let response = reqwest::Client::new()
        .post(format!("{}/mcp", base))
        .header("accept", "application/json, text/event-stream")
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": { "name": "http-test", "version": "0.0.0" }
            }
        }))
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("body");
    assert!(body.contains(SERVER_NAME), "initialize result names the server: {}", body);
    assert!(body.contains("\"id\":1"), "response echoes the request id: {}", body);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let base = spawn_server().await;
    let response = reqwest::Client::new()
        .post(format!("{}/other", base))
        .json(&json!({ "jsonrpc": "2.0", "id": 1, "method": "ping" }))
        .send()
        .await
        .expect("request sent");
    assert_eq!(response.status(), 404);
}
