//! Streamable HTTP transport.
//!
//! The MCP service is mounted at `/mcp` next to a plain `/healthz` route.
//! Sessions are not kept: every POST carries a complete exchange.

use std::sync::Arc;

use anyhow::Context;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::nowcast::Nowcaster;
use crate::server::NowcastMcpServer;

pub fn router(nowcaster: Arc<Nowcaster>) -> Router {
    let mcp_service = StreamableHttpService::new(
        move || Ok(NowcastMcpServer::new(Arc::clone(&nowcaster))),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            stateful_mode: false,
            ..Default::default()
        },
    );

    Router::new()
        .route("/healthz", get(healthz))
        .nest_service("/mcp", mcp_service)
        .layer(TraceLayer::new_for_http())
}

/// Binds `config.bind_addr()` and serves until SIGINT/SIGTERM.
pub async fn serve(nowcaster: Arc<Nowcaster>, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("MCP HTTP stream listening on http://{}/mcp", addr);

    axum::serve(listener, router(nowcaster))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("MCP HTTP stream stopped");
    Ok(())
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
