//! MCP over stdin/stdout.

use anyhow::Context;
use rmcp::ServiceExt;
use tracing::info;

use crate::server::NowcastMcpServer;

/// Serves until the client closes stdin.
pub async fn serve(server: NowcastMcpServer) -> anyhow::Result<()> {
    info!("MCP stdio transport ready");
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("MCP stdio handshake failed")?;
    service.waiting().await.context("MCP stdio service failed")?;
    info!("stdin closed, shutting down");
    Ok(())
}
