//! Atelier MCP Server
//!
//! This binary serves the Atelier editing engine over stdio. It exposes the
//! `str_replace_editor` and `file_manager` tools plus a `project_files`
//! query so AI assistants can edit an in-memory virtual project tree.

use atelier_mcp::AtelierServer;
use rmcp::ServiceExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing - output to stderr so it doesn't interfere with MCP stdio
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    tracing::info!("Starting Atelier MCP server");

    let server = AtelierServer::new();

    // Serve over stdio
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("Failed to start MCP service: {}", e);
        })?;

    tracing::info!("Atelier MCP server running");

    // Wait for the service to complete
    service.waiting().await?;

    tracing::info!("Atelier MCP server shutting down");

    Ok(())
}
