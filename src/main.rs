use clap::Parser;
use grid_dispatch::config::NodeConfig;
use grid_dispatch::events::LoggingSink;
use grid_dispatch::node::Node;
use grid_dispatch::node::transport::HttpTransport;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = NodeConfig::parse();

    tracing::info!("Starting node on {}", config.bind);
    if config.members.len() > 1 {
        tracing::info!("Members: {:?}", config.members);
    } else {
        tracing::info!("Starting as a single-node cluster");
    }

    // 1. Routing, containers and lanes:
    let node = Node::start(&config, Arc::new(HttpTransport::new()), Arc::new(LoggingSink));

    // 2. HTTP Router:
    let app = node.router();

    // 3. Start HTTP server:
    tracing::info!("HTTP server listening on {}", config.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind.socket_addr()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
