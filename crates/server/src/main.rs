//! pagepulse server entry point.
//!
//! Loads configuration, opens the rating cache, and serves the MCP tools on
//! stdio. Logging goes to stderr to avoid interfering with the JSON-RPC
//! protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use pagepulse_client::{ChatClient, ChatConfig, ConfluenceClient, ConfluenceClientConfig, HtmlCleaner};
use pagepulse_core::{AppConfig, PageRater, RatingCache};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    match dotenv {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("failed to read .env: {e}"),
    }

    let config = AppConfig::load().context("loading configuration")?;
    config.require_confluence_token()?;
    config.require_ai_api_key()?;

    let cache = RatingCache::open(&config.cache).await.context("opening rating cache")?;
    match cache.sweep(config.cache.ttl_seconds).await {
        Ok(deleted) => tracing::info!(deleted, "startup cache sweep finished"),
        Err(e) => tracing::warn!("startup cache sweep failed: {e}"),
    }

    let source = ConfluenceClient::new(ConfluenceClientConfig::from(&config.confluence))?;
    let model = ChatClient::new(ChatConfig::from(&config.ai))?;
    let rater = PageRater::new(&config, cache, Arc::new(source), Arc::new(HtmlCleaner::new()), Arc::new(model));

    tracing::info!(
        wiki_url = %config.confluence.wiki_url,
        model = %config.ai.model,
        db_path = %config.cache.db_path.display(),
        "Starting pagepulse server on stdio transport"
    );

    let handler = handler::PagePulseServer::new(Arc::new(rater));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
