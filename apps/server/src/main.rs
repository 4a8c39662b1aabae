//! cnsearch gateway — HTTP boundary for the company-name resolution
//! pipeline.
//!
//! Exposes `/search` (resolve a name, API-key gated), `/insert` (append a
//! record to the index), and `/health`.

mod auth;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use cnsearch_core::Resolver;
use cnsearch_shared::load_config;

use crate::auth::StaticKeySet;
use crate::state::AppState;

/// cnsearch — company-name resolution gateway.
#[derive(Parser)]
#[command(
    name = "cnsearch-server",
    version,
    about = "Resolve free-text company names against a full-text index, \
             with web-discovery fallback."
)]
struct Args {
    /// Path to the TOML config file.
    #[arg(long, env = "CNSEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind host.
    #[arg(long, env = "CNSEARCH_HOST")]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long, env = "CNSEARCH_PORT")]
    port: Option<u16>,

    /// Override the index store base URL.
    #[arg(long, env = "CNSEARCH_INDEX_URL")]
    index_url: Option<String>,

    /// Override whether unresolved queries fall back to crawling.
    #[arg(long, env = "CNSEARCH_CRAWLING")]
    crawling: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cnsearch=info,cnsearch_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = args.index_url {
        config.index.url = url;
    }
    if let Some(crawling) = args.crawling {
        config.crawl.enabled = crawling;
    }

    let resolver = Resolver::new(&config)?;
    resolver.ensure_index().await?;

    let state = AppState::new(
        Arc::new(resolver),
        Arc::new(StaticKeySet::new(config.server.api_keys.clone())),
        config.crawl.enabled,
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!(%addr, index = %config.index.name, "starting cnsearch gateway");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}
