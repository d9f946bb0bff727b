// src/server/mod.rs
//! HTTP surface: the image proxy, page rendering, and liveness.
//!
//! All shared state is injected through `AppState`; there is no
//! cross-request mutable state. Caching is delegated entirely to
//! HTTP headers on the proxy responses.

pub mod error;
mod health;
mod image_proxy;
mod page;

use crate::api::{BlockTreeFetcher, NotionHttpClient, NotionRepository};
use crate::config::ServiceConfig;
use crate::error::AppError;
use crate::images::{ImageResolver, RetryPolicy};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;

/// Per-request dependencies, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: BlockTreeFetcher,
    pub resolver: ImageResolver,
    pub retry: RetryPolicy,
}

impl AppState {
    pub fn new(repo: Arc<dyn NotionRepository>, config: &ServiceConfig) -> Result<Self, AppError> {
        Ok(Self {
            fetcher: BlockTreeFetcher::new(repo.clone(), config.depth),
            resolver: ImageResolver::new(repo, config.fetch_timeout)?,
            retry: config.retry,
        })
    }
}

/// Assembles the application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(image_proxy::image_routes())
        .merge(page::page_routes())
        .with_state(state)
        .merge(health::health_routes())
}

/// Builds the real Notion-backed state and serves until shutdown.
pub async fn start_server(config: &ServiceConfig) -> Result<(), AppError> {
    let client = NotionHttpClient::new(&config.api_key, config.fetch_timeout)?;
    let repo: Arc<dyn NotionRepository> = Arc::new(client);
    let state = AppState::new(repo, config)?;

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::MissingConfiguration(format!("Invalid bind address: {}", e)))?;

    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
