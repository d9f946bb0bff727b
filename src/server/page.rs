// src/server/page.rs
//! Rendered page endpoint.

use super::error::PageError;
use super::AppState;
use crate::render::render_page;
use crate::types::NotionId;
use axum::extract::{Path, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;

pub fn page_routes() -> Router<AppState> {
    Router::new().route("/page/{id}", get(render_notion_page))
}

async fn render_notion_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    let id = NotionId::parse(&id).map_err(|_| PageError::InvalidId)?;

    let page = state.fetcher.fetch_page(&id).await?;
    log::info!("Rendering page '{}' ({})", page.title, id);

    Ok(Html(render_page(&page, state.retry)))
}
