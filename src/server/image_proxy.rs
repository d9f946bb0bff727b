// src/server/image_proxy.rs
//! The image proxy endpoint.
//!
//! Serves Notion-hosted assets through a stable URL: the signed upstream
//! URL is re-derived on every request, so the response stays valid long
//! after the signature rendered into the page would have expired.

use super::AppState;
use crate::constants::IMAGE_CACHE_CONTROL;
use crate::images::{ImageProxyError, ImageReference};
use crate::types::{BlockId, PageId};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

pub fn image_routes() -> Router<AppState> {
    Router::new().route("/api/notion-image", get(notion_image))
}

#[derive(Debug, Deserialize)]
struct ImageQuery {
    /// `cover` (default) or `block`.
    #[serde(rename = "type", default = "default_kind")]
    kind: String,
    #[serde(rename = "pageId")]
    page_id: Option<String>,
    #[serde(rename = "blockId")]
    block_id: Option<String>,
}

fn default_kind() -> String {
    "cover".to_string()
}

impl ImageQuery {
    /// Validates the query into a resolvable reference.
    ///
    /// Anything malformed is a 404: from the caller's point of view there
    /// is no image at that reference.
    fn into_reference(self) -> Result<ImageReference, ImageProxyError> {
        let page_id = self
            .page_id
            .as_deref()
            .and_then(|s| PageId::parse(s).ok())
            .ok_or(ImageProxyError::NotFound)?;

        match self.kind.as_str() {
            "cover" => Ok(ImageReference::Cover { page_id }),
            "block" => {
                let block_id = self
                    .block_id
                    .as_deref()
                    .and_then(|s| BlockId::parse(s).ok())
                    .ok_or(ImageProxyError::NotFound)?;
                Ok(ImageReference::Block { page_id, block_id })
            }
            other => {
                log::debug!("Unknown image reference type '{}'", other);
                Err(ImageProxyError::NotFound)
            }
        }
    }
}

async fn notion_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, ImageProxyError> {
    let reference = query.into_reference()?;
    let image = state.resolver.proxy(&reference).await?;

    log::debug!(
        "Proxied {} bytes of {} for {:?}",
        image.bytes.len(),
        image.content_type,
        reference
    );

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
        ],
        image.bytes,
    )
        .into_response())
}
