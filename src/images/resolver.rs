// src/images/resolver.rs
//! Request-time resolution of stable image references.
//!
//! Resolution always re-derives a live URL from the Notion API, because
//! any URL captured at render time may already be expired. The byte fetch
//! bypasses intermediate caches so an expired cached response can't mask
//! a freshly signed URL.

use super::reference::ImageReference;
use crate::api::NotionRepository;
use crate::constants::IMAGE_FALLBACK_CONTENT_TYPE;
use crate::error::AppError;
use crate::model::Block;
use crate::types::NotionId;
use reqwest::header;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why an image could not be proxied.
#[derive(Error, Debug)]
pub enum ImageProxyError {
    /// The page, block, or asset does not exist, or the block is not an image.
    #[error("Image not found")]
    NotFound,

    /// Upstream returned a non-success status; relayed to the caller as-is.
    #[error("Upstream returned status {0}")]
    Upstream(u16),

    /// Anything else: network failure, malformed response, bad config.
    #[error(transparent)]
    Internal(#[from] AppError),
}

/// A relayed image: raw bytes plus the upstream content type.
#[derive(Debug, Clone)]
pub struct ProxiedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Resolves stable image references to live bytes.
#[derive(Clone)]
pub struct ImageResolver {
    repo: Arc<dyn NotionRepository>,
    http: reqwest::Client,
}

impl ImageResolver {
    pub fn new(repo: Arc<dyn NotionRepository>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { repo, http })
    }

    /// Resolves a reference to a currently valid asset URL.
    pub async fn resolve(&self, reference: &ImageReference) -> Result<String, ImageProxyError> {
        match reference {
            ImageReference::Cover { page_id } => {
                let page = self
                    .repo
                    .retrieve_page(&NotionId::from(page_id))
                    .await
                    .map_err(not_found_or_internal)?;
                page.cover_url()
                    .map(str::to_string)
                    .ok_or(ImageProxyError::NotFound)
            }
            ImageReference::Block { page_id, block_id } => {
                let children = self
                    .repo
                    .retrieve_children(&NotionId::from(page_id))
                    .await
                    .map_err(not_found_or_internal)?;
                let block = children
                    .iter()
                    .find(|b| b.id() == block_id)
                    .ok_or(ImageProxyError::NotFound)?;
                match block {
                    Block::Image(img) => Ok(img.image.url().to_string()),
                    _ => {
                        log::debug!(
                            "Block {} is a {}, not an image",
                            block_id.as_str(),
                            block.block_type()
                        );
                        Err(ImageProxyError::NotFound)
                    }
                }
            }
        }
    }

    /// Fetches the asset bytes from a resolved URL.
    pub async fn fetch(&self, url: &str) -> Result<ProxiedImage, ImageProxyError> {
        let response = self
            .http
            .get(url)
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| ImageProxyError::Internal(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Upstream image fetch returned {} for {}", status, url);
            return Err(ImageProxyError::Upstream(status.as_u16()));
        }

        let content_type = content_type_of(response.headers());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageProxyError::Internal(e.into()))?
            .to_vec();

        Ok(ProxiedImage {
            bytes,
            content_type,
        })
    }

    /// Resolves a reference and relays its bytes in one step.
    pub async fn proxy(&self, reference: &ImageReference) -> Result<ProxiedImage, ImageProxyError> {
        let url = self.resolve(reference).await?;
        self.fetch(&url).await
    }
}

/// Maps a repository error: objects that don't exist are a proxy 404,
/// everything else is internal.
fn not_found_or_internal(err: AppError) -> ImageProxyError {
    if err.is_not_found() {
        ImageProxyError::NotFound
    } else {
        ImageProxyError::Internal(err)
    }
}

/// Content type to relay: the upstream's, or `image/jpeg` when absent.
fn content_type_of(headers: &header::HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(IMAGE_FALLBACK_CONTENT_TYPE)
        .to_string()
}
