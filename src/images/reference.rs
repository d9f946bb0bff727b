// src/images/reference.rs
//! Stable image references — the pure, stateless half of the proxy.

use crate::constants::{IMAGE_RETRY_DELAY_MS, IMAGE_RETRY_MAX, NOTION_SIGNED_ASSET_HOST};
use crate::types::{BlockId, PageId};
use url::Url;

/// Whether a URL points at Notion's signed asset storage.
///
/// This is a hostname test, not a signature inspection: every URL on the
/// signed host expires, and nothing off that host does.
pub fn is_ephemeral_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.host_str() == Some(NOTION_SIGNED_ASSET_HOST),
        Err(_) => false,
    }
}

/// A stable, non-expiring reference to an image the proxy can resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// A page's cover asset.
    Cover { page_id: PageId },
    /// An image block on a page.
    Block { page_id: PageId, block_id: BlockId },
}

impl ImageReference {
    /// The proxy path that resolves this reference.
    pub fn proxy_path(&self) -> String {
        match self {
            ImageReference::Cover { page_id } => {
                format!("/api/notion-image?type=cover&pageId={}", page_id.as_str())
            }
            ImageReference::Block { page_id, block_id } => format!(
                "/api/notion-image?type=block&pageId={}&blockId={}",
                page_id.as_str(),
                block_id.as_str()
            ),
        }
    }
}

/// The URL to embed in rendered HTML for an asset.
///
/// Expiring URLs are replaced with the stable proxy reference; externally
/// hosted URLs pass through unchanged.
pub fn display_url(url: &str, reference: &ImageReference) -> String {
    if is_ephemeral_url(url) {
        reference.proxy_path()
    } else {
        url.to_string()
    }
}

/// Client-side retry numbers for proxied images.
///
/// Emitted as data attributes so the consuming UI can re-request a failed
/// image a bounded number of times before showing a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: IMAGE_RETRY_MAX,
            delay_ms: IMAGE_RETRY_DELAY_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = "550e8400e29b41d4a716446655440000";
    const BLOCK: &str = "598337872cf94fdf8782e53db20768a5";

    #[test]
    fn signed_host_is_ephemeral() {
        assert!(is_ephemeral_url(
            "https://prod-files-secure.s3.us-west-2.amazonaws.com/a/b.png?X-Amz-Signature=x"
        ));
    }

    #[test]
    fn external_hosts_are_stable() {
        assert!(!is_ephemeral_url("https://images.unsplash.com/photo-1"));
        assert!(!is_ephemeral_url("https://example.com/prod-files-secure.s3.us-west-2.amazonaws.com"));
        assert!(!is_ephemeral_url("not a url"));
    }

    #[test]
    fn ephemeral_url_becomes_proxy_reference() {
        let reference = ImageReference::Block {
            page_id: PageId::parse(PAGE).unwrap(),
            block_id: BlockId::parse(BLOCK).unwrap(),
        };
        let url = display_url(
            "https://prod-files-secure.s3.us-west-2.amazonaws.com/a/b.png",
            &reference,
        );
        assert_eq!(
            url,
            format!("/api/notion-image?type=block&pageId={}&blockId={}", PAGE, BLOCK)
        );
    }

    #[test]
    fn stable_url_passes_through() {
        let reference = ImageReference::Cover {
            page_id: PageId::parse(PAGE).unwrap(),
        };
        let url = display_url("https://images.unsplash.com/photo-1", &reference);
        assert_eq!(url, "https://images.unsplash.com/photo-1");
    }
}
