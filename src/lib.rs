// src/lib.rs
//! notion2html library — renders Notion block trees to HTML and proxies
//! the expiring signed URLs of Notion-hosted images.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `NotionErrorCode`, `ValidationError`
//! - **Configuration** — `ServiceConfig`
//! - **Domain model** — `Page`, `Block`, `FileObject`, etc.
//! - **Domain types** — `NotionId`, `PageId`, `BlockId`, `ApiKey`, etc.
//! - **API client** — `NotionRepository`, `NotionHttpClient`, `BlockTreeFetcher`
//! - **Rendering** — `render_blocks`, `render_page`, `rich_text_to_html`
//! - **Image proxy** — `ImageReference`, `ImageResolver`, `is_ephemeral_url`

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod images;
pub mod model;
pub mod render;
pub mod server;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ServiceConfig};

// --- Domain Model ---
pub use crate::model::{Block, BlockCommon, FileObject, Page, TextBlockContent};

// --- Domain Types ---
pub use crate::types::{
    Annotations, ApiKey, BlockId, Color, NotionId, PageId, RichTextItem, ValidatedUrl,
};

// --- API Client ---
pub use crate::api::{BlockTreeFetcher, NotionHttpClient, NotionRepository};

// --- Rendering ---
pub use crate::render::{render_block, render_blocks, render_page, RenderContext};

// --- Image Proxy ---
pub use crate::images::{
    display_url, is_ephemeral_url, ImageProxyError, ImageReference, ImageResolver, RetryPolicy,
};
