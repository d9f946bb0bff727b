// src/images/mod.rs
//! Image reference policy and request-time resolution.
//!
//! Notion-hosted assets are served from a signed S3 bucket whose URLs
//! expire about an hour after issue. Rendered HTML must therefore never
//! embed those URLs directly: it embeds stable proxy references instead,
//! and the proxy re-derives a live URL at request time.

pub mod reference;
pub mod resolver;

pub use reference::{display_url, is_ephemeral_url, ImageReference, RetryPolicy};
pub use resolver::{ImageProxyError, ImageResolver, ProxiedImage};
