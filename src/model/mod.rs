//! Domain model for Notion content.
//!
//! Blocks are fetched fresh per page request and never mutated after
//! children are attached; rendering is a pure transform over this tree.

pub mod block;
pub mod blocks;
pub mod common;

pub use block::Block;
pub use blocks::{FileObject, TextBlockContent};
pub use common::BlockCommon;

use crate::types::PageId;
use serde::{Deserialize, Serialize};

/// A Notion page: metadata plus its (lazily attached) block tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub url: String,
    /// Cover asset, if the page has one. File-hosted covers carry an
    /// expiring signed URL and are served through the image proxy.
    pub cover: Option<FileObject>,
    pub created_time: chrono::DateTime<chrono::Utc>,
    pub last_edited_time: chrono::DateTime<chrono::Utc>,
    pub archived: bool,
    /// Top-level blocks in document order. Empty until the block tree
    /// is fetched and attached.
    pub blocks: Vec<Block>,
}

impl Page {
    /// Resolves the cover to a live URL, if any.
    pub fn cover_url(&self) -> Option<&str> {
        self.cover.as_ref().map(|c| c.url())
    }
}
