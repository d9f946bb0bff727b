// src/api/mod.rs
//! Notion API interaction — the ability to retrieve content from a workspace.
//!
//! This module provides a data-oriented interface to the Notion API,
//! with clear separation between I/O operations, parsing, and business logic.

pub mod client;
mod pagination;
pub mod parser;
pub mod tree;

use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::NotionId;

/// The ability to retrieve content from a Notion workspace.
///
/// This is the fundamental algebra for API interaction.
/// Business logic depends on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// Retrieves page metadata. The returned page has no blocks attached.
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError>;

    /// Retrieves all direct children of a block or page, following
    /// pagination cursors until exhausted.
    async fn retrieve_children(&self, parent: &NotionId) -> Result<Vec<Block>, AppError>;
}

// Re-export the public interface
pub use client::NotionHttpClient;
pub use tree::BlockTreeFetcher;
