// src/api/tree.rs
//! Recursive block tree assembly.
//!
//! The Notion children endpoint is shallow: it lists direct children only.
//! `BlockTreeFetcher` walks the tree level by level, attaching children to
//! their parents in document order so the renderer sees the full structure.

use super::NotionRepository;
use crate::constants::NOTION_MAX_FETCH_DEPTH;
use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::NotionId;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Fetches complete block trees through a [`NotionRepository`].
#[derive(Clone)]
pub struct BlockTreeFetcher {
    repo: Arc<dyn NotionRepository>,
    max_depth: usize,
}

impl BlockTreeFetcher {
    /// Creates a fetcher with the given recursion limit.
    ///
    /// Depth is clamped to [`NOTION_MAX_FETCH_DEPTH`] to prevent runaway
    /// fetches on pathological trees.
    pub fn new(repo: Arc<dyn NotionRepository>, max_depth: usize) -> Self {
        let safe_depth = max_depth.min(NOTION_MAX_FETCH_DEPTH);
        if max_depth > safe_depth {
            log::warn!(
                "Requested recursion depth {} exceeds maximum safe depth {}. Clamping.",
                max_depth,
                safe_depth
            );
        }
        Self {
            repo,
            max_depth: safe_depth,
        }
    }

    /// Retrieves a page with its full block tree attached.
    pub async fn fetch_page(&self, id: &NotionId) -> Result<Page, AppError> {
        let mut page = self.repo.retrieve_page(id).await?;
        page.blocks = self.fetch_tree(id).await?;
        log::info!(
            "Fetched page '{}' with {} top-level blocks",
            page.title,
            page.blocks.len()
        );
        Ok(page)
    }

    /// Retrieves the block tree rooted at the given block or page ID.
    pub async fn fetch_tree(&self, root: &NotionId) -> Result<Vec<Block>, AppError> {
        self.fetch_level(root.clone(), 0).await
    }

    /// Fetches one level of children and recurses into subtrees.
    ///
    /// Boxed because async recursion needs an indirection point. Children
    /// are fetched sequentially so document order is preserved without
    /// reassembly bookkeeping.
    fn fetch_level(
        &self,
        parent: NotionId,
        depth: usize,
    ) -> BoxFuture<'_, Result<Vec<Block>, AppError>> {
        Box::pin(async move {
            let mut blocks = self.repo.retrieve_children(&parent).await?;

            for block in &mut blocks {
                if !block.has_children() {
                    continue;
                }
                if depth + 1 >= self.max_depth {
                    log::debug!(
                        "Depth limit {} reached at block {}; leaving subtree unexpanded",
                        self.max_depth,
                        block.id().as_str()
                    );
                    continue;
                }
                let child_id = NotionId::from(block.id());
                let children = self.fetch_level(child_id, depth + 1).await?;
                block.set_children(children);
            }

            Ok(blocks)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::blocks::{ParagraphBlock, ToggleBlock};
    use crate::model::{BlockCommon, TextBlockContent};
    use crate::types::{BlockId, RichTextItem};
    use std::collections::HashMap;

    /// Repository backed by an in-memory adjacency map.
    struct MapRepository {
        children: HashMap<String, Vec<Block>>,
    }

    #[async_trait::async_trait]
    impl NotionRepository for MapRepository {
        async fn retrieve_page(&self, _id: &NotionId) -> Result<Page, AppError> {
            unimplemented!("not used by tree tests")
        }

        async fn retrieve_children(&self, parent: &NotionId) -> Result<Vec<Block>, AppError> {
            Ok(self
                .children
                .get(parent.as_str())
                .cloned()
                .unwrap_or_default())
        }
    }

    fn paragraph(id: &str, text: &str) -> Block {
        Block::Paragraph(ParagraphBlock {
            common: BlockCommon::new(BlockId::parse(id).unwrap()),
            content: TextBlockContent {
                rich_text: vec![RichTextItem::plain_text(text)],
                color: Default::default(),
            },
        })
    }

    fn toggle_with_children(id: &str) -> Block {
        let mut common = BlockCommon::new(BlockId::parse(id).unwrap());
        common.has_children = true;
        Block::Toggle(ToggleBlock {
            common,
            content: TextBlockContent::default(),
        })
    }

    const ROOT: &str = "00000000000000000000000000000001";
    const TOGGLE: &str = "00000000000000000000000000000002";

    #[tokio::test]
    async fn attaches_children_in_document_order() {
        let mut children = HashMap::new();
        children.insert(
            ROOT.to_string(),
            vec![
                paragraph("00000000000000000000000000000010", "first"),
                toggle_with_children(TOGGLE),
                paragraph("00000000000000000000000000000011", "last"),
            ],
        );
        children.insert(
            TOGGLE.to_string(),
            vec![paragraph("00000000000000000000000000000020", "nested")],
        );

        let fetcher = BlockTreeFetcher::new(Arc::new(MapRepository { children }), 5);
        let tree = fetcher
            .fetch_tree(&NotionId::parse(ROOT).unwrap())
            .await
            .unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree[1].children().len(), 1);
        assert!(tree[0].children().is_empty());
        assert!(tree[2].children().is_empty());
    }

    #[tokio::test]
    async fn depth_limit_leaves_subtree_unexpanded() {
        let mut children = HashMap::new();
        children.insert(ROOT.to_string(), vec![toggle_with_children(TOGGLE)]);
        children.insert(
            TOGGLE.to_string(),
            vec![paragraph("00000000000000000000000000000020", "deep")],
        );

        let fetcher = BlockTreeFetcher::new(Arc::new(MapRepository { children }), 1);
        let tree = fetcher
            .fetch_tree(&NotionId::parse(ROOT).unwrap())
            .await
            .unwrap();

        assert_eq!(tree.len(), 1);
        assert!(tree[0].children().is_empty());
    }
}
