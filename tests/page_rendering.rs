// tests/page_rendering.rs
//! End-to-end rendering: raw API JSON through the parser, tree fetcher,
//! and HTML renderer.

use notion2html::api::parser::{parse_block, parse_page};
use notion2html::{
    AppError, Block, BlockTreeFetcher, NotionId, NotionRepository, Page, RetryPolicy,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

const PAGE: &str = "550e8400e29b41d4a716446655440000";
const TOGGLE: &str = "00000000000000000000000000000002";
const IMAGE: &str = "598337872cf94fdf8782e53db20768a5";

struct MockRepository {
    page: Page,
    children: HashMap<String, Vec<Block>>,
}

#[async_trait::async_trait]
impl NotionRepository for MockRepository {
    async fn retrieve_page(&self, _id: &NotionId) -> Result<Page, AppError> {
        Ok(self.page.clone())
    }

    async fn retrieve_children(&self, parent: &NotionId) -> Result<Vec<Block>, AppError> {
        Ok(self
            .children
            .get(parent.as_str())
            .cloned()
            .unwrap_or_default())
    }
}

fn sample_page() -> Page {
    parse_page(&json!({
        "object": "page",
        "id": PAGE,
        "url": "https://www.notion.so/Post-550e8400e29b41d4a716446655440000",
        "created_time": "2025-03-01T19:05:00.000Z",
        "last_edited_time": "2025-03-02T10:00:00.000Z",
        "archived": false,
        "cover": {
            "type": "file",
            "file": {
                "url": "https://prod-files-secure.s3.us-west-2.amazonaws.com/cover.png",
                "expiry_time": "2026-01-01T00:00:00.000Z"
            }
        },
        "properties": {
            "Name": { "type": "title", "title": [{ "plain_text": "A <Typed> Post" }] }
        }
    }))
    .unwrap()
}

fn block_json(id: &str, block_type: &str, has_children: bool, payload: serde_json::Value) -> Block {
    parse_block(json!({
        "object": "block",
        "id": id,
        "type": block_type,
        "has_children": has_children,
        block_type: payload,
    }))
}

#[tokio::test]
async fn renders_full_page_document_from_api_shapes() {
    let top_level = vec![
        block_json(
            "00000000000000000000000000000001",
            "heading_1",
            false,
            json!({ "rich_text": [{ "plain_text": "Intro" }] }),
        ),
        block_json(
            TOGGLE,
            "toggle",
            true,
            json!({ "rich_text": [{ "plain_text": "Details" }] }),
        ),
        block_json(
            IMAGE,
            "image",
            false,
            json!({
                "type": "file",
                "file": { "url": "https://prod-files-secure.s3.us-west-2.amazonaws.com/pic.png" },
                "caption": []
            }),
        ),
        block_json(
            "00000000000000000000000000000003",
            "some_future_type",
            false,
            json!({ "whatever": true }),
        ),
    ];

    let nested = vec![block_json(
        "00000000000000000000000000000010",
        "paragraph",
        false,
        json!({ "rich_text": [{ "plain_text": "hidden" }] }),
    )];

    let mut children = HashMap::new();
    children.insert(PAGE.to_string(), top_level);
    children.insert(TOGGLE.to_string(), nested);

    let repo = MockRepository {
        page: sample_page(),
        children,
    };

    let fetcher = BlockTreeFetcher::new(Arc::new(repo), 5);
    let page = fetcher
        .fetch_page(&NotionId::parse(PAGE).unwrap())
        .await
        .unwrap();

    let html = notion2html::render_page(&page, RetryPolicy::default());

    // Title is escaped
    assert!(html.contains("<title>A &lt;Typed&gt; Post</title>"));

    // File-hosted cover goes through the proxy
    assert!(html.contains(&format!(
        "src=\"/api/notion-image?type=cover&amp;pageId={}\"",
        PAGE
    )));

    // Body blocks appear in document order
    let intro = html.find("<h1>Intro</h1>").unwrap();
    let toggle = html.find("<details><summary>Details</summary>").unwrap();
    let image = html.find("/api/notion-image?type=block").unwrap();
    assert!(intro < toggle && toggle < image);

    // Nested toggle content was fetched and rendered
    assert!(html.contains("<p>hidden</p>"));

    // Proxied image carries the stable block reference and retry numbers
    assert!(html.contains(&format!(
        "type=block&amp;pageId={}&amp;blockId={}",
        PAGE, IMAGE
    )));
    assert!(html.contains("data-retry-max=\"3\""));

    // The unknown block degrades to raw JSON instead of vanishing
    assert!(html.contains("<pre class=\"unsupported\">"));
    assert!(html.contains("some_future_type"));
}
