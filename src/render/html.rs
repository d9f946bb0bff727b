// src/render/html.rs
//! HTML rendering of the block tree.
//!
//! Dispatch is an exhaustive match over the `Block` enum with a deliberate
//! fallback: unsupported payloads render as raw JSON in a `<pre>` so one
//! bad block never blanks a page. Standalone `table_row` blocks render
//! nothing; their owning table renders them.

use super::rich_text::{html_escape, rich_text_to_html};
use crate::images::{display_url, ImageReference, RetryPolicy};
use crate::model::blocks::{CalloutBlock, CodeBlock, Icon, ImageBlock, TableBlock, VideoBlock};
use crate::model::{Block, Page, TextBlockContent};
use crate::types::{plain_text_of, PageId, RichTextItem};
use url::Url;

/// Everything a block needs to render besides its own payload.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    /// The page owning the blocks; proxy references are built against it.
    pub page_id: &'a PageId,
    /// Retry numbers emitted on proxied images.
    pub retry: RetryPolicy,
}

impl<'a> RenderContext<'a> {
    pub fn new(page_id: &'a PageId) -> Self {
        Self {
            page_id,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Renders a sequence of blocks, one fragment per block, in input order.
///
/// Blocks that only render inside a parent (standalone `table_row`)
/// contribute no fragment.
pub fn render_blocks(blocks: &[Block], ctx: &RenderContext) -> Vec<String> {
    blocks.iter().filter_map(|b| render_block(b, ctx)).collect()
}

/// Renders a single block and its attached children.
pub fn render_block(block: &Block, ctx: &RenderContext) -> Option<String> {
    let html = match block {
        Block::Paragraph(b) => text_with_children("p", &b.content, block, ctx),
        Block::Heading1(b) => text_with_children("h1", &b.content, block, ctx),
        Block::Heading2(b) => text_with_children("h2", &b.content, block, ctx),
        Block::Heading3(b) => text_with_children("h3", &b.content, block, ctx),
        Block::BulletedListItem(b) => format!(
            "<ul><li>{}{}</li></ul>",
            rich_text_to_html(&b.content.rich_text),
            children_html(block, ctx)
        ),
        Block::NumberedListItem(b) => format!(
            "<ol><li>{}{}</li></ol>",
            rich_text_to_html(&b.content.rich_text),
            children_html(block, ctx)
        ),
        Block::ToDo(b) => {
            let checked_attr = if b.checked { " checked" } else { "" };
            let label_class = if b.checked {
                "to-do-label checked"
            } else {
                "to-do-label"
            };
            format!(
                "<div class=\"to-do\"><input type=\"checkbox\" disabled{}><span class=\"{}\">{}</span></div>{}",
                checked_attr,
                label_class,
                rich_text_to_html(&b.content.rich_text),
                indent(children_html(block, ctx))
            )
        }
        Block::Toggle(b) => format!(
            "<details><summary>{}</summary>{}</details>",
            rich_text_to_html(&b.content.rich_text),
            children_html(block, ctx)
        ),
        Block::Quote(b) => format!(
            "<blockquote>{}{}</blockquote>",
            rich_text_to_html(&b.content.rich_text),
            children_html(block, ctx)
        ),
        Block::Callout(b) => render_callout(b, block, ctx),
        Block::Code(b) => render_code(b),
        Block::Equation(b) => format!(
            "<div class=\"equation\">{}</div>",
            html_escape(&b.expression)
        ),
        Block::Divider(_) => "<hr>".to_string(),
        Block::Breadcrumb(_) => "<nav class=\"breadcrumb\"></nav>".to_string(),
        Block::TableOfContents(_) => "<nav class=\"table-of-contents\"></nav>".to_string(),
        Block::Image(b) => render_image(b, ctx),
        Block::Video(b) => render_video(b),
        Block::Audio(b) => format!(
            "<audio controls src=\"{}\"></audio>",
            html_escape(b.audio.url())
        ),
        Block::File(b) => render_attachment("file", b.file.url(), &b.caption),
        Block::Pdf(b) => render_attachment("pdf", b.pdf.url(), &b.caption),
        Block::Bookmark(b) => {
            let label = if b.caption.is_empty() {
                html_escape(b.url.as_str())
            } else {
                rich_text_to_html(&b.caption)
            };
            format!(
                "<a class=\"bookmark\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                html_escape(b.url.as_str()),
                label
            )
        }
        Block::Embed(b) => format!(
            "<iframe class=\"embed\" src=\"{}\"></iframe>",
            html_escape(b.url.as_str())
        ),
        Block::ChildPage(b) => format!(
            "<div class=\"child-page\">{}</div>",
            html_escape(&b.title)
        ),
        Block::ChildDatabase(b) => format!(
            "<div class=\"child-database\">{}</div>",
            html_escape(&b.title)
        ),
        Block::Table(b) => render_table(b, block),
        // Rendered only by the owning table
        Block::TableRow(_) => return None,
        Block::ColumnList(_) => format!(
            "<div class=\"column-list\" style=\"display:flex\">{}</div>",
            children_html(block, ctx)
        ),
        Block::Column(_) => format!(
            "<div class=\"column\" style=\"flex:1 1 0\">{}</div>",
            children_html(block, ctx)
        ),
        Block::Synced(_) => format!(
            "<div class=\"synced-block\">{}</div>",
            children_html(block, ctx)
        ),
        Block::Template(b) => text_with_children("div", &b.content, block, ctx),
        Block::LinkPreview(b) => format!(
            "<a class=\"link-preview\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            html_escape(b.url.as_str()),
            html_escape(b.url.as_str())
        ),
        Block::Unsupported(b) => {
            let raw = serde_json::to_string_pretty(&b.raw)
                .unwrap_or_else(|_| b.raw.to_string());
            format!("<pre class=\"unsupported\">{}</pre>", html_escape(&raw))
        }
    };

    Some(html)
}

/// Renders a full page document: title, proxied cover, article body.
pub fn render_page(page: &Page, retry: RetryPolicy) -> String {
    let ctx = RenderContext::new(&page.id).with_retry(retry);
    let title = html_escape(&page.title);

    let cover = page
        .cover_url()
        .map(|url| {
            let reference = ImageReference::Cover {
                page_id: page.id.clone(),
            };
            format!(
                "<img class=\"cover\" src=\"{}\" alt=\"\">",
                html_escape(&display_url(url, &reference))
            )
        })
        .unwrap_or_default();

    let mut body =
        String::with_capacity(page.blocks.len() * crate::constants::CHARS_PER_BLOCK_ESTIMATE);
    for fragment in render_blocks(&page.blocks, &ctx) {
        body.push_str(&fragment);
    }

    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>{cover}<h1>{title}</h1><article>{body}</article></body></html>\n"
    )
}

/// Renders attached children one level deeper, concatenated.
fn children_html(block: &Block, ctx: &RenderContext) -> String {
    block
        .children()
        .iter()
        .filter_map(|c| render_block(c, ctx))
        .collect()
}

/// Wraps non-empty child markup in an indent container.
fn indent(children: String) -> String {
    if children.is_empty() {
        children
    } else {
        format!("<div class=\"indent\">{}</div>", children)
    }
}

/// Text-bearing block: inline runs in `tag`, children indented after.
fn text_with_children(
    tag: &str,
    content: &TextBlockContent,
    block: &Block,
    ctx: &RenderContext,
) -> String {
    format!(
        "<{tag}>{}</{tag}>{}",
        rich_text_to_html(&content.rich_text),
        indent(children_html(block, ctx))
    )
}

fn render_callout(b: &CalloutBlock, block: &Block, ctx: &RenderContext) -> String {
    let icon = match &b.icon {
        Some(Icon::Emoji { emoji }) => {
            format!("<span class=\"callout-icon\">{}</span>", html_escape(emoji))
        }
        Some(Icon::External { external }) => format!(
            "<img class=\"callout-icon\" src=\"{}\" alt=\"\">",
            html_escape(&external.url)
        ),
        Some(Icon::File { file }) => format!(
            "<img class=\"callout-icon\" src=\"{}\" alt=\"\">",
            html_escape(&file.url)
        ),
        None => String::new(),
    };
    format!(
        "<aside class=\"callout\">{}<div>{}{}</div></aside>",
        icon,
        rich_text_to_html(&b.content.rich_text),
        indent(children_html(block, ctx))
    )
}

fn render_code(b: &CodeBlock) -> String {
    let source = plain_text_of(&b.content.rich_text);
    let mut html = format!(
        "<pre><code class=\"language-{}\">{}</code></pre>",
        html_escape(&b.language),
        html_escape(&source)
    );
    if !b.caption.is_empty() {
        html.push_str(&format!(
            "<figcaption>{}</figcaption>",
            rich_text_to_html(&b.caption)
        ));
    }
    html
}

fn render_image(b: &ImageBlock, ctx: &RenderContext) -> String {
    let reference = ImageReference::Block {
        page_id: ctx.page_id.clone(),
        block_id: b.common.id.clone(),
    };
    let raw_url = b.image.url();
    let src = display_url(raw_url, &reference);
    let alt = plain_text_of(&b.caption);

    // Retry attributes are only meaningful for proxied assets; stable
    // external URLs either load or they don't.
    let retry_attrs = if src != raw_url {
        format!(
            " data-retry-max=\"{}\" data-retry-delay-ms=\"{}\" data-fallback=\"\u{1F4DD}\"",
            ctx.retry.max_attempts, ctx.retry.delay_ms
        )
    } else {
        String::new()
    };

    let img = format!(
        "<img src=\"{}\" alt=\"{}\"{}>",
        html_escape(&src),
        html_escape(&alt),
        retry_attrs
    );

    if b.caption.is_empty() {
        format!("<figure>{}</figure>", img)
    } else {
        format!(
            "<figure>{}<figcaption>{}</figcaption></figure>",
            img,
            rich_text_to_html(&b.caption)
        )
    }
}

fn render_video(b: &VideoBlock) -> String {
    let url = b.video.url();
    if let Some(id) = youtube_video_id(url) {
        return format!(
            "<iframe class=\"video\" src=\"https://www.youtube.com/embed/{}\" allowfullscreen></iframe>",
            html_escape(&id)
        );
    }
    format!("<video controls src=\"{}\"></video>", html_escape(url))
}

/// Extracts the video id from `youtube.com/watch?v=` and `youtu.be/` URLs.
fn youtube_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    match parsed.host_str()? {
        "www.youtube.com" | "youtube.com" | "m.youtube.com" => {
            if parsed.path() != "/watch" {
                return None;
            }
            parsed
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned())
        }
        "youtu.be" => parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

fn render_attachment(kind: &str, url: &str, caption: &[RichTextItem]) -> String {
    let label = if caption.is_empty() {
        html_escape(url)
    } else {
        rich_text_to_html(caption)
    };
    format!(
        "<a class=\"{}\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
        kind,
        html_escape(url),
        label
    )
}

fn render_table(table: &TableBlock, block: &Block) -> String {
    let mut rows = String::new();

    for (row_index, child) in block.children().iter().enumerate() {
        let Block::TableRow(row) = child else {
            continue;
        };

        let header_row = table.has_column_header && row_index == 0;
        let mut cells = String::new();
        for (cell_index, cell) in row.cells.iter().enumerate() {
            let header_cell = header_row || (table.has_row_header && cell_index == 0);
            let tag = if header_cell { "th" } else { "td" };
            cells.push_str(&format!("<{tag}>{}</{tag}>", rich_text_to_html(cell)));
        }
        rows.push_str(&format!("<tr>{}</tr>", cells));
    }

    format!("<table><tbody>{}</tbody></table>", rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::blocks::*;
    use crate::model::BlockCommon;
    use crate::types::{Annotations, BlockId};
    use pretty_assertions::assert_eq;

    const PAGE: &str = "550e8400e29b41d4a716446655440000";

    fn page_id() -> PageId {
        PageId::parse(PAGE).unwrap()
    }

    fn text(s: &str) -> TextBlockContent {
        TextBlockContent {
            rich_text: vec![RichTextItem::plain_text(s)],
            color: Default::default(),
        }
    }

    fn paragraph(s: &str) -> Block {
        Block::Paragraph(ParagraphBlock {
            common: BlockCommon::default(),
            content: text(s),
        })
    }

    fn table_row(cells: &[&str]) -> Block {
        Block::TableRow(TableRowBlock {
            common: BlockCommon::default(),
            cells: cells
                .iter()
                .map(|c| vec![RichTextItem::plain_text(c)])
                .collect(),
        })
    }

    #[test]
    fn fragments_preserve_input_order() {
        let pid = page_id();
        let ctx = RenderContext::new(&pid);
        let blocks = vec![paragraph("first"), paragraph("second"), paragraph("third")];

        let fragments = render_blocks(&blocks, &ctx);
        assert_eq!(
            fragments,
            vec![
                "<p>first</p>".to_string(),
                "<p>second</p>".to_string(),
                "<p>third</p>".to_string(),
            ]
        );
    }

    #[test]
    fn standalone_table_row_renders_nothing() {
        let pid = page_id();
        let ctx = RenderContext::new(&pid);
        assert_eq!(render_block(&table_row(&["a"]), &ctx), None);
    }

    #[test]
    fn table_header_rules() {
        let pid = page_id();
        let ctx = RenderContext::new(&pid);

        let common = BlockCommon::default()
            .with_children(vec![table_row(&["h1", "h2"]), table_row(&["a", "b"])]);
        let table = Block::Table(TableBlock {
            common,
            table_width: 2,
            has_column_header: true,
            has_row_header: true,
        });

        let html = render_block(&table, &ctx).unwrap();
        assert_eq!(
            html,
            "<table><tbody><tr><th>h1</th><th>h2</th></tr><tr><th>a</th><td>b</td></tr></tbody></table>"
        );
    }

    #[test]
    fn table_without_headers_uses_td_everywhere() {
        let pid = page_id();
        let ctx = RenderContext::new(&pid);

        let common = BlockCommon::default().with_children(vec![table_row(&["a", "b"])]);
        let table = Block::Table(TableBlock {
            common,
            table_width: 2,
            has_column_header: false,
            has_row_header: false,
        });

        let html = render_block(&table, &ctx).unwrap();
        assert_eq!(
            html,
            "<table><tbody><tr><td>a</td><td>b</td></tr></tbody></table>"
        );
    }

    #[test]
    fn column_list_renders_columns_side_by_side() {
        let pid = page_id();
        let ctx = RenderContext::new(&pid);

        let column = |s: &str| {
            Block::Column(ColumnBlock {
                common: BlockCommon::default().with_children(vec![paragraph(s)]),
            })
        };
        let list = Block::ColumnList(ColumnListBlock {
            common: BlockCommon::default().with_children(vec![column("left"), column("right")]),
        });

        let html = render_block(&list, &ctx).unwrap();
        assert_eq!(
            html,
            "<div class=\"column-list\" style=\"display:flex\">\
             <div class=\"column\" style=\"flex:1 1 0\"><p>left</p></div>\
             <div class=\"column\" style=\"flex:1 1 0\"><p>right</p></div>\
             </div>"
        );
    }

    #[test]
    fn standalone_column_stacks_its_children() {
        let pid = page_id();
        let ctx = RenderContext::new(&pid);

        let column = Block::Column(ColumnBlock {
            common: BlockCommon::default()
                .with_children(vec![paragraph("top"), paragraph("bottom")]),
        });

        let html = render_block(&column, &ctx).unwrap();
        assert_eq!(
            html,
            "<div class=\"column\" style=\"flex:1 1 0\"><p>top</p><p>bottom</p></div>"
        );
    }

    #[test]
    fn checked_to_do_gets_strikethrough_class() {
        let pid = page_id();
        let ctx = RenderContext::new(&pid);

        let todo = Block::ToDo(ToDoBlock {
            common: BlockCommon::default(),
            content: text("done"),
            checked: true,
        });

        let html = render_block(&todo, &ctx).unwrap();
        assert!(html.contains("<input type=\"checkbox\" disabled checked>"));
        assert!(html.contains("class=\"to-do-label checked\""));
    }

    #[test]
    fn ephemeral_image_is_proxied_with_retry_attributes() {
        let pid = page_id();
        let ctx = RenderContext::new(&pid);
        let block_id = BlockId::parse("598337872cf94fdf8782e53db20768a5").unwrap();

        let image = Block::Image(ImageBlock {
            common: BlockCommon::new(block_id),
            image: FileObject::File {
                file: NotionFile {
                    url: "https://prod-files-secure.s3.us-west-2.amazonaws.com/a/b.png"
                        .to_string(),
                    expiry_time: None,
                },
            },
            caption: vec![],
        });

        let html = render_block(&image, &ctx).unwrap();
        assert!(html.contains(&format!(
            "src=\"/api/notion-image?type=block&amp;pageId={}&amp;blockId=598337872cf94fdf8782e53db20768a5\"",
            PAGE
        )));
        assert!(html.contains("data-retry-max=\"3\""));
        assert!(html.contains("data-retry-delay-ms=\"1000\""));
    }

    #[test]
    fn external_image_passes_through_without_retry_attributes() {
        let pid = page_id();
        let ctx = RenderContext::new(&pid);

        let image = Block::Image(ImageBlock {
            common: BlockCommon::default(),
            image: FileObject::External {
                external: ExternalFile {
                    url: "https://images.unsplash.com/photo-1".to_string(),
                },
            },
            caption: vec![RichTextItem::plain_text("a photo")],
        });

        let html = render_block(&image, &ctx).unwrap();
        assert!(html.contains("src=\"https://images.unsplash.com/photo-1\""));
        assert!(html.contains("alt=\"a photo\""));
        assert!(html.contains("<figcaption>a photo</figcaption>"));
        assert!(!html.contains("data-retry-max"));
    }

    #[test]
    fn youtube_urls_become_embeds() {
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            youtube_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(youtube_video_id("https://vimeo.com/12345"), None);
        assert_eq!(youtube_video_id("https://www.youtube.com/playlist?list=x"), None);

        let pid = page_id();
        let ctx = RenderContext::new(&pid);
        let video = Block::Video(VideoBlock {
            common: BlockCommon::default(),
            video: FileObject::External {
                external: ExternalFile {
                    url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
                },
            },
            caption: vec![],
        });
        let html = render_block(&video, &ctx).unwrap();
        assert_eq!(
            html,
            "<iframe class=\"video\" src=\"https://www.youtube.com/embed/dQw4w9WgXcQ\" allowfullscreen></iframe>"
        );
    }

    #[test]
    fn unsupported_block_renders_raw_json_escaped() {
        let pid = page_id();
        let ctx = RenderContext::new(&pid);

        let block = Block::Unsupported(UnsupportedBlock {
            common: BlockCommon::default(),
            block_type: "ai_block".to_string(),
            raw: serde_json::json!({ "type": "ai_block", "note": "<script>" }),
        });

        let html = render_block(&block, &ctx).unwrap();
        assert!(html.starts_with("<pre class=\"unsupported\">"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn toggle_renders_details_with_children() {
        let pid = page_id();
        let ctx = RenderContext::new(&pid);

        let common = BlockCommon::default().with_children(vec![paragraph("inside")]);
        let toggle = Block::Toggle(ToggleBlock {
            common,
            content: text("more"),
        });

        let html = render_block(&toggle, &ctx).unwrap();
        assert_eq!(
            html,
            "<details><summary>more</summary><p>inside</p></details>"
        );
    }

    #[test]
    fn text_is_escaped_everywhere() {
        let pid = page_id();
        let ctx = RenderContext::new(&pid);
        let html = render_block(&paragraph("<b>&\"'"), &ctx).unwrap();
        assert_eq!(html, "<p>&lt;b&gt;&amp;&quot;&#39;</p>");
    }

    #[test]
    fn annotated_runs_compose_inside_blocks() {
        let pid = page_id();
        let ctx = RenderContext::new(&pid);
        let block = Block::Paragraph(ParagraphBlock {
            common: BlockCommon::default(),
            content: TextBlockContent {
                rich_text: vec![RichTextItem::styled(
                    "hi",
                    Annotations {
                        bold: true,
                        italic: true,
                        ..Default::default()
                    },
                )
                .with_href("https://example.com")],
                color: Default::default(),
            },
        });

        let html = render_block(&block, &ctx).unwrap();
        assert_eq!(
            html,
            "<p><a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\"><em><strong>hi</strong></em></a></p>"
        );
    }

    #[test]
    fn page_document_proxies_file_hosted_cover() {
        let page = Page {
            id: page_id(),
            title: "Hello & Welcome".to_string(),
            url: String::new(),
            cover: Some(FileObject::File {
                file: NotionFile {
                    url: "https://prod-files-secure.s3.us-west-2.amazonaws.com/c.png"
                        .to_string(),
                    expiry_time: None,
                },
            }),
            created_time: chrono::Utc::now(),
            last_edited_time: chrono::Utc::now(),
            archived: false,
            blocks: vec![paragraph("body")],
        };

        let html = render_page(&page, RetryPolicy::default());
        assert!(html.contains("<title>Hello &amp; Welcome</title>"));
        assert!(html.contains(&format!(
            "src=\"/api/notion-image?type=cover&amp;pageId={}\"",
            PAGE
        )));
        assert!(html.contains("<article><p>body</p></article>"));
    }
}
