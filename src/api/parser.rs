// src/api/parser.rs
//! Parsing of raw Notion API JSON into the domain model.
//!
//! Block parsing never fails: a block whose type is unrecognized or whose
//! payload doesn't match the expected shape becomes `Block::Unsupported`
//! carrying the raw JSON, so a single bad block never fails a page.

use super::client::ApiResponse;
use super::pagination::PaginatedResponse;
use crate::error::{AppError, NotionErrorCode};
use crate::model::blocks::*;
use crate::model::{Block, BlockCommon, FileObject, Page, TextBlockContent};
use crate::types::{plain_text_of, BlockId, PageId, RichTextItem, ValidatedUrl};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// Error envelope the Notion API returns on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
struct NotionError {
    code: String,
    message: String,
}

/// Converts a non-success response body into a structured error.
fn parse_error_response(body: &str, status: StatusCode, url: &str) -> AppError {
    if let Ok(envelope) = serde_json::from_str::<NotionError>(body) {
        return AppError::NotionService {
            code: NotionErrorCode::from_api_response(&envelope.code),
            message: envelope.message,
            status,
        };
    }

    // Error body was unparseable; fall back to the HTTP status
    AppError::NotionService {
        code: NotionErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}", status, url),
        status,
    }
}

/// Parses a page retrieval response into a `Page` with no blocks attached.
pub fn parse_page_response(result: ApiResponse<String>) -> Result<Page, AppError> {
    if !result.status.is_success() {
        return Err(parse_error_response(&result.data, result.status, &result.url));
    }

    let value: Value = serde_json::from_str(&result.data)?;
    parse_page(&value)
}

/// Parses a block children listing response into one page of blocks.
pub fn parse_blocks_page(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Block>, AppError> {
    if !result.status.is_success() {
        return Err(parse_error_response(&result.data, result.status, &result.url));
    }

    let value: Value = serde_json::from_str(&result.data)?;
    let results = value
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AppError::MalformedResponse("Missing 'results' array in list response".to_string())
        })?
        .iter()
        .cloned()
        .map(parse_block)
        .collect();

    Ok(PaginatedResponse {
        results,
        next_cursor: value
            .get("next_cursor")
            .and_then(Value::as_str)
            .map(str::to_string),
        has_more: value.get("has_more").and_then(Value::as_bool).unwrap_or(false),
    })
}

/// Parses a page object from raw JSON.
pub fn parse_page(value: &Value) -> Result<Page, AppError> {
    let id: PageId = serde_json::from_value(
        value
            .get("id")
            .cloned()
            .ok_or_else(|| AppError::MalformedResponse("Page missing 'id'".to_string()))?,
    )?;

    let cover = match value.get("cover") {
        None | Some(Value::Null) => None,
        Some(v) => Some(serde_json::from_value::<FileObject>(v.clone())?),
    };

    Ok(Page {
        id,
        title: extract_title(value),
        url: value
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        cover,
        created_time: serde_json::from_value(
            value.get("created_time").cloned().unwrap_or(Value::Null),
        )?,
        last_edited_time: serde_json::from_value(
            value.get("last_edited_time").cloned().unwrap_or(Value::Null),
        )?,
        archived: value.get("archived").and_then(Value::as_bool).unwrap_or(false),
        blocks: Vec::new(),
    })
}

/// Extracts the page title from its title-typed property.
///
/// The property name varies per database schema, so we scan for the
/// property whose type is `title`.
fn extract_title(value: &Value) -> String {
    let title_items = value
        .get("properties")
        .and_then(Value::as_object)
        .and_then(|props| {
            props
                .values()
                .find(|prop| prop.get("type").and_then(Value::as_str) == Some("title"))
        })
        .and_then(|prop| prop.get("title"))
        .and_then(|items| serde_json::from_value::<Vec<RichTextItem>>(items.clone()).ok());

    match title_items {
        Some(items) if !items.is_empty() => plain_text_of(&items),
        _ => "Untitled".to_string(),
    }
}

/// Parses a single block object from raw JSON. Never fails.
pub fn parse_block(value: Value) -> Block {
    let common = parse_common(&value);

    let Some(block_type) = value
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string)
    else {
        log::warn!("Block {} has no 'type' field", common.id.as_str());
        return Block::Unsupported(UnsupportedBlock {
            common,
            block_type: "unknown".to_string(),
            raw: value,
        });
    };

    let payload = value.get(&block_type).cloned().unwrap_or(Value::Null);
    match build_block(common.clone(), &block_type, payload) {
        Ok(block) => block,
        Err(e) => {
            log::warn!(
                "Block {} ({}) has unexpected payload shape: {}",
                common.id.as_str(),
                block_type,
                e
            );
            Block::Unsupported(UnsupportedBlock {
                common,
                block_type,
                raw: value,
            })
        }
    }
}

/// Fields every block object carries.
fn parse_common(value: &Value) -> BlockCommon {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| BlockId::parse(s).ok())
        .unwrap_or_else(BlockId::new_v4);

    BlockCommon {
        id,
        children: Vec::new(),
        has_children: value
            .get("has_children")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        archived: value.get("archived").and_then(Value::as_bool).unwrap_or(false),
    }
}

#[derive(Deserialize)]
struct ToDoPayload {
    #[serde(flatten)]
    content: TextBlockContent,
    #[serde(default)]
    checked: bool,
}

#[derive(Deserialize)]
struct CodePayload {
    #[serde(flatten)]
    content: TextBlockContent,
    #[serde(default)]
    language: String,
    #[serde(default)]
    caption: Vec<RichTextItem>,
}

#[derive(Deserialize)]
struct CalloutPayload {
    #[serde(flatten)]
    content: TextBlockContent,
    #[serde(default)]
    icon: Option<Icon>,
}

#[derive(Deserialize)]
struct TablePayload {
    #[serde(default)]
    table_width: usize,
    #[serde(default)]
    has_column_header: bool,
    #[serde(default)]
    has_row_header: bool,
}

#[derive(Deserialize)]
struct TableRowPayload {
    #[serde(default)]
    cells: Vec<Vec<RichTextItem>>,
}

#[derive(Deserialize)]
struct MediaPayload {
    #[serde(flatten)]
    file: FileObject,
    #[serde(default)]
    caption: Vec<RichTextItem>,
}

#[derive(Deserialize)]
struct UrlPayload {
    url: ValidatedUrl,
    #[serde(default)]
    caption: Vec<RichTextItem>,
}

#[derive(Deserialize)]
struct TitlePayload {
    #[serde(default)]
    title: String,
}

#[derive(Deserialize)]
struct SyncedPayload {
    #[serde(default)]
    synced_from: Option<SyncedFrom>,
}

/// Dispatches on the block type discriminant and builds the typed block.
fn build_block(
    common: BlockCommon,
    block_type: &str,
    payload: Value,
) -> Result<Block, serde_json::Error> {
    use serde_json::from_value;

    Ok(match block_type {
        "paragraph" => Block::Paragraph(ParagraphBlock {
            common,
            content: from_value(payload)?,
        }),
        "heading_1" => Block::Heading1(Heading1Block {
            common,
            content: from_value(payload)?,
        }),
        "heading_2" => Block::Heading2(Heading2Block {
            common,
            content: from_value(payload)?,
        }),
        "heading_3" => Block::Heading3(Heading3Block {
            common,
            content: from_value(payload)?,
        }),
        "bulleted_list_item" => Block::BulletedListItem(BulletedListItemBlock {
            common,
            content: from_value(payload)?,
        }),
        "numbered_list_item" => Block::NumberedListItem(NumberedListItemBlock {
            common,
            content: from_value(payload)?,
        }),
        "to_do" => {
            let p: ToDoPayload = from_value(payload)?;
            Block::ToDo(ToDoBlock {
                common,
                content: p.content,
                checked: p.checked,
            })
        }
        "toggle" => Block::Toggle(ToggleBlock {
            common,
            content: from_value(payload)?,
        }),
        "quote" => Block::Quote(QuoteBlock {
            common,
            content: from_value(payload)?,
        }),
        "callout" => {
            let p: CalloutPayload = from_value(payload)?;
            Block::Callout(CalloutBlock {
                common,
                icon: p.icon,
                content: p.content,
            })
        }
        "code" => {
            let p: CodePayload = from_value(payload)?;
            Block::Code(CodeBlock {
                common,
                language: p.language,
                caption: p.caption,
                content: p.content,
            })
        }
        "equation" => Block::Equation(EquationBlock {
            common,
            expression: payload
                .get("expression")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }),
        "divider" => Block::Divider(DividerBlock { common }),
        "breadcrumb" => Block::Breadcrumb(BreadcrumbBlock { common }),
        "table_of_contents" => Block::TableOfContents(TableOfContentsBlock { common }),
        "image" => {
            let p: MediaPayload = from_value(payload)?;
            Block::Image(ImageBlock {
                common,
                image: p.file,
                caption: p.caption,
            })
        }
        "video" => {
            let p: MediaPayload = from_value(payload)?;
            Block::Video(VideoBlock {
                common,
                video: p.file,
                caption: p.caption,
            })
        }
        "audio" => {
            let p: MediaPayload = from_value(payload)?;
            Block::Audio(AudioBlock {
                common,
                audio: p.file,
                caption: p.caption,
            })
        }
        "file" => {
            let p: MediaPayload = from_value(payload)?;
            Block::File(FileBlock {
                common,
                file: p.file,
                caption: p.caption,
            })
        }
        "pdf" => {
            let p: MediaPayload = from_value(payload)?;
            Block::Pdf(PdfBlock {
                common,
                pdf: p.file,
                caption: p.caption,
            })
        }
        "bookmark" => {
            let p: UrlPayload = from_value(payload)?;
            Block::Bookmark(BookmarkBlock {
                common,
                url: p.url,
                caption: p.caption,
            })
        }
        "embed" => {
            let p: UrlPayload = from_value(payload)?;
            Block::Embed(EmbedBlock {
                common,
                url: p.url,
            })
        }
        "child_page" => {
            let p: TitlePayload = from_value(payload)?;
            Block::ChildPage(ChildPageBlock {
                common,
                title: p.title,
            })
        }
        "child_database" => {
            let p: TitlePayload = from_value(payload)?;
            Block::ChildDatabase(ChildDatabaseBlock {
                common,
                title: p.title,
            })
        }
        "table" => {
            let p: TablePayload = from_value(payload)?;
            Block::Table(TableBlock {
                common,
                table_width: p.table_width,
                has_column_header: p.has_column_header,
                has_row_header: p.has_row_header,
            })
        }
        "table_row" => {
            let p: TableRowPayload = from_value(payload)?;
            Block::TableRow(TableRowBlock {
                common,
                cells: p.cells,
            })
        }
        "column_list" => Block::ColumnList(ColumnListBlock { common }),
        "column" => Block::Column(ColumnBlock { common }),
        "synced_block" => {
            let p: SyncedPayload = from_value(payload)?;
            Block::Synced(SyncedBlock {
                common,
                synced_from: p.synced_from,
            })
        }
        "template" => Block::Template(TemplateBlock {
            common,
            content: from_value(payload)?,
        }),
        "link_preview" => {
            let p: UrlPayload = from_value(payload)?;
            Block::LinkPreview(LinkPreviewBlock {
                common,
                url: p.url,
            })
        }
        other => {
            return Err(<serde_json::Error as serde::de::Error>::custom(format!(
                "unrecognized block type '{}'",
                other
            )))
        }
    })
}
