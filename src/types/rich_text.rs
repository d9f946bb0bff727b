//! Inline rich text runs as returned by the Notion API.
//!
//! Every rich text variant (text, mention, equation) carries a
//! `plain_text` fallback, which is what the HTML formatter renders.
//! The type-specific payloads are not modeled; `plain_text` plus the
//! annotations and `href` are sufficient for display.

use super::Color;
use serde::{Deserialize, Serialize};

/// Rich text item with formatting annotations.
///
/// Deserializes directly from the API's rich text objects; fields the
/// display layer doesn't need (the `text`/`mention`/`equation` payloads)
/// are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default)]
    pub href: Option<String>,
}

impl RichTextItem {
    /// Create a plain text run — the most common rich text variant.
    pub fn plain_text(text: &str) -> Self {
        Self {
            plain_text: text.to_string(),
            annotations: Annotations::default(),
            href: None,
        }
    }

    /// Create a run with the given annotations.
    pub fn styled(text: &str, annotations: Annotations) -> Self {
        Self {
            plain_text: text.to_string(),
            annotations,
            href: None,
        }
    }

    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }
}

/// Independent boolean style flags for a rich text run.
///
/// All flags may combine; the formatter applies them in a fixed order so
/// nesting is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
    #[serde(default)]
    pub color: Color,
}

/// Concatenates the plain text of a run sequence, for titles and captions.
pub fn plain_text_of(items: &[RichTextItem]) -> String {
    items.iter().map(|i| i.plain_text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_shape() {
        let json = r#"{
            "type": "text",
            "text": { "content": "hello", "link": null },
            "annotations": {
                "bold": true,
                "italic": false,
                "strikethrough": false,
                "underline": false,
                "code": false,
                "color": "default"
            },
            "plain_text": "hello",
            "href": null
        }"#;

        let item: RichTextItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.plain_text, "hello");
        assert!(item.annotations.bold);
        assert!(!item.annotations.italic);
        assert!(item.href.is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let item: RichTextItem = serde_json::from_str("{}").unwrap();
        assert_eq!(item.plain_text, "");
        assert_eq!(item.annotations, Annotations::default());
    }

    #[test]
    fn test_plain_text_of() {
        let runs = vec![
            RichTextItem::plain_text("Hello, "),
            RichTextItem::plain_text("world"),
        ];
        assert_eq!(plain_text_of(&runs), "Hello, world");
    }
}
