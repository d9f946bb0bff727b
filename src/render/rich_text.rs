// src/render/rich_text.rs
//! Inline rich text formatting.
//!
//! Each text run is escaped and wrapped in a fixed annotation order so the
//! same input always yields the same markup: code, strikethrough, bold,
//! italic, underline, color, and finally the link around everything.

use crate::types::{Color, RichTextItem};

/// Basic HTML escaping for text content and attribute values.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders an ordered sequence of text runs to inline HTML.
pub fn rich_text_to_html(items: &[RichTextItem]) -> String {
    items.iter().map(render_run).collect()
}

/// Renders one text run with its annotations applied.
fn render_run(item: &RichTextItem) -> String {
    let mut result = html_escape(&item.plain_text);
    let a = &item.annotations;

    // Code binds tightest; everything else wraps around it
    if a.code {
        result = format!("<code>{}</code>", result);
    }
    if a.strikethrough {
        result = format!("<s>{}</s>", result);
    }
    if a.bold {
        result = format!("<strong>{}</strong>", result);
    }
    if a.italic {
        result = format!("<em>{}</em>", result);
    }
    if a.underline {
        result = format!("<u>{}</u>", result);
    }
    if a.color != Color::Default {
        result = format!("<span class=\"{}\">{}</span>", color_css_class(&a.color), result);
    }

    // Link wraps everything so the whole styled run is clickable
    if let Some(href) = &item.href {
        result = format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            html_escape(href),
            result
        );
    }

    result
}

/// CSS class for a non-default text color.
fn color_css_class(color: &Color) -> String {
    let base = color.as_str().trim_end_matches("_background");
    if color.is_background() {
        format!("bg-{}", base)
    } else {
        format!("text-{}", base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Annotations;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(rich_text_to_html(&[]), "");
    }

    #[test]
    fn plain_run_is_escaped() {
        let items = vec![RichTextItem::plain_text("a < b & c")];
        assert_eq!(rich_text_to_html(&items), "a &lt; b &amp; c");
    }

    #[test]
    fn annotations_nest_in_fixed_order() {
        let items = vec![RichTextItem::styled(
            "x",
            Annotations {
                bold: true,
                italic: true,
                code: true,
                ..Default::default()
            },
        )];
        assert_eq!(
            rich_text_to_html(&items),
            "<em><strong><code>x</code></strong></em>"
        );
    }

    #[test]
    fn link_wraps_styled_run() {
        let items = vec![RichTextItem::styled(
            "docs",
            Annotations {
                bold: true,
                ..Default::default()
            },
        )
        .with_href("https://example.com/?a=1&b=2")];
        assert_eq!(
            rich_text_to_html(&items),
            "<a href=\"https://example.com/?a=1&amp;b=2\" target=\"_blank\" rel=\"noopener noreferrer\"><strong>docs</strong></a>"
        );
    }

    #[test]
    fn color_span_only_for_non_default() {
        let items = vec![RichTextItem::styled(
            "warm",
            Annotations {
                color: Color::Red,
                ..Default::default()
            },
        )];
        assert_eq!(rich_text_to_html(&items), "<span class=\"text-red\">warm</span>");

        let items = vec![RichTextItem::styled(
            "marked",
            Annotations {
                color: Color::YellowBackground,
                ..Default::default()
            },
        )];
        assert_eq!(
            rich_text_to_html(&items),
            "<span class=\"bg-yellow\">marked</span>"
        );
    }

    #[test]
    fn runs_stay_in_order() {
        let items = vec![
            RichTextItem::plain_text("one "),
            RichTextItem::styled(
                "two",
                Annotations {
                    bold: true,
                    ..Default::default()
                },
            ),
            RichTextItem::plain_text(" three"),
        ];
        assert_eq!(rich_text_to_html(&items), "one <strong>two</strong> three");
    }
}
