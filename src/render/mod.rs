// src/render/mod.rs
//! Block tree rendering — pure transforms from the domain model to HTML.
//!
//! Rendering never performs I/O and never fails: every block, including
//! malformed ones, produces a deterministic fragment (or deliberately
//! nothing, for blocks that only make sense inside a parent).

pub mod html;
pub mod rich_text;

pub use html::{render_block, render_blocks, render_page, RenderContext};
pub use rich_text::{html_escape, rich_text_to_html};
