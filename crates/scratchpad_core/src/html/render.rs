//! Block to HTML rendering.
//!
//! # Responsibility
//! - Produce the editable-surface markup that is persisted and re-read.
//!
//! # Invariants
//! - Every piece of document text and every attribute value is escaped.
//! - Output only uses tags and attributes the `restore` sanitizer profile
//!   keeps, so a save/load cycle is lossless.

use crate::model::block::{Block, BlockKind};
use crate::model::inline::{InlineSpan, InlineText};

pub(crate) const TODO_CLASS: &str = "todo-item";
pub(crate) const TODO_TEXT_CLASS: &str = "todo-text";
pub(crate) const CHECKED_CLASS: &str = "checked";
const TODO_CHECKBOX_LABEL: &str = "Mark task complete";

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Renders a whole document.
pub fn render_document(blocks: &[Block]) -> String {
    let mut html = String::new();
    for block in blocks {
        render_block(block, &mut html);
    }
    html
}

/// Renders marked spans; `\n` becomes `<br>`.
pub fn render_inline(content: &InlineText) -> String {
    let mut html = String::new();
    for span in content.spans() {
        render_span(span, &mut html);
    }
    html
}

fn render_span(span: &InlineSpan, html: &mut String) {
    let marks = &span.marks;
    if let Some(href) = &marks.link_href {
        html.push_str(&format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">",
            escape_html(href)
        ));
    }
    if marks.bold {
        html.push_str("<strong>");
    }
    if marks.italic {
        html.push_str("<em>");
    }
    if marks.code {
        html.push_str("<code>");
    }

    let mut lines = span.text.split('\n');
    if let Some(first) = lines.next() {
        html.push_str(&escape_html(first));
    }
    for line in lines {
        html.push_str("<br>");
        html.push_str(&escape_html(line));
    }

    if marks.code {
        html.push_str("</code>");
    }
    if marks.italic {
        html.push_str("</em>");
    }
    if marks.bold {
        html.push_str("</strong>");
    }
    if marks.link_href.is_some() {
        html.push_str("</a>");
    }
}

/// Inline content of an editable block; empty runs and runs ending in a
/// line break get a trailing `<br>` so the line stays addressable.
fn render_editable(content: &InlineText) -> String {
    let mut html = render_inline(content);
    if content.is_empty() || content.plain_text().ends_with('\n') {
        html.push_str("<br>");
    }
    html
}

fn render_block(block: &Block, html: &mut String) {
    match block.kind {
        BlockKind::Text | BlockKind::ListItem => {
            html.push_str("<div>");
            html.push_str(&render_editable(&block.content));
            html.push_str("</div>");
        }
        BlockKind::Heading1 | BlockKind::Heading2 | BlockKind::Heading3 => {
            let level = block.kind.heading_level().unwrap_or(1);
            html.push_str(&format!(
                "<h{level}>{}</h{level}>",
                render_editable(&block.content)
            ));
        }
        BlockKind::BulletList | BlockKind::NumberList => {
            let tag = if block.kind == BlockKind::BulletList {
                "ul"
            } else {
                "ol"
            };
            html.push_str(&format!("<{tag}>"));
            for item in &block.children {
                html.push_str("<li>");
                html.push_str(&render_editable(&item.content));
                html.push_str("</li>");
            }
            html.push_str(&format!("</{tag}>"));
        }
        BlockKind::TodoItem => {
            let (class_suffix, checked_attr) = if block.checked {
                (format!(" {CHECKED_CLASS}"), " checked")
            } else {
                (String::new(), "")
            };
            html.push_str(&format!(
                "<div class=\"{TODO_CLASS}{class_suffix}\">\
                 <input type=\"checkbox\"{checked_attr} contenteditable=\"false\" \
                 aria-label=\"{TODO_CHECKBOX_LABEL}\">\
                 <span class=\"{TODO_TEXT_CLASS}\">{}</span></div>",
                render_inline(&block.content)
            ));
        }
        BlockKind::Quote => {
            html.push_str("<blockquote>");
            html.push_str(&render_editable(&block.content));
            html.push_str("</blockquote>");
        }
        BlockKind::Divider => html.push_str("<hr>"),
        BlockKind::Code => {
            let class = block
                .language
                .as_deref()
                .map(|language| format!(" class=\"language-{}\"", escape_html(language)))
                .unwrap_or_default();
            html.push_str(&format!(
                "<pre><code{class}>{}</code></pre>",
                escape_html(&block.content.plain_text())
            ));
        }
    }
}
