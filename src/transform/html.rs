//! HTML helpers shared by the tree transforms

use crate::mdast::{Block, Inline};

/// Escape the five HTML-significant characters
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

/// Concatenated text and inline-code values, formatting ignored
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        push_plain_text(&mut out, inline);
    }
    out
}

fn push_plain_text(out: &mut String, inline: &Inline) {
    match inline {
        Inline::Text(value) | Inline::InlineCode(value) => out.push_str(value),
        other => {
            if let Some(children) = other.children() {
                for child in children {
                    push_plain_text(out, child);
                }
            }
        }
    }
}

/// Render phrasing content to HTML, keeping basic formatting
pub fn render_inline(inlines: &[Inline]) -> String {
    inlines.iter().map(render_inline_node).collect()
}

fn render_inline_node(inline: &Inline) -> String {
    match inline {
        Inline::Text(value) => escape_html(value),
        Inline::InlineCode(value) => format!("<code>{}</code>", escape_html(value)),
        Inline::Strong(children) => format!("<strong>{}</strong>", render_inline(children)),
        Inline::Emphasis(children) => format!("<em>{}</em>", render_inline(children)),
        Inline::Link { url, children, .. } => format!(
            r#"<a href="{}">{}</a>"#,
            escape_html(url),
            render_inline(children)
        ),
        other => other.children().map(render_inline).unwrap_or_default(),
    }
}

/// Render a block's nested phrasing content as one inline run.
///
/// Used for list items, where all nested blocks collapse into the `<li>`.
pub fn render_block_inline(block: &Block) -> String {
    match block {
        Block::Paragraph { children } | Block::Heading { children, .. } => render_inline(children),
        Block::List(list) => list
            .children
            .iter()
            .flat_map(|item| item.children.iter())
            .map(render_block_inline)
            .collect(),
        Block::Blockquote { children } | Block::FootnoteDefinition { children, .. } => {
            children.iter().map(render_block_inline).collect()
        }
        Block::Table(table) => table
            .rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .map(|cell| render_inline(cell))
            .collect(),
        Block::Code(_) | Block::Html { .. } | Block::ThematicBreak => String::new(),
    }
}
