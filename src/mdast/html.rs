//! Serialize an mdast tree to an HTML fragment

use indexmap::IndexMap;

use super::{Align, Block, Code, Inline, List, Root, Table};
use crate::transform::html::escape_html;

/// Renders code blocks for [`HtmlWriter`]
pub trait CodeRenderer {
    fn render_code(&self, code: &Code) -> String;
}

/// Plain `<pre><code>` output, no highlighting
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCode;

impl CodeRenderer for PlainCode {
    fn render_code(&self, code: &Code) -> String {
        match code.lang.as_deref().filter(|lang| !lang.is_empty()) {
            Some(lang) => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(&code.value)
            ),
            None => format!("<pre><code>{}</code></pre>", escape_html(&code.value)),
        }
    }
}

/// Writes block and inline nodes as HTML
pub struct HtmlWriter<'a> {
    code: &'a dyn CodeRenderer,
    out: String,
    /// Footnote label → number, in order of first appearance
    footnotes: IndexMap<String, usize>,
}

impl<'a> HtmlWriter<'a> {
    pub fn new(code: &'a dyn CodeRenderer) -> Self {
        Self {
            code,
            out: String::new(),
            footnotes: IndexMap::new(),
        }
    }

    /// Write a whole document
    pub fn write(mut self, root: &Root) -> String {
        self.blocks(&root.children);
        self.out
    }

    fn blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.block(block);
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Paragraph { children } => {
                self.out.push_str("<p>");
                self.inlines(children);
                self.out.push_str("</p>\n");
            }
            Block::Heading { depth, children } => {
                let depth = (*depth).clamp(1, 6);
                self.out.push_str(&format!("<h{}>", depth));
                self.inlines(children);
                self.out.push_str(&format!("</h{}>\n", depth));
            }
            Block::Code(code) => {
                self.out.push_str(&self.code.render_code(code));
                self.out.push('\n');
            }
            Block::List(list) => self.list(list),
            Block::Blockquote { children } => {
                self.out.push_str("<blockquote>\n");
                self.blocks(children);
                self.out.push_str("</blockquote>\n");
            }
            Block::Table(table) => self.table(table),
            Block::Html { value } => {
                self.out.push_str(value);
                if !value.ends_with('\n') {
                    self.out.push('\n');
                }
            }
            Block::ThematicBreak => self.out.push_str("<hr />\n"),
            Block::FootnoteDefinition { label, children } => {
                let number = self.footnote_number(label);
                self.out.push_str(&format!(
                    "<div class=\"footnote-definition\" id=\"fn-{}\"><sup class=\"footnote-definition-label\">{}</sup>\n",
                    escape_html(label),
                    number
                ));
                self.blocks(children);
                self.out.push_str("</div>\n");
            }
        }
    }

    fn footnote_number(&mut self, label: &str) -> usize {
        let next = self.footnotes.len() + 1;
        *self.footnotes.entry(label.to_string()).or_insert(next)
    }

    fn list(&mut self, list: &List) {
        match (list.ordered, list.start) {
            (true, Some(start)) if start != 1 => {
                self.out.push_str(&format!("<ol start=\"{}\">\n", start))
            }
            (true, _) => self.out.push_str("<ol>\n"),
            (false, _) => self.out.push_str("<ul>\n"),
        }

        for item in &list.children {
            self.out.push_str("<li>");
            if let Some(checked) = item.checked {
                self.out.push_str(if checked {
                    r#"<input disabled="" type="checkbox" checked="" /> "#
                } else {
                    r#"<input disabled="" type="checkbox" /> "#
                });
            }
            // Single-paragraph items render tight
            match item.children.as_slice() {
                [Block::Paragraph { children }] => self.inlines(children),
                children => {
                    self.out.push('\n');
                    self.blocks(children);
                }
            }
            self.out.push_str("</li>\n");
        }

        self.out
            .push_str(if list.ordered { "</ol>\n" } else { "</ul>\n" });
    }

    fn table(&mut self, table: &Table) {
        self.out.push_str("<table>\n");
        for (row_index, row) in table.rows.iter().enumerate() {
            let cell_tag = if row_index == 0 { "th" } else { "td" };
            if row_index == 0 {
                self.out.push_str("<thead>\n");
            } else if row_index == 1 {
                self.out.push_str("<tbody>\n");
            }
            self.out.push_str("<tr>");
            for (col, cell) in row.cells.iter().enumerate() {
                match table.align.get(col).copied().unwrap_or(Align::None) {
                    Align::None => self.out.push_str(&format!("<{}>", cell_tag)),
                    align => self.out.push_str(&format!(
                        "<{} style=\"text-align: {}\">",
                        cell_tag,
                        align_name(align)
                    )),
                }
                self.inlines(cell);
                self.out.push_str(&format!("</{}>", cell_tag));
            }
            self.out.push_str("</tr>\n");
            if row_index == 0 {
                self.out.push_str("</thead>\n");
            }
        }
        if table.rows.len() > 1 {
            self.out.push_str("</tbody>\n");
        }
        self.out.push_str("</table>\n");
    }

    fn inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            self.inline(inline);
        }
    }

    fn inline(&mut self, inline: &Inline) {
        match inline {
            Inline::Text(value) => self.out.push_str(&escape_html(value)),
            Inline::InlineCode(value) => {
                self.out
                    .push_str(&format!("<code>{}</code>", escape_html(value)));
            }
            Inline::Strong(children) => self.wrap("strong", children),
            Inline::Emphasis(children) => self.wrap("em", children),
            Inline::Delete(children) => self.wrap("del", children),
            Inline::Link {
                url,
                title,
                children,
            } => {
                self.out.push_str(&format!("<a href=\"{}\"", escape_html(url)));
                if let Some(title) = title {
                    self.out
                        .push_str(&format!(" title=\"{}\"", escape_html(title)));
                }
                self.out.push('>');
                self.inlines(children);
                self.out.push_str("</a>");
            }
            Inline::Image { url, title, alt } => {
                self.out.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\"",
                    escape_html(url),
                    escape_html(alt)
                ));
                if let Some(title) = title {
                    self.out
                        .push_str(&format!(" title=\"{}\"", escape_html(title)));
                }
                self.out.push_str(" />");
            }
            Inline::Html(value) => self.out.push_str(value),
            Inline::Break => self.out.push_str("<br />\n"),
            Inline::FootnoteReference(label) => {
                let number = self.footnote_number(label);
                self.out.push_str(&format!(
                    "<sup class=\"footnote-reference\"><a href=\"#fn-{}\">{}</a></sup>",
                    escape_html(label),
                    number
                ));
            }
        }
    }

    fn wrap(&mut self, tag: &str, children: &[Inline]) {
        self.out.push_str(&format!("<{}>", tag));
        self.inlines(children);
        self.out.push_str(&format!("</{}>", tag));
    }
}

fn align_name(align: Align) -> &'static str {
    match align {
        Align::Left => "left",
        Align::Center => "center",
        Align::Right => "right",
        Align::None => "",
    }
}

/// Serialize with plain code blocks
pub fn to_html(root: &Root) -> String {
    HtmlWriter::new(&PlainCode).write(root)
}
