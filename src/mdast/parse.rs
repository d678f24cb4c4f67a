//! Build an mdast tree from pulldown-cmark events

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag};

use super::{Align, Block, Code, Inline, List, ListItem, Root, Table, TableRow};

/// Parse markdown source into a [`Root`]
pub fn parse(markdown: &str) -> Root {
    // No YAML metadata blocks: front-matter is stripped before we get here
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(markdown, options) {
        builder.event(event);
    }
    builder.finish()
}

/// An open container while events stream in
enum Frame {
    Root(Vec<Block>),
    Paragraph(Vec<Inline>),
    Heading(u8, Vec<Inline>),
    Blockquote(Vec<Block>),
    FootnoteDefinition(String, Vec<Block>),
    List {
        ordered: bool,
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    Item {
        checked: Option<bool>,
        blocks: Vec<Block>,
        /// Loose phrasing content of a tight item
        inlines: Vec<Inline>,
    },
    Code {
        lang: Option<String>,
        meta: Option<String>,
        value: String,
    },
    HtmlBlock(String),
    Table {
        align: Vec<Align>,
        rows: Vec<TableRow>,
    },
    TableRow(Vec<Vec<Inline>>),
    TableCell(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Delete(Vec<Inline>),
    Link {
        url: String,
        title: Option<String>,
        children: Vec<Inline>,
    },
    Image {
        url: String,
        title: Option<String>,
        alt: String,
    },
    /// Containers we don't model; their content is hoisted into the parent
    Other(Vec<Block>, Vec<Inline>),
}

struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::Root(Vec::new())],
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => match self.stack.last_mut() {
                Some(Frame::Code { value, .. }) => value.push_str(&text),
                Some(Frame::HtmlBlock(value)) => value.push_str(&text),
                Some(Frame::Image { alt, .. }) => alt.push_str(&text),
                _ => self.push_text(&text),
            },
            Event::Code(code) => self.push_inline(Inline::InlineCode(code.to_string())),
            Event::Html(html) => match self.stack.last_mut() {
                Some(Frame::HtmlBlock(value)) => value.push_str(&html),
                _ => self.push_block(Block::Html {
                    value: html.to_string(),
                }),
            },
            Event::InlineHtml(html) => self.push_inline(Inline::Html(html.to_string())),
            Event::FootnoteReference(label) => {
                self.push_inline(Inline::FootnoteReference(label.to_string()))
            }
            Event::SoftBreak => self.push_text("\n"),
            Event::HardBreak => self.push_inline(Inline::Break),
            Event::Rule => self.push_block(Block::ThematicBreak),
            Event::TaskListMarker(done) => {
                let item = self.stack.iter_mut().rev().find_map(|frame| match frame {
                    Frame::Item { checked, .. } => Some(checked),
                    _ => None,
                });
                if let Some(checked) = item {
                    *checked = Some(done);
                }
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph(Vec::new()),
            Tag::Heading { level, .. } => Frame::Heading(level as u8, Vec::new()),
            Tag::BlockQuote(_) => Frame::Blockquote(Vec::new()),
            Tag::FootnoteDefinition(label) => {
                Frame::FootnoteDefinition(label.to_string(), Vec::new())
            }
            Tag::CodeBlock(kind) => {
                let (lang, meta) = match kind {
                    CodeBlockKind::Fenced(info) => split_info_string(&info),
                    CodeBlockKind::Indented => (None, None),
                };
                Frame::Code {
                    lang,
                    meta,
                    value: String::new(),
                }
            }
            Tag::HtmlBlock => Frame::HtmlBlock(String::new()),
            Tag::List(start) => Frame::List {
                ordered: start.is_some(),
                start,
                items: Vec::new(),
            },
            Tag::Item => Frame::Item {
                checked: None,
                blocks: Vec::new(),
                inlines: Vec::new(),
            },
            Tag::Table(alignments) => Frame::Table {
                align: alignments.into_iter().map(convert_alignment).collect(),
                rows: Vec::new(),
            },
            Tag::TableHead | Tag::TableRow => Frame::TableRow(Vec::new()),
            Tag::TableCell => Frame::TableCell(Vec::new()),
            Tag::Emphasis => Frame::Emphasis(Vec::new()),
            Tag::Strong => Frame::Strong(Vec::new()),
            Tag::Strikethrough => Frame::Delete(Vec::new()),
            Tag::Link {
                dest_url, title, ..
            } => Frame::Link {
                url: dest_url.to_string(),
                title: non_empty(&title),
                children: Vec::new(),
            },
            Tag::Image {
                dest_url, title, ..
            } => Frame::Image {
                url: dest_url.to_string(),
                title: non_empty(&title),
                alt: String::new(),
            },
            _ => Frame::Other(Vec::new(), Vec::new()),
        };
        self.stack.push(frame);
    }

    fn end(&mut self) {
        // The root frame is never popped by an end event
        if self.stack.len() < 2 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };

        match frame {
            Frame::Root(children) => self.stack.push(Frame::Root(children)),
            Frame::Paragraph(children) => self.push_block(Block::Paragraph { children }),
            Frame::Heading(depth, children) => self.push_block(Block::Heading { depth, children }),
            Frame::Blockquote(children) => self.push_block(Block::Blockquote { children }),
            Frame::FootnoteDefinition(label, children) => {
                self.push_block(Block::FootnoteDefinition { label, children })
            }
            Frame::List {
                ordered,
                start,
                items,
            } => self.push_block(Block::List(List {
                ordered,
                start,
                children: items,
            })),
            Frame::Item {
                checked,
                mut blocks,
                inlines,
            } => {
                flush_inlines(&mut blocks, inlines);
                if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
                    items.push(ListItem {
                        checked,
                        children: blocks,
                    });
                }
            }
            Frame::Code {
                lang,
                meta,
                mut value,
            } => {
                if value.ends_with('\n') {
                    value.pop();
                }
                self.push_block(Block::Code(Code { lang, meta, value }));
            }
            Frame::HtmlBlock(value) => self.push_block(Block::Html { value }),
            Frame::Table { align, rows } => self.push_block(Block::Table(Table { align, rows })),
            Frame::TableRow(cells) => {
                if let Some(Frame::Table { rows, .. }) = self.stack.last_mut() {
                    rows.push(TableRow { cells });
                }
            }
            Frame::TableCell(children) => {
                if let Some(Frame::TableRow(cells)) = self.stack.last_mut() {
                    cells.push(children);
                }
            }
            Frame::Emphasis(children) => self.push_inline(Inline::Emphasis(children)),
            Frame::Strong(children) => self.push_inline(Inline::Strong(children)),
            Frame::Delete(children) => self.push_inline(Inline::Delete(children)),
            Frame::Link {
                url,
                title,
                children,
            } => self.push_inline(Inline::Link {
                url,
                title,
                children,
            }),
            Frame::Image { url, title, alt } => self.push_inline(Inline::Image { url, title, alt }),
            Frame::Other(blocks, inlines) => {
                for block in blocks {
                    self.push_block(block);
                }
                for inline in inlines {
                    self.push_inline(inline);
                }
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(children) = self.inline_target() {
            append_text(children, text);
        } else {
            self.push_block(Block::Paragraph {
                children: vec![Inline::Text(text.to_string())],
            });
        }
    }

    fn push_inline(&mut self, inline: Inline) {
        if let Some(Frame::Image { alt, .. }) = self.stack.last_mut() {
            alt.push_str(&plain_text(&inline));
            return;
        }
        if let Some(children) = self.inline_target() {
            match inline {
                Inline::Text(text) => append_text(children, &text),
                other => children.push(other),
            }
        } else {
            self.push_block(Block::Paragraph {
                children: vec![inline],
            });
        }
    }

    /// Phrasing content list of the innermost frame, if it takes any
    fn inline_target(&mut self) -> Option<&mut Vec<Inline>> {
        match self.stack.last_mut()? {
            Frame::Paragraph(children)
            | Frame::Heading(_, children)
            | Frame::TableCell(children)
            | Frame::Emphasis(children)
            | Frame::Strong(children)
            | Frame::Delete(children)
            | Frame::Link { children, .. }
            | Frame::Item {
                inlines: children, ..
            }
            | Frame::Other(_, children) => Some(children),
            _ => None,
        }
    }

    fn push_block(&mut self, block: Block) {
        for frame in self.stack.iter_mut().rev() {
            match frame {
                Frame::Root(children)
                | Frame::Blockquote(children)
                | Frame::FootnoteDefinition(_, children)
                | Frame::Other(children, _) => {
                    children.push(block);
                    return;
                }
                Frame::Item {
                    blocks, inlines, ..
                } => {
                    flush_inlines(blocks, std::mem::take(inlines));
                    blocks.push(block);
                    return;
                }
                _ => continue,
            }
        }
    }

    fn finish(mut self) -> Root {
        while self.stack.len() > 1 {
            self.end();
        }
        match self.stack.pop() {
            Some(Frame::Root(children)) => Root { children },
            _ => Root::default(),
        }
    }
}

/// Split a fence info string the way mdast does: first word is the
/// language, the rest is meta
fn split_info_string(info: &str) -> (Option<String>, Option<String>) {
    let info = info.trim();
    if info.is_empty() {
        return (None, None);
    }
    match info.split_once(char::is_whitespace) {
        Some((lang, meta)) => (Some(lang.to_string()), non_empty(meta.trim())),
        None => (Some(info.to_string()), None),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn append_text(children: &mut Vec<Inline>, text: &str) {
    if let Some(Inline::Text(last)) = children.last_mut() {
        last.push_str(text);
    } else {
        children.push(Inline::Text(text.to_string()));
    }
}

/// Wrap a tight list item's phrasing content in a paragraph
fn flush_inlines(blocks: &mut Vec<Block>, inlines: Vec<Inline>) {
    if !inlines.is_empty() {
        blocks.push(Block::Paragraph { children: inlines });
    }
}

fn plain_text(inline: &Inline) -> String {
    match inline {
        Inline::Text(text) | Inline::InlineCode(text) => text.clone(),
        other => other
            .children()
            .map(|children| children.iter().map(plain_text).collect())
            .unwrap_or_default(),
    }
}

fn convert_alignment(alignment: Alignment) -> Align {
    match alignment {
        Alignment::None => Align::None,
        Alignment::Left => Align::Left,
        Alignment::Center => Align::Center,
        Alignment::Right => Align::Right,
    }
}
