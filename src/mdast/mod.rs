//! Markdown abstract syntax tree
//!
//! A small mdast-shaped tree: parent nodes own their children, leaves hold
//! their raw text. The tree is built by [`parse`], rewritten in place by the
//! passes in [`crate::transform`], and written out by [`html::HtmlWriter`].

pub mod html;
mod parse;

pub use parse::parse;

/// Document root
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Root {
    pub children: Vec<Block>,
}

/// Block-level node
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph { children: Vec<Inline> },
    Heading { depth: u8, children: Vec<Inline> },
    Code(Code),
    List(List),
    Blockquote { children: Vec<Block> },
    Table(Table),
    /// Raw HTML, written out verbatim
    Html { value: String },
    ThematicBreak,
    /// `[^label]: …` definition
    FootnoteDefinition { label: String, children: Vec<Block> },
}

/// Fenced or indented code block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Code {
    /// First word of the fence info string
    pub lang: Option<String>,
    /// Rest of the fence info string
    pub meta: Option<String>,
    pub value: String,
}

/// Ordered or unordered list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct List {
    pub ordered: bool,
    pub start: Option<u64>,
    pub children: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListItem {
    /// Task list state, `None` for a plain item
    pub checked: Option<bool>,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    None,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub align: Vec<Align>,
    /// First row is the header row
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub cells: Vec<Vec<Inline>>,
}

/// Phrasing (inline) node
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    InlineCode(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
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
    Html(String),
    Break,
    /// `[^label]` reference
    FootnoteReference(String),
}

impl Inline {
    /// Nested phrasing content, if this kind has any
    pub fn children(&self) -> Option<&[Inline]> {
        match self {
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::Delete(children)
            | Inline::Link { children, .. } => Some(children),
            Inline::Text(_)
            | Inline::InlineCode(_)
            | Inline::Image { .. }
            | Inline::Html(_)
            | Inline::Break
            | Inline::FootnoteReference(_) => None,
        }
    }
}

impl Root {
    pub fn new(children: Vec<Block>) -> Self {
        Self { children }
    }

    /// Visit every code block in the tree, at any depth
    pub fn visit_code_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Code),
    {
        for block in &mut self.children {
            visit_block_code(block, &mut f);
        }
    }
}

fn visit_block_code<F>(block: &mut Block, f: &mut F)
where
    F: FnMut(&mut Code),
{
    match block {
        Block::Code(code) => f(code),
        Block::List(list) => {
            for item in &mut list.children {
                for child in &mut item.children {
                    visit_block_code(child, f);
                }
            }
        }
        Block::Blockquote { children } | Block::FootnoteDefinition { children, .. } => {
            for child in children {
                visit_block_code(child, f);
            }
        }
        Block::Paragraph { .. }
        | Block::Heading { .. }
        | Block::Table(_)
        | Block::Html { .. }
        | Block::ThematicBreak => {}
    }
}

/// Convenience constructors, mostly for building trees by hand in tests
impl Block {
    pub fn paragraph(text: &str) -> Self {
        Block::Paragraph {
            children: vec![Inline::Text(text.to_string())],
        }
    }

    pub fn code(lang: Option<&str>, value: &str) -> Self {
        Block::Code(Code {
            lang: lang.map(str::to_string),
            meta: None,
            value: value.to_string(),
        })
    }

    pub fn html(value: impl Into<String>) -> Self {
        Block::Html {
            value: value.into(),
        }
    }
}
