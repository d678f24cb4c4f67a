//! Callout containers
//!
//! ```markdown
//! :::note Optional title
//!
//! Body paragraphs, code blocks and lists.
//!
//! :::
//! ```
//!
//! The open marker, the body and the close marker must each be their own
//! paragraph (blank lines between them). A matched span of top-level
//! children is replaced by a single raw HTML block:
//!
//! ```html
//! <div class="callout callout-note">
//! <div class="callout-title">ℹ️ Optional title</div>
//! <div class="callout-content">
//! <p>Body paragraphs, code blocks and lists.</p>
//! </div>
//! </div>
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

use crate::mdast::{Block, List, Root};

use super::html::{escape_html, plain_text, render_block_inline, render_inline};
use super::Transform;

lazy_static! {
    /// Must match the whole paragraph text
    static ref OPEN_PATTERN: Regex =
        Regex::new(r"^:::(note|tip|warning|caution|important)(?:\s+(.*))?$")
            .expect("callout open pattern is valid");
}

const CLOSE_MARKER: &str = ":::";

/// The fixed set of callout kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalloutType {
    Note,
    Tip,
    Warning,
    Caution,
    Important,
}

impl CalloutType {
    pub const ALL: [CalloutType; 5] = [
        CalloutType::Note,
        CalloutType::Tip,
        CalloutType::Warning,
        CalloutType::Caution,
        CalloutType::Important,
    ];

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "note" => Some(Self::Note),
            "tip" => Some(Self::Tip),
            "warning" => Some(Self::Warning),
            "caution" => Some(Self::Caution),
            "important" => Some(Self::Important),
            _ => None,
        }
    }

    /// Keyword used in the marker and the CSS class
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Warning => "warning",
            Self::Caution => "caution",
            Self::Important => "important",
        }
    }

    /// Default title
    pub fn label(&self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Tip => "Tip",
            Self::Warning => "Warning",
            Self::Caution => "Caution",
            Self::Important => "Important",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Note => "ℹ️",
            Self::Tip => "💡",
            Self::Warning => "⚠️",
            Self::Caution => "🚨",
            Self::Important => "❗",
        }
    }
}

impl fmt::Display for CalloutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A matched `[start_index, end_index]` span of top-level children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalloutContainer {
    /// Index of the open marker paragraph
    pub start_index: usize,
    /// Index of the close marker paragraph
    pub end_index: usize,
    pub kind: CalloutType,
    pub title: Option<String>,
}

impl CalloutContainer {
    /// Explicit title, or the kind's label
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => self.kind.label(),
        }
    }
}

/// What a paragraph means to the scanner
#[derive(Debug, PartialEq)]
enum Marker {
    Open {
        kind: CalloutType,
        title: Option<String>,
    },
    Close,
    Content,
}

impl Marker {
    fn classify(text: &str) -> Self {
        if text == CLOSE_MARKER {
            return Marker::Close;
        }
        let Some(caps) = OPEN_PATTERN.captures(text) else {
            return Marker::Content;
        };
        let Some(kind) = caps.get(1).and_then(|m| CalloutType::from_keyword(m.as_str())) else {
            return Marker::Content;
        };
        let title = caps
            .get(2)
            .map(|m| m.as_str().to_string())
            .filter(|title| !title.is_empty());
        Marker::Open { kind, title }
    }
}

#[derive(Debug)]
enum ScanState {
    Idle,
    AwaitingClose {
        start_index: usize,
        kind: CalloutType,
        title: Option<String>,
    },
}

/// Find all well-formed containers among `children`, in document order.
///
/// One container can be open at a time. An open marker seen while one is
/// already open is ordinary body content; a close marker with nothing open
/// is an ordinary paragraph; an open marker never closed is dropped.
pub fn find_containers(children: &[Block]) -> Vec<CalloutContainer> {
    let mut containers = Vec::new();
    let mut state = ScanState::Idle;

    for (index, node) in children.iter().enumerate() {
        let Block::Paragraph { children: inlines } = node else {
            continue;
        };
        let text = plain_text(inlines);

        state = match (state, Marker::classify(text.trim())) {
            (ScanState::Idle, Marker::Open { kind, title }) => ScanState::AwaitingClose {
                start_index: index,
                kind,
                title,
            },
            (
                ScanState::AwaitingClose {
                    start_index,
                    kind,
                    title,
                },
                Marker::Close,
            ) => {
                containers.push(CalloutContainer {
                    start_index,
                    end_index: index,
                    kind,
                    title,
                });
                ScanState::Idle
            }
            (state, _) => state,
        };
    }

    if let ScanState::AwaitingClose {
        start_index, kind, ..
    } = state
    {
        tracing::debug!(start_index, %kind, "dropping unclosed callout");
    }

    containers
}

/// Render the HTML block for a container and its body nodes
pub fn render_callout(container: &CalloutContainer, body: &[Block]) -> String {
    let content = body
        .iter()
        .map(render_body_node)
        .filter(|html| !html.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<div class=\"callout callout-{kind}\">\n\
         <div class=\"callout-title\">{icon} {title}</div>\n\
         <div class=\"callout-content\">\n\
         {content}\n\
         </div>\n\
         </div>",
        kind = container.kind,
        icon = container.kind.icon(),
        title = escape_html(container.display_title()),
        content = content,
    )
}

fn render_body_node(node: &Block) -> String {
    match node {
        Block::Paragraph { children } => format!("<p>{}</p>", render_inline(children)),
        Block::Code(code) => format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(code.lang.as_deref().unwrap_or_default()),
            escape_html(&code.value)
        ),
        Block::List(list) => render_list(list),
        // Not carried into callouts
        Block::Heading { .. }
        | Block::Blockquote { .. }
        | Block::Table(_)
        | Block::Html { .. }
        | Block::ThematicBreak
        | Block::FootnoteDefinition { .. } => String::new(),
    }
}

fn render_list(list: &List) -> String {
    let tag = if list.ordered { "ol" } else { "ul" };
    let items: String = list
        .children
        .iter()
        .map(|item| {
            let content: String = item.children.iter().map(render_block_inline).collect();
            format!("<li>{}</li>", content)
        })
        .collect();
    format!("<{tag}>{items}</{tag}>")
}

/// Rewrites `:::type … :::` spans into callout HTML blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct CalloutTransform;

impl Transform for CalloutTransform {
    fn name(&self) -> &'static str {
        "callout"
    }

    fn apply(&self, root: &mut Root) {
        let mut containers = find_containers(&root.children);
        // Later spans first, so earlier indices stay valid
        containers.sort_by(|a, b| b.start_index.cmp(&a.start_index));

        for container in &containers {
            let body = &root.children[container.start_index + 1..container.end_index];
            let html = render_callout(container, body);
            root.children.splice(
                container.start_index..=container.end_index,
                std::iter::once(Block::Html { value: html }),
            );
        }

        if !containers.is_empty() {
            tracing::debug!(count = containers.len(), "rendered callouts");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdast::{Code, Inline, ListItem};
    use pretty_assertions::assert_eq;

    fn transform(mut root: Root) -> Root {
        CalloutTransform.apply(&mut root);
        root
    }

    fn html_of(block: &Block) -> &str {
        match block {
            Block::Html { value } => value,
            other => panic!("expected html block, got {:?}", other),
        }
    }

    #[test]
    fn test_basic_callout() {
        let root = transform(Root::new(vec![
            Block::paragraph(":::note"),
            Block::paragraph("body"),
            Block::paragraph(":::"),
        ]));

        assert_eq!(root.children.len(), 1);
        assert_eq!(
            html_of(&root.children[0]),
            "<div class=\"callout callout-note\">\n\
             <div class=\"callout-title\">ℹ️ Note</div>\n\
             <div class=\"callout-content\">\n\
             <p>body</p>\n\
             </div>\n\
             </div>"
        );
    }

    #[test]
    fn test_child_count_shrinks_by_span() {
        let root = transform(Root::new(vec![
            Block::paragraph("before"),
            Block::paragraph(":::tip Quick tip"),
            Block::paragraph("one"),
            Block::paragraph("two"),
            Block::paragraph(":::"),
            Block::paragraph("after"),
        ]));

        // 6 - (4 - 1)
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0], Block::paragraph("before"));
        let html = html_of(&root.children[1]);
        assert!(html.contains("callout-title"));
        assert!(html.contains("callout-content"));
        assert!(html.contains("💡 Quick tip"));
        assert!(html.contains("<p>one</p>\n<p>two</p>"));
        assert_eq!(root.children[2], Block::paragraph("after"));
    }

    #[test]
    fn test_default_labels() {
        for kind in CalloutType::ALL {
            let root = transform(Root::new(vec![
                Block::paragraph(&format!(":::{}", kind.as_str())),
                Block::paragraph("x"),
                Block::paragraph(":::"),
            ]));
            let html = html_of(&root.children[0]);
            assert!(
                html.contains(&format!("<div class=\"callout callout-{}\">", kind.as_str())),
                "{}",
                html
            );
            assert!(
                html.contains(&format!("{} {}</div>", kind.icon(), kind.label())),
                "{}",
                html
            );
        }
    }

    #[test]
    fn test_dangling_open_is_noop() {
        let input = Root::new(vec![Block::paragraph(":::tip"), Block::paragraph("body")]);
        let root = transform(input.clone());
        assert_eq!(root, input);
    }

    #[test]
    fn test_stray_close_is_noop() {
        let input = Root::new(vec![Block::paragraph("text"), Block::paragraph(":::")]);
        let root = transform(input.clone());
        assert_eq!(root, input);
    }

    #[test]
    fn test_unknown_type_is_not_a_callout() {
        let input = Root::new(vec![
            Block::paragraph(":::danger"),
            Block::paragraph("body"),
            Block::paragraph(":::"),
        ]);
        let root = transform(input.clone());
        assert_eq!(root, input);
    }

    #[test]
    fn test_marker_must_be_whole_paragraph() {
        let input = Root::new(vec![
            Block::paragraph("see :::note"),
            Block::paragraph(":::notes"),
            Block::paragraph(":::note\nline two\nline three"),
            Block::paragraph("::: "),
        ]);
        assert!(find_containers(&input.children).is_empty());
    }

    #[test]
    fn test_markers_are_trimmed() {
        let containers = find_containers(&[
            Block::paragraph("  :::warning   Mind the gap  "),
            Block::paragraph(" ::: "),
        ]);
        assert_eq!(
            containers,
            vec![CalloutContainer {
                start_index: 0,
                end_index: 1,
                kind: CalloutType::Warning,
                title: Some("Mind the gap".to_string()),
            }]
        );
    }

    #[test]
    fn test_marker_text_ignores_formatting() {
        let containers = find_containers(&[
            Block::Paragraph {
                children: vec![
                    Inline::Text(":::important ".into()),
                    Inline::Strong(vec![Inline::Text("Read".into())]),
                    Inline::Text(" ".into()),
                    Inline::InlineCode("this".into()),
                ],
            },
            Block::paragraph(":::"),
        ]);
        assert_eq!(containers[0].title.as_deref(), Some("Read this"));
    }

    #[test]
    fn test_inner_open_marker_is_inert() {
        let root = transform(Root::new(vec![
            Block::paragraph(":::note Outer"),
            Block::paragraph(":::tip Inner"),
            Block::paragraph("body"),
            Block::paragraph(":::"),
            Block::paragraph("tail"),
            Block::paragraph(":::"),
        ]));

        assert_eq!(root.children.len(), 3);
        let html = html_of(&root.children[0]);
        assert!(html.contains("callout-note"));
        assert!(!html.contains("callout-tip"));
        assert!(html.contains("<p>:::tip Inner</p>\n<p>body</p>"));
        assert_eq!(root.children[1], Block::paragraph("tail"));
        assert_eq!(root.children[2], Block::paragraph(":::"));
    }

    #[test]
    fn test_two_containers_are_scoped() {
        let root = transform(Root::new(vec![
            Block::paragraph(":::note First"),
            Block::paragraph("alpha"),
            Block::paragraph(":::"),
            Block::paragraph("between"),
            Block::paragraph(":::caution Second"),
            Block::paragraph("beta"),
            Block::paragraph("gamma"),
            Block::paragraph(":::"),
        ]));

        assert_eq!(root.children.len(), 3);
        let first = html_of(&root.children[0]);
        assert!(first.contains("ℹ️ First"));
        assert!(first.contains("<p>alpha</p>"));
        assert!(!first.contains("beta"));
        assert_eq!(root.children[1], Block::paragraph("between"));
        let second = html_of(&root.children[2]);
        assert!(second.contains("🚨 Second"));
        assert!(second.contains("<p>beta</p>\n<p>gamma</p>"));
        assert!(!second.contains("alpha"));
    }

    #[test]
    fn test_body_text_is_escaped() {
        let root = transform(Root::new(vec![
            Block::paragraph(":::warning <b>Title</b>"),
            Block::paragraph("<script>alert('x')</script>"),
            Block::paragraph(":::"),
        ]));
        let html = html_of(&root.children[0]);
        assert!(html.contains("&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"));
        assert!(html.contains("⚠️ &lt;b&gt;Title&lt;/b&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_body_code_and_lists() {
        let root = transform(Root::new(vec![
            Block::paragraph(":::tip"),
            Block::Code(Code {
                lang: Some("rust".into()),
                meta: Some(r#"data-language="rust""#.into()),
                value: "if a < b {}".into(),
            }),
            Block::code(None, "plain"),
            Block::List(List {
                ordered: true,
                start: Some(1),
                children: vec![
                    ListItem {
                        checked: None,
                        children: vec![Block::Paragraph {
                            children: vec![
                                Inline::Text("first ".into()),
                                Inline::Emphasis(vec![Inline::Text("step".into())]),
                            ],
                        }],
                    },
                    ListItem {
                        checked: None,
                        children: vec![Block::paragraph("second")],
                    },
                ],
            }),
            Block::List(List {
                ordered: false,
                start: None,
                children: vec![ListItem {
                    checked: None,
                    children: vec![Block::paragraph("bullet")],
                }],
            }),
            Block::paragraph(":::"),
        ]));

        let html = html_of(&root.children[0]);
        assert!(html.contains(
            "<pre><code class=\"language-rust\">if a &lt; b {}</code></pre>\n\
             <pre><code class=\"language-\">plain</code></pre>\n\
             <ol><li>first <em>step</em></li><li>second</li></ol>\n\
             <ul><li>bullet</li></ul>"
        ));
    }

    #[test]
    fn test_unsupported_body_nodes_are_dropped() {
        let root = transform(Root::new(vec![
            Block::paragraph(":::note"),
            Block::Heading {
                depth: 2,
                children: vec![Inline::Text("heading".into())],
            },
            Block::paragraph("kept"),
            Block::ThematicBreak,
            Block::FootnoteDefinition {
                label: "1".into(),
                children: vec![Block::paragraph("footnote")],
            },
            Block::paragraph(":::"),
        ]));
        let html = html_of(&root.children[0]);
        assert!(!html.contains("heading"));
        assert!(!html.contains("footnote"));
        assert!(html.contains("<div class=\"callout-content\">\n<p>kept</p>\n</div>"));
    }

    #[test]
    fn test_empty_body() {
        let root = transform(Root::new(vec![
            Block::paragraph(":::important"),
            Block::paragraph(":::"),
        ]));
        assert!(html_of(&root.children[0]).contains("<div class=\"callout-content\">\n\n</div>"));
    }

    #[test]
    fn test_non_paragraph_markers_are_ignored() {
        let input = Root::new(vec![
            Block::code(None, ":::note"),
            Block::paragraph("body"),
            Block::code(None, ":::"),
        ]);
        let root = transform(input.clone());
        assert_eq!(root, input);
    }

    #[test]
    fn test_display_title() {
        let mut container = CalloutContainer {
            start_index: 0,
            end_index: 1,
            kind: CalloutType::Caution,
            title: None,
        };
        assert_eq!(container.display_title(), "Caution");
        container.title = Some(String::new());
        assert_eq!(container.display_title(), "Caution");
        container.title = Some("Careful".into());
        assert_eq!(container.display_title(), "Careful");
    }
}
