//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use regex::Regex;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::SiteConfig;
use crate::mdast::html::{CodeRenderer, HtmlWriter};
use crate::mdast::{self, Code};
use crate::transform::html::escape_html;
use crate::transform::Pipeline;

const DEFAULT_THEME: &str = "base16-ocean.dark";
const EXCERPT_MARKER: &str = "<!-- more -->";

lazy_static! {
    static ref FILENAME_ATTR: Regex =
        Regex::new(r#"data-filename="([^"]+)""#).expect("filename attribute pattern is valid");
    static ref LANGUAGE_ATTR: Regex =
        Regex::new(r#"data-language="([^"]+)""#).expect("language attribute pattern is valid");
}

/// `data-*` tokens read back out of a code block's meta string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeMeta {
    pub filename: Option<String>,
    pub language: Option<String>,
}

impl CodeMeta {
    /// Extract `data-filename="…"` and `data-language="…"` (non-empty values only)
    pub fn parse(meta: Option<&str>) -> Self {
        let Some(meta) = meta else {
            return Self::default();
        };
        let capture = |re: &Regex| {
            re.captures(meta)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        };
        Self {
            filename: capture(&FILENAME_ATTR),
            language: capture(&LANGUAGE_ATTR),
        }
    }
}

/// Human-readable name for a code fence language tag
pub fn language_display_name(lang: &str) -> Option<&'static str> {
    let name = match lang.to_ascii_lowercase().as_str() {
        "js" | "javascript" => "JavaScript",
        "ts" | "typescript" => "TypeScript",
        "jsx" => "JSX",
        "tsx" => "TSX",
        "html" => "HTML",
        "css" => "CSS",
        "scss" => "SCSS",
        "sass" => "Sass",
        "less" => "Less",
        "json" => "JSON",
        "yaml" | "yml" => "YAML",
        "xml" => "XML",
        "md" | "markdown" => "Markdown",
        "mdx" => "MDX",
        "py" | "python" => "Python",
        "rb" | "ruby" => "Ruby",
        "go" => "Go",
        "rs" | "rust" => "Rust",
        "java" => "Java",
        "kt" | "kotlin" => "Kotlin",
        "swift" => "Swift",
        "c" => "C",
        "cpp" | "c++" => "C++",
        "cs" | "csharp" => "C#",
        "php" => "PHP",
        "sql" => "SQL",
        "gql" | "graphql" => "GraphQL",
        "bash" => "Bash",
        "sh" | "shell" => "Shell",
        "zsh" => "Zsh",
        "ps1" | "powershell" => "PowerShell",
        "dockerfile" => "Dockerfile",
        "docker" => "Docker",
        "nginx" => "Nginx",
        "apache" => "Apache",
        "astro" => "Astro",
        "vue" => "Vue",
        "svelte" => "Svelte",
        "diff" => "Diff",
        "text" | "txt" => "Text",
        "plaintext" => "Plain Text",
        _ => return None,
    };
    Some(name)
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
    line_numbers: bool,
    pipeline: Pipeline,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(DEFAULT_THEME, true)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme: load_theme(theme),
            line_numbers,
            pipeline: Pipeline::default(),
        }
    }

    /// Create from the `highlight` and `markdown` config sections
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::with_options(&config.highlight.theme, config.highlight.line_number)
            .with_pipeline(Pipeline::from_config(&config.markdown))
    }

    /// Replace the transform pipeline
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let mut root = mdast::parse(markdown);
        self.pipeline.run(&mut root);
        HtmlWriter::new(self).write(&root)
    }

    /// Split content at `<!-- more -->`.
    /// Returns (excerpt, content without the marker)
    pub fn split_excerpt(content: &str) -> (Option<String>, String) {
        match content.split_once(EXCERPT_MARKER) {
            Some((excerpt, rest)) => {
                let excerpt = excerpt.trim().to_string();
                let full = format!("{}\n\n{}", excerpt, rest.trim());
                (Some(excerpt), full)
            }
            None => (None, content.to_string()),
        }
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        match highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme) {
            Ok(highlighted) => {
                if self.line_numbers {
                    self.add_line_numbers(code, &highlighted)
                } else {
                    highlighted
                }
            }
            Err(e) => {
                tracing::warn!("Failed to highlight {} code block: {}", lang, e);
                // Fallback to plain code block
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    escape_html(lang),
                    escape_html(code)
                )
            }
        }
    }

    /// Add a line number gutter next to highlighted code
    fn add_line_numbers(&self, code: &str, highlighted: &str) -> String {
        let line_count = code.lines().count().max(1);

        let gutter = (1..=line_count)
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table>"#,
            gutter, highlighted
        )
    }
}

impl CodeRenderer for MarkdownRenderer {
    fn render_code(&self, code: &Code) -> String {
        let meta = CodeMeta::parse(code.meta.as_deref());
        let lang = meta
            .language
            .as_deref()
            .or(code.lang.as_deref())
            .filter(|lang| !lang.is_empty())
            .unwrap_or("text");

        let mut attrs = String::new();
        if let Some(language) = &meta.language {
            attrs.push_str(&format!(r#" data-language="{}""#, escape_html(language)));
        }
        if let Some(name) = language_display_name(lang) {
            attrs.push_str(&format!(r#" data-language-name="{}""#, escape_html(name)));
        }
        if let Some(filename) = &meta.filename {
            attrs.push_str(&format!(r#" data-filename="{}""#, escape_html(filename)));
        }

        let caption = meta
            .filename
            .as_deref()
            .map(|filename| {
                format!(
                    r#"<figcaption class="code-title">{}</figcaption>"#,
                    escape_html(filename)
                )
            })
            .unwrap_or_default();

        format!(
            r#"<figure class="highlight {}"{}>{}{}</figure>"#,
            escape_html(lang),
            attrs,
            caption,
            self.highlight_code(&code.value, lang)
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn load_theme(name: &str) -> Theme {
    let mut themes = ThemeSet::load_defaults().themes;
    if let Some(theme) = themes.remove(name) {
        return theme;
    }
    tracing::warn!("Unknown highlight theme {:?}, using {}", name, DEFAULT_THEME);
    themes.remove(DEFAULT_THEME).unwrap_or_default()
}
