//! Post model

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::frontmatter::PostMeta;
use super::MarkdownRenderer;

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Slug (URL path segment)
    pub slug: String,

    /// Source path relative to the collection root
    pub id: String,

    pub title: String,
    pub description: String,

    /// Publication date
    pub published_at: DateTime<Local>,

    /// Last updated date
    pub updated_at: Option<DateTime<Local>>,

    pub tags: Vec<String>,

    /// Raw markdown content (front-matter stripped)
    pub content: String,

    pub draft: bool,
}

impl Post {
    /// Build a post from validated front-matter
    pub fn new(id: String, slug: String, meta: PostMeta, content: String) -> Self {
        Self {
            slug,
            id,
            title: meta.title,
            description: meta.description,
            published_at: meta.published_at,
            updated_at: meta.updated_at,
            tags: meta.tags,
            content,
            draft: meta.draft,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Text before `<!-- more -->`, if the post has one
    pub fn excerpt(&self) -> Option<String> {
        MarkdownRenderer::split_excerpt(&self.content).0
    }

    /// Render the post body to HTML
    pub fn render(&self, renderer: &MarkdownRenderer) -> String {
        let (_, content) = MarkdownRenderer::split_excerpt(&self.content);
        renderer.render(&content)
    }
}

/// A tag and the number of published posts carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagWithCount {
    pub name: String,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(content: &str) -> Post {
        let meta = PostMeta {
            title: "Hello".to_string(),
            description: "A post".to_string(),
            published_at: Local.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            updated_at: None,
            tags: vec!["rust".to_string(), "Web".to_string()],
            draft: false,
        };
        Post::new("hello.md".into(), "hello".into(), meta, content.to_string())
    }

    #[test]
    fn test_has_tag_is_exact() {
        let post = post("Body");
        assert!(post.has_tag("rust"));
        assert!(post.has_tag("Web"));
        assert!(!post.has_tag("web"));
    }

    #[test]
    fn test_excerpt_and_render() {
        let post = post("Intro text.\n<!-- more -->\n:::tip\n\nRead on.\n\n:::\n");
        assert_eq!(post.excerpt().as_deref(), Some("Intro text."));

        let html = post.render(&MarkdownRenderer::new());
        assert!(!html.contains("<!-- more -->"));
        assert!(html.starts_with("<p>Intro text.</p>\n<div class=\"callout callout-tip\">"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(post("Body")).unwrap();
        assert_eq!(json["slug"], "hello");
        assert!(json.get("publishedAt").is_some());
        assert!(json["updatedAt"].is_null());
    }
}
