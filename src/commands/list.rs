//! List site content

use anyhow::Result;
use serde::Serialize;

use crate::content::{paginate, ContentRepository, Post};
use crate::Blog;

/// Listing options
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Only posts carrying this tag
    pub tag: Option<String>,
    /// 1-based page
    pub page: usize,
    pub json: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            tag: None,
            page: 1,
            json: false,
        }
    }
}

/// Summary row for listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostSummary {
    slug: String,
    title: String,
    description: String,
    published_at: String,
    tags: Vec<String>,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            published_at: post.published_at.format("%Y-%m-%d").to_string(),
            tags: post.tags.clone(),
        }
    }
}

/// Format a page of posts
pub fn list_posts(
    repo: &dyn ContentRepository,
    per_page: usize,
    options: &ListOptions,
) -> Result<String> {
    let posts = match &options.tag {
        Some(tag) => repo.posts_by_tag(tag)?,
        None => repo.all_posts()?,
    };
    let summaries: Vec<PostSummary> = posts.iter().map(PostSummary::from).collect();
    let page = paginate(&summaries, options.page, per_page);

    if options.json {
        return Ok(serde_json::to_string_pretty(&page)?);
    }

    let mut out = format!(
        "Posts ({}), page {}/{}:\n",
        page.total_items,
        page.page,
        page.total_pages.max(1)
    );
    for post in &page.items {
        out.push_str(&format!(
            "  {} - {} [{}]\n",
            post.published_at, post.title, post.slug
        ));
    }
    Ok(out)
}

/// Format tag counts
pub fn list_tags(repo: &dyn ContentRepository, json: bool) -> Result<String> {
    let tags = repo.all_tags()?;

    if json {
        return Ok(serde_json::to_string_pretty(&tags)?);
    }

    let mut out = format!("Tags ({}):\n", tags.len());
    for tag in tags {
        out.push_str(&format!("  {} ({})\n", tag.name, tag.count));
    }
    Ok(out)
}

/// List site content by type
pub fn run(blog: &Blog, content_type: &str, options: &ListOptions) -> Result<()> {
    let repo = blog.repository();

    let output = match content_type {
        "post" | "posts" => list_posts(&repo, blog.config.per_page, options)?,
        "tag" | "tags" => list_tags(&repo, options.json)?,
        _ => {
            anyhow::bail!("Unknown type: {}. Available: posts, tags", content_type);
        }
    };

    print!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::{count_tags, FrontMatter, PostMeta, TagWithCount};

    /// In-memory repository
    struct Fixed(Vec<Post>);

    impl ContentRepository for Fixed {
        fn all_posts(&self) -> Result<Vec<Post>> {
            Ok(self.0.clone())
        }
    }

    fn post(slug: &str, date: &str, tags: &[&str]) -> Post {
        let fm = FrontMatter {
            title: Some(slug.to_uppercase()),
            description: Some("d".to_string()),
            published_at: Some(date.to_string()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };
        let meta: PostMeta = fm.validate().unwrap();
        Post::new(format!("{}.md", slug), slug.to_string(), meta, String::new())
    }

    fn repo() -> Fixed {
        Fixed(vec![
            post("c", "2024-03-01", &["rust"]),
            post("b", "2024-02-01", &["rust", "cli"]),
            post("a", "2024-01-01", &["cli"]),
        ])
    }

    #[test]
    fn test_list_posts_text() {
        let out = list_posts(&repo(), 2, &ListOptions::default()).unwrap();
        assert_eq!(
            out,
            "Posts (3), page 1/2:\n  2024-03-01 - C [c]\n  2024-02-01 - B [b]\n"
        );

        let options = ListOptions {
            page: 2,
            ..Default::default()
        };
        let out = list_posts(&repo(), 2, &options).unwrap();
        assert_eq!(out, "Posts (3), page 2/2:\n  2024-01-01 - A [a]\n");
    }

    #[test]
    fn test_list_posts_by_tag_json() {
        let options = ListOptions {
            tag: Some("cli".to_string()),
            json: true,
            ..Default::default()
        };
        let out = list_posts(&repo(), 10, &options).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["total_items"], 2);
        assert_eq!(value["items"][0]["slug"], "b");
        assert_eq!(value["items"][0]["publishedAt"], "2024-02-01");
        assert_eq!(value["items"][1]["slug"], "a");
    }

    #[test]
    fn test_list_tags() {
        let out = list_tags(&repo(), false).unwrap();
        assert_eq!(out, "Tags (2):\n  rust (2)\n  cli (2)\n");

        let json = list_tags(&repo(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "rust");
        assert_eq!(value[0]["count"], 2);
    }

    #[test]
    fn test_count_tags_matches_repository() {
        let repo = repo();
        let expected: Vec<TagWithCount> = count_tags(&repo.all_posts().unwrap());
        assert_eq!(repo.all_tags().unwrap(), expected);
    }

    #[test]
    fn test_unknown_type() {
        let blog = Blog::with_config("/nonexistent/ringlog", SiteConfig::default());
        let err = run(&blog, "categories", &ListOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Unknown type"));
    }
}
