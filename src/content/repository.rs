//! Content repository - loads posts from the blog collection directory

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{FrontMatter, Post, TagWithCount};

/// Read access to the blog's posts, independent of where they live
pub trait ContentRepository {
    /// All published posts, newest first (drafts excluded)
    fn all_posts(&self) -> Result<Vec<Post>>;

    /// A published post by slug; `None` if missing or a draft
    fn post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        Ok(self.all_posts()?.into_iter().find(|post| post.slug == slug))
    }

    /// Published posts carrying `tag`, newest first
    fn posts_by_tag(&self, tag: &str) -> Result<Vec<Post>> {
        Ok(self
            .all_posts()?
            .into_iter()
            .filter(|post| post.has_tag(tag))
            .collect())
    }

    /// Every tag with its post count, most used first
    fn all_tags(&self) -> Result<Vec<TagWithCount>> {
        Ok(count_tags(&self.all_posts()?))
    }
}

/// Posts stored as markdown files with YAML front-matter.
///
/// Both `slug.md` and `slug/index.md` layouts are recognized.
pub struct MarkdownRepository {
    root: PathBuf,
}

impl MarkdownRepository {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every valid post, drafts included
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        if !self.root.exists() {
            tracing::debug!("Collection directory {:?} does not exist", self.root);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_post(path) {
                    Ok(post) => posts.push(post),
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {:#}", path, e);
                    }
                }
            }
        }

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;
        let meta = fm.validate().context("Invalid front-matter")?;

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let id = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let slug = slug_for(&id);

        Ok(Post::new(id, slug, meta, body.to_string()))
    }
}

impl ContentRepository for MarkdownRepository {
    fn all_posts(&self) -> Result<Vec<Post>> {
        let mut posts = self.load_posts()?;
        posts.retain(|post| !post.draft);
        Ok(posts)
    }
}

/// `a/b.md` → `a/b`, `a/index.md` → `a`
fn slug_for(id: &str) -> String {
    let without_ext = id
        .strip_suffix(".md")
        .or_else(|| id.strip_suffix(".markdown"))
        .unwrap_or(id);
    match without_ext.strip_suffix("/index") {
        Some(folder) if !folder.is_empty() => folder.to_string(),
        _ => without_ext.to_string(),
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// Count tags across posts; ties keep first-seen order
pub fn count_tags(posts: &[Post]) -> Vec<TagWithCount> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut tags: Vec<TagWithCount> = counts
        .into_iter()
        .map(|(name, count)| TagWithCount {
            name: name.to_string(),
            count,
        })
        .collect();
    tags.sort_by(|a, b| b.count.cmp(&a.count));
    tags
}

/// One page of a list
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Paginated<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1 && self.page <= self.total_pages
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slice out page `page` (1-based). Pages past the end are empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Paginated<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_pages = items.len().div_ceil(per_page);

    let page_items = items
        .iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .cloned()
        .collect();

    Paginated {
        items: page_items,
        page,
        per_page,
        total_pages,
        total_items: items.len(),
    }
}
