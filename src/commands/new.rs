//! Create a new post

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::PathBuf;

use crate::content::FrontMatter;
use crate::Blog;

/// Maximum generated slug length, in characters
pub const SLUG_MAX_LENGTH: usize = 50;

const IMAGES_DIR: &str = "images";

lazy_static! {
    // Anything that is not ASCII alphanumeric, kana or CJK ideograph
    static ref SLUG_SEPARATOR: Regex =
        Regex::new(r"[^a-z0-9\x{3040}-\x{309f}\x{30a0}-\x{30ff}\x{4e00}-\x{9faf}]+")
            .expect("slug separator pattern is valid");
}

/// Options for a new post
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    /// Defaults to the title
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// Defaults to a slug generated from the title
    pub slug: Option<String>,
    pub draft: bool,
}

/// Slugify a title, capped at [`SLUG_MAX_LENGTH`] characters.
///
/// Japanese kana and kanji are kept as-is rather than transliterated.
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let slug = SLUG_SEPARATOR.replace_all(&lowered, "-");
    let slug: String = slug.trim_matches('-').chars().take(SLUG_MAX_LENGTH).collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "post".to_string()
    } else {
        slug.to_string()
    }
}

/// Scaffold `{date}-{slug}/index.md` and an `images/` folder in the collection.
/// Returns the path of the new `index.md`.
pub fn create_post(blog: &Blog, post: &NewPost, date: NaiveDate) -> Result<PathBuf> {
    let published_at = date.format("%Y-%m-%d").to_string();
    let slug = match post.slug.as_deref().map(str::trim) {
        Some(custom) if !custom.is_empty() => custom.to_string(),
        _ => generate_slug(&post.title),
    };

    let front_matter = FrontMatter {
        title: Some(post.title.clone()),
        description: Some(
            post.description
                .clone()
                .unwrap_or_else(|| post.title.clone()),
        ),
        published_at: Some(published_at.clone()),
        tags: post.tags.clone(),
        draft: post.draft,
        ..Default::default()
    };
    front_matter
        .validate()
        .context("Refusing to create an invalid post")?;

    let post_dir = blog.blog_dir.join(format!("{}-{}", published_at, slug));
    let file_path = post_dir.join("index.md");

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::create_dir_all(post_dir.join(IMAGES_DIR))?;

    let content = format!(
        "{}\n# {}\n",
        front_matter.to_yaml_block()?,
        post.title
    );
    fs::write(&file_path, content)?;

    tracing::info!("Created post {:?}", file_path);

    Ok(file_path)
}

/// Run the new command
pub fn run(blog: &Blog, post: &NewPost) -> Result<()> {
    let path = create_post(blog, post, Local::now().date_naive())?;
    println!("Created: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::{ContentRepository, ValidationError};
    use tempfile::TempDir;

    fn blog(dir: &TempDir) -> Blog {
        Blog::with_config(dir.path(), SiteConfig::default())
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    #[test]
    fn test_generate_slug() {
        assert_eq!(generate_slug("Hello, World!"), "hello-world");
        assert_eq!(generate_slug("  Rust  & Markdown  "), "rust-markdown");
        assert_eq!(generate_slug("!!!"), "post");
        assert_eq!(generate_slug("Rustで始める非同期処理"), "rustで始める非同期処理");
        assert_eq!(generate_slug("カタカナ と ひらがな!"), "カタカナ-と-ひらがな");
        // Full-width punctuation is a separator
        assert_eq!(generate_slug("設計、実装。"), "設計-実装");

        let long = generate_slug(&"word ".repeat(30));
        assert!(long.chars().count() <= SLUG_MAX_LENGTH);
        assert!(!long.ends_with('-'));

        let long = generate_slug(&"あ".repeat(60));
        assert_eq!(long.chars().count(), SLUG_MAX_LENGTH);
    }

    #[test]
    fn test_create_post_japanese_title() {
        let dir = TempDir::new().unwrap();
        let blog = blog(&dir);
        let post = NewPost {
            title: "Rustで始める非同期処理".to_string(),
            ..Default::default()
        };

        let path = create_post(&blog, &post, date()).unwrap();
        assert!(path.ends_with("2024-05-06-rustで始める非同期処理/index.md"));
    }

    #[test]
    fn test_create_post_layout() {
        let dir = TempDir::new().unwrap();
        let blog = blog(&dir);
        let post = NewPost {
            title: "Hello Callouts".to_string(),
            tags: vec!["markdown".to_string()],
            ..Default::default()
        };

        let path = create_post(&blog, &post, date()).unwrap();
        assert_eq!(
            path,
            dir.path()
                .join("content/blog-demo/2024-05-06-hello-callouts/index.md")
        );
        assert!(path.parent().unwrap().join("images").is_dir());

        let loaded = blog
            .repository()
            .post_by_slug("2024-05-06-hello-callouts")
            .unwrap()
            .unwrap();
        assert_eq!(loaded.title, "Hello Callouts");
        assert_eq!(loaded.description, "Hello Callouts");
        assert_eq!(loaded.tags, vec!["markdown"]);
    }

    #[test]
    fn test_create_post_custom_slug_and_draft() {
        let dir = TempDir::new().unwrap();
        let blog = blog(&dir);
        let post = NewPost {
            title: "Whatever".to_string(),
            description: Some("Custom".to_string()),
            slug: Some("my-slug".to_string()),
            draft: true,
            ..Default::default()
        };

        let path = create_post(&blog, &post, date()).unwrap();
        assert!(path.ends_with("2024-05-06-my-slug/index.md"));

        let posts = blog.repository().load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert!(posts[0].draft);
        assert_eq!(posts[0].description, "Custom");
        assert!(blog.repository().all_posts().unwrap().is_empty());
    }

    #[test]
    fn test_create_post_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let blog = blog(&dir);
        let post = NewPost {
            title: "Twice".to_string(),
            ..Default::default()
        };

        create_post(&blog, &post, date()).unwrap();
        let err = create_post(&blog, &post, date()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_create_post_validates() {
        let dir = TempDir::new().unwrap();
        let post = NewPost {
            title: "x".repeat(201),
            ..Default::default()
        };

        let err = create_post(&blog(&dir), &post, date()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::Length { field: "title", .. })
        ));
        assert!(!dir.path().join("content").exists());
    }
}
