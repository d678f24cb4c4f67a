//! Render markdown to HTML

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::content::{ContentRepository, FrontMatter};
use crate::Blog;

/// Render a markdown file, front-matter stripped
pub fn render_file(blog: &Blog, path: &Path) -> Result<String> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let (_, body) = FrontMatter::parse(&content)?;
    Ok(blog.render_markdown(body))
}

/// Render a file to `output`, or to stdout
pub fn run(blog: &Blog, file: &Path, output: Option<&Path>) -> Result<()> {
    let html = render_file(blog, file)?;

    match output {
        Some(out) => {
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(out, &html)?;
            tracing::info!("Rendered {:?} -> {:?}", file, out);
        }
        None => print!("{}", html),
    }

    Ok(())
}

/// Render a published post by slug
pub fn show(blog: &Blog, slug: &str) -> Result<String> {
    let post = blog
        .repository()
        .post_by_slug(slug)?
        .with_context(|| format!("No published post with slug {:?}", slug))?;
    tracing::debug!("Rendering post {}", post.id);
    Ok(post.render(&blog.renderer()))
}
