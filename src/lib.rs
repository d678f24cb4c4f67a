//! ringlog: markdown content pipeline for the Ring-a-Log blog
//!
//! Posts are parsed into an mdast tree, run through the callout and
//! fence-metadata transforms, and serialized to HTML with syntax highlighting.

pub mod commands;
pub mod config;
pub mod content;
pub mod mdast;
pub mod transform;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A blog site rooted at a directory
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Collection directory the posts are read from
    pub blog_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create with an explicit configuration; the environment is not consulted
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let blog_dir = base_dir.join(config.blog_dir());

        Self {
            config,
            base_dir,
            blog_dir,
        }
    }

    /// Renderer configured from the `highlight` and `markdown` sections
    pub fn renderer(&self) -> content::MarkdownRenderer {
        content::MarkdownRenderer::from_config(&self.config)
    }

    /// Repository over the active collection
    pub fn repository(&self) -> content::MarkdownRepository {
        content::MarkdownRepository::new(&self.blog_dir)
    }

    /// Render a markdown string with the site's settings
    pub fn render_markdown(&self, markdown: &str) -> String {
        self.renderer().render(markdown)
    }
}
