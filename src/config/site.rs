//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Environment variable that overrides `content_mode`
pub const CONTENT_MODE_ENV: &str = "CONTENT_MODE";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub locale: String,
    pub url: String,

    // Content
    pub content_dir: String,
    pub content_mode: ContentMode,

    // Pagination
    pub per_page: usize,

    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Ring-a-Log".to_string(),
            description: String::new(),
            author: "Ring-a-Log".to_string(),
            locale: "ja".to_string(),
            url: "https://example.com".to_string(),

            content_dir: "content".to_string(),
            content_mode: ContentMode::Demo,

            per_page: 10,

            highlight: HighlightConfig::default(),
            markdown: MarkdownConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `CONTENT_MODE` from the environment, if set to a known mode
    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(CONTENT_MODE_ENV) {
            self.apply_content_mode(&value);
        }
    }

    fn apply_content_mode(&mut self, value: &str) {
        match ContentMode::parse(value) {
            Some(mode) => {
                tracing::debug!("Content mode set to {:?} from environment", mode);
                self.content_mode = mode;
            }
            None => tracing::warn!(
                "Ignoring unknown {} value: {:?}",
                CONTENT_MODE_ENV,
                value
            ),
        }
    }

    /// Blog collection directory, relative to the site root
    pub fn blog_dir(&self) -> String {
        format!(
            "{}/{}",
            self.content_dir.trim_end_matches('/'),
            self.content_mode.collection()
        )
    }
}

/// Which blog collection the site is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    /// Sample posts under `blog-demo`
    #[default]
    Demo,
    /// Real posts under `blog`
    Production,
}

impl ContentMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "demo" => Some(Self::Demo),
            "production" => Some(Self::Production),
            _ => None,
        }
    }

    /// Collection directory name
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Demo => "blog-demo",
            Self::Production => "blog",
        }
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}

/// Markdown extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// `:::type … :::` containers
    pub callouts: bool,
    /// `lang:filename` code fences
    pub code_titles: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            callouts: true,
            code_titles: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Ring-a-Log");
        assert_eq!(config.content_mode, ContentMode::Demo);
        assert_eq!(config.per_page, 10);
        assert_eq!(config.blog_dir(), "content/blog-demo");
        assert!(config.markdown.callouts);
        assert!(config.markdown.code_titles);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
content_dir: src/content/
content_mode: production
per_page: 20
highlight:
  line_number: false
markdown:
  callouts: false
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.per_page, 20);
        assert_eq!(config.blog_dir(), "src/content/blog");
        assert!(!config.highlight.line_number);
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
        assert!(!config.markdown.callouts);
        assert!(config.markdown.code_titles);
    }

    #[test]
    fn test_content_mode_override() {
        let mut config = SiteConfig::default();
        config.apply_content_mode("production");
        assert_eq!(config.content_mode, ContentMode::Production);
        config.apply_content_mode("staging");
        assert_eq!(config.content_mode, ContentMode::Production);
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let config: SiteConfig = serde_yaml::from_str("analytics_id: abc\n").unwrap();
        assert_eq!(
            config.extra.get("analytics_id").and_then(|v| v.as_str()),
            Some("abc")
        );
    }
}
