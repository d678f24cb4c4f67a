//! Configuration module

mod site;

pub use site::ContentMode;
pub use site::HighlightConfig;
pub use site::MarkdownConfig;
pub use site::SiteConfig;
pub use site::CONTENT_MODE_ENV;
