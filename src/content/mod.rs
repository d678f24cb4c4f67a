//! Content module - handles posts, front-matter, and markdown rendering

mod frontmatter;
mod markdown;
mod post;
mod repository;

pub use frontmatter::{
    parse_date_string, FrontMatter, PostMeta, ValidationError, DESCRIPTION_MAX_LENGTH,
    MAX_TAGS, TITLE_MAX_LENGTH,
};
pub use markdown::{CodeMeta, MarkdownRenderer};
pub use post::{Post, TagWithCount};
pub use repository::{count_tags, paginate, ContentRepository, MarkdownRepository, Paginated};
