//! Content module - handles posts, pages, and content processing

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::{FrontMatter, MetaValue, Metadata};
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use post::{Page, Post};
