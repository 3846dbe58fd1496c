//! Content loader - loads posts and pages from their source directories

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, Page, Post};
use crate::config::HighlightConfig;
use crate::error::{BuildError, Result};
use crate::helpers::{format_date, DISPLAY_DATE_FORMAT, SHORT_DATE_FORMAT, YEAR_FORMAT};

/// Loads content from the posts and pages directories
pub struct ContentLoader {
    renderer: MarkdownRenderer,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new(highlight: &HighlightConfig) -> Self {
        Self {
            renderer: MarkdownRenderer::with_options(highlight),
        }
    }

    /// Load all posts, in file-name order
    ///
    /// A missing directory simply means there are no posts.
    pub fn load_posts(&self, posts_dir: &Path) -> Result<Vec<Post>> {
        let posts = list_markdown_files(posts_dir)?
            .iter()
            .map(|path| self.load_post(path))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), posts_dir);
        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let content = read_source(path)?;
        let (fm, body) = parse_front_matter(path, &content)?;
        let slug = required_slug(path, &fm)?;

        let date = fm.date();
        if date.is_none() {
            tracing::warn!(
                "Post {:?} has a missing or unparseable date ({:?}); it will sort last",
                path,
                fm.text("date")
            );
        }

        let title = fm.text("title").unwrap_or_else(|| file_stem(path));
        let layout = fm.text("layout").unwrap_or_else(|| "post".to_string());

        tracing::debug!("Loaded post {:?}", path);

        Ok(Post {
            date,
            slug,
            title,
            tags: fm.tags(),
            layout,
            content: self.renderer.render(body),
            display_date: format_date(date.as_ref(), DISPLAY_DATE_FORMAT),
            short_date: format_date(date.as_ref(), SHORT_DATE_FORMAT),
            year: format_date(date.as_ref(), YEAR_FORMAT),
            source: path.to_path_buf(),
            metadata: fm.metadata,
        })
    }

    /// Load all pages, in file-name order
    ///
    /// A missing directory simply means there are no pages.
    pub fn load_pages(&self, pages_dir: &Path) -> Result<Vec<Page>> {
        let pages = list_markdown_files(pages_dir)?
            .iter()
            .map(|path| self.load_page(path))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Loaded {} pages from {:?}", pages.len(), pages_dir);
        Ok(pages)
    }

    /// Load a single page from a file
    fn load_page(&self, path: &Path) -> Result<Page> {
        let content = read_source(path)?;
        let (fm, body) = parse_front_matter(path, &content)?;
        let slug = required_slug(path, &fm)?;
        let layout = fm.text("layout").unwrap_or_else(|| "page".to_string());

        tracing::debug!("Loaded page {:?}", path);

        Ok(Page {
            slug,
            layout,
            content: self.renderer.render(body),
            source: path.to_path_buf(),
            metadata: fm.metadata,
        })
    }
}

/// List the markdown sources directly inside `dir`, sorted by file name
pub fn list_markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| BuildError::Read {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;

        let is_markdown = entry
            .file_name()
            .to_str()
            .is_some_and(is_markdown_file_name);
        if entry.file_type().is_file() && is_markdown {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Check if a file name marks a markdown source
///
/// Only the segment after the first `.` counts: `hello.md` and `hello.md.bak`
/// match, `my.post.md` does not.
pub fn is_markdown_file_name(name: &str) -> bool {
    name.split('.').nth(1) == Some("md")
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| BuildError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_front_matter<'a>(path: &Path, content: &'a str) -> Result<(FrontMatter, &'a str)> {
    FrontMatter::parse(content).map_err(|message| BuildError::FrontMatter {
        path: path.to_path_buf(),
        message,
    })
}

fn required_slug(path: &Path, fm: &FrontMatter) -> Result<String> {
    fm.text("slug")
        .filter(|slug| !slug.is_empty())
        .ok_or_else(|| BuildError::MissingKey {
            path: path.to_path_buf(),
            key: "slug",
        })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled")
        .to_string()
}
