//! quire: a small static site generator for markdown blogs
//!
//! Posts and pages are markdown files with YAML front-matter. They are
//! indexed into recent posts, tag groups, a yearly archive and site
//! navigation, then rendered through Tera layouts into a directory of
//! `index.html` files.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod templates;

use std::path::{Path, PathBuf};

pub use error::{BuildError, Result};
pub use generator::BuildSummary;

/// Name of the configuration file in a site's base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A site on disk: its configuration and resolved directories
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Post sources
    pub posts_dir: PathBuf,
    /// Page sources
    pub pages_dir: PathBuf,
    /// Layout templates
    pub layouts_dir: PathBuf,
    /// Partial templates
    pub includes_dir: PathBuf,
    /// Output directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Open a site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        Self {
            posts_dir: base_dir.join(&config.posts_dir),
            pages_dir: base_dir.join(&config.pages_dir),
            layouts_dir: base_dir.join(&config.layouts_dir),
            includes_dir: base_dir.join(&config.includes_dir),
            public_dir: base_dir.join(&config.public_dir),
            config,
            base_dir,
        }
    }

    /// Generate the static site
    pub async fn generate(&self) -> anyhow::Result<BuildSummary> {
        commands::generate::run(self).await
    }

    /// Clean the output directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post, or a page when `page` is set
    pub fn new_post(&self, title: &str, page: bool) -> anyhow::Result<PathBuf> {
        commands::new::run(self, title, page, None)
    }
}
