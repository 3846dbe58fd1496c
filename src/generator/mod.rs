//! Generator module - turns a site's sources into rendered HTML files
//!
//! The pipeline is strictly forward: load content, build the site index,
//! plan render jobs, render each job, then write every page. Partials are
//! registered before anything is rendered, and every page is rendered before
//! anything is written, so a broken layout or source file leaves the output
//! directory untouched.

pub mod index;
pub mod planner;
pub mod writer;

pub use index::{
    clear_active_navigation, set_active_navigation, ArchiveYear, NavigationEntry, SiteIndex,
    TagGroup, TaggedPost,
};
pub use planner::{PagePlanner, RenderJob};
pub use writer::{write_pages, RenderedPage};

use crate::content::ContentLoader;
use crate::error::Result;
use crate::templates::TemplateRenderer;
use crate::Site;

/// What a build produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub posts: usize,
    pub pages: usize,
    pub tags: usize,
    pub written: usize,
}

/// Static site generator using the site's layouts and includes
pub struct Generator {
    site: Site,
    loader: ContentLoader,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator; partials are registered here
    pub fn new(site: &Site) -> Result<Self> {
        let renderer = TemplateRenderer::new(&site.includes_dir, &site.layouts_dir)?;
        tracing::debug!("Registered {} partials", renderer.partials().len());

        Ok(Self {
            site: site.clone(),
            loader: ContentLoader::new(&site.config.highlight),
            renderer,
        })
    }

    /// Load posts and pages and derive the site index
    pub fn build_index(&self) -> Result<SiteIndex> {
        let posts = self.loader.load_posts(&self.site.posts_dir)?;
        let pages = self.loader.load_pages(&self.site.pages_dir)?;

        tracing::info!("Loaded {} posts and {} pages", posts.len(), pages.len());

        Ok(SiteIndex::build(posts, pages, self.site.config.recent_posts))
    }

    /// Render every planned job
    pub fn render(&mut self, index: &SiteIndex) -> Result<Vec<RenderedPage>> {
        let jobs = PagePlanner::new(index, &self.site.config, &self.site.public_dir).plan()?;

        let mut rendered = Vec::with_capacity(jobs.len());
        for job in jobs {
            let html = self
                .renderer
                .render(&job.layout, &job.context, &job.output_dir)?;
            rendered.push(RenderedPage {
                dir: job.output_dir,
                html,
            });
        }
        Ok(rendered)
    }

    /// Generate the entire site
    pub async fn generate(&mut self) -> Result<BuildSummary> {
        let index = self.build_index()?;
        let rendered = self.render(&index)?;
        let written = write_pages(rendered).await?;

        Ok(BuildSummary {
            posts: index.posts.len(),
            pages: index.pages.len(),
            tags: index.tags.len(),
            written,
        })
    }
}
