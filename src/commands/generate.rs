//! Generate static files

use anyhow::{Context, Result};

use crate::generator::{BuildSummary, Generator};
use crate::Site;

/// Generate the static site
pub async fn run(site: &Site) -> Result<BuildSummary> {
    let start = std::time::Instant::now();

    let mut generator = Generator::new(site).context("Failed to load templates")?;
    let summary = generator
        .generate()
        .await
        .with_context(|| format!("Failed to generate site into {:?}", site.public_dir))?;

    tracing::info!(
        "Generated {} files ({} posts, {} pages, {} tags) in {:.2}s",
        summary.written,
        summary.posts,
        summary.pages,
        summary.tags,
        start.elapsed().as_secs_f64()
    );

    Ok(summary)
}
