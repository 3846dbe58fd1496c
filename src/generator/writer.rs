//! Output writer - writes rendered pages concurrently and waits for all of them

use std::path::PathBuf;
use tokio::task::JoinSet;

use crate::error::{BuildError, Result};

/// A rendered page waiting to be written to `<dir>/index.html`
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub dir: PathBuf,
    pub html: String,
}

impl RenderedPage {
    pub fn path(&self) -> PathBuf {
        self.dir.join("index.html")
    }
}

/// Write every page, one task per page
///
/// A failed page is logged and does not stop the others; the call fails once
/// everything has settled if any page could not be written.
pub async fn write_pages(pages: Vec<RenderedPage>) -> Result<usize> {
    let total = pages.len();
    let mut tasks = JoinSet::new();

    for page in pages {
        tasks.spawn(async move {
            let path = page.path();
            let result = async {
                tokio::fs::create_dir_all(&page.dir).await?;
                tokio::fs::write(&path, page.html.as_bytes()).await
            }
            .await;
            (path, result)
        });
    }

    let mut failed = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((path, Ok(()))) => tracing::debug!("Generated: {:?}", path),
            Ok((path, Err(e))) => {
                failed += 1;
                tracing::error!("Failed to write {:?}: {}", path, e);
            }
            Err(e) => {
                failed += 1;
                tracing::error!("Write task failed: {}", e);
            }
        }
    }

    if failed > 0 {
        return Err(BuildError::WriteFailures { failed, total });
    }
    Ok(total)
}
