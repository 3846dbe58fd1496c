//! Create a new post or page

use anyhow::{bail, Context, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Create a new post (or page) source file and return its path
pub fn run(site: &Site, title: &str, page: bool, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(slug) => slug.to_string(),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        bail!("Cannot derive a slug from {:?}; pass one with --slug", title);
    }
    if slug.contains('.') || slug.contains('/') {
        bail!("Slug {:?} may not contain '.' or '/'", slug);
    }

    let (target_dir, front_matter) = if page {
        (&site.pages_dir, page_front_matter(title, &slug))
    } else {
        (&site.posts_dir, post_front_matter(title, &slug))
    };

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    fs::create_dir_all(target_dir)
        .with_context(|| format!("Failed to create {:?}", target_dir))?;

    let yaml = serde_yaml::to_string(&front_matter)?;
    fs::write(&file_path, format!("---\n{}---\n\n", yaml))
        .with_context(|| format!("Failed to write {:?}", file_path))?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}

fn post_front_matter(title: &str, slug: &str) -> Mapping {
    let now = chrono::Local::now();

    let mut fm = Mapping::new();
    fm.insert("title".into(), title.into());
    fm.insert(
        "date".into(),
        now.format("%Y-%m-%d %H:%M:%S").to_string().into(),
    );
    fm.insert("slug".into(), slug.into());
    fm.insert("tags".into(), Value::Sequence(Vec::new()));
    fm.insert("layout".into(), "post".into());
    fm
}

fn page_front_matter(title: &str, slug: &str) -> Mapping {
    let mut fm = Mapping::new();
    fm.insert("title".into(), title.into());
    fm.insert("slug".into(), slug.into());
    fm.insert("layout".into(), "page".into());
    fm.insert("navigation".into(), true.into());
    fm.insert("navigationTitle".into(), title.into());
    fm
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HighlightConfig;
    use crate::content::ContentLoader;

    #[test]
    fn test_new_post_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = run(&site, "Hello: World!", false, None).unwrap();
        assert_eq!(path, site.posts_dir.join("hello-world.md"));

        let posts = ContentLoader::new(&HighlightConfig::default())
            .load_posts(&site.posts_dir)
            .unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "hello-world");
        assert_eq!(posts[0].title, "Hello: World!");
        assert_eq!(posts[0].layout, "post");
        assert!(posts[0].date.is_some());
    }

    #[test]
    fn test_new_page_is_navigable() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        run(&site, "About", true, Some("about")).unwrap();

        let pages = ContentLoader::new(&HighlightConfig::default())
            .load_pages(&site.pages_dir)
            .unwrap();
        assert_eq!(pages[0].slug, "about");
        assert!(pages[0].in_navigation());
        assert_eq!(pages[0].navigation_title().as_deref(), Some("About"));
    }

    #[test]
    fn test_refuses_to_overwrite_or_bad_slugs() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        run(&site, "Twice", false, None).unwrap();
        assert!(run(&site, "Twice", false, None).is_err());
        assert!(run(&site, "Dotted", false, Some("my.post")).is_err());
    }
}
