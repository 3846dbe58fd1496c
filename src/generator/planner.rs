//! Page planner - decides what gets rendered, where, and with which data

use serde::Serialize;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tera::Context;

use super::index::{clear_active_navigation, set_active_navigation, SiteIndex};
use crate::config::SiteConfig;
use crate::error::{BuildError, Result};

/// Layout every tag page is rendered with
pub const TAG_LAYOUT: &str = "tag";

/// Slug of the page rendered at the site root
pub const HOME_SLUG: &str = "index";

/// One page to render: a layout, a data context, and the directory that
/// receives its `index.html`
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub layout: String,
    pub output_dir: PathBuf,
    pub context: Context,
}

/// Site configuration as templates see it
#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub author: String,
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl From<&SiteConfig> for ConfigData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            author: config.author.clone(),
            extra: config.extra.clone(),
        }
    }
}

/// Plans render jobs from a site index
pub struct PagePlanner<'a> {
    index: &'a SiteIndex,
    config: &'a SiteConfig,
    public_dir: &'a Path,
}

impl<'a> PagePlanner<'a> {
    pub fn new(index: &'a SiteIndex, config: &'a SiteConfig, public_dir: &'a Path) -> Self {
        Self {
            index,
            config,
            public_dir,
        }
    }

    /// All jobs: pages first, then posts (newest first), then tags
    ///
    /// Navigation flags carry over between jobs: every page sets them, every
    /// post clears them, and tag pages see whatever the last job left.
    ///
    /// Fails when a slug or tag would land outside the output directory, or
    /// when two jobs share an output directory.
    pub fn plan(&self) -> Result<Vec<RenderJob>> {
        let config_data = ConfigData::from(self.config);
        let mut navigation = self.index.navigation.clone();
        let mut jobs = Vec::with_capacity(
            self.index.pages.len() + self.index.posts.len() + self.index.tags.len(),
        );

        for page in &self.index.pages {
            set_active_navigation(&mut navigation, &page.slug);

            let mut context = Context::new();
            context.insert("archive", &self.index.archive);
            context.insert("config", &config_data);
            context.insert("navigation", &navigation);
            context.insert("page", page);
            context.insert("recentPosts", &self.index.recent_posts);

            let output_dir = if page.slug == HOME_SLUG {
                context.insert("pageTitle", &self.config.page_title(&self.config.title));
                context.insert("showRecent", &true);
                context.insert("isHome", &true);
                self.public_dir.to_path_buf()
            } else {
                context.insert("pageTitle", &self.config.page_title(&page.display_title()));
                self.output_dir(&[("page slug", page.slug.as_str())])?
            };

            jobs.push(RenderJob {
                layout: page.layout.clone(),
                output_dir,
                context,
            });
        }

        for post in &self.index.posts {
            clear_active_navigation(&mut navigation);

            let mut context = Context::new();
            context.insert("config", &config_data);
            context.insert("navigation", &navigation);
            context.insert("pageTitle", &self.config.page_title(&post.title));
            context.insert("post", post);
            context.insert("recentPosts", &self.index.recent_posts);

            jobs.push(RenderJob {
                layout: post.layout.clone(),
                output_dir: self.output_dir(&[
                    ("post year", post.year.as_str()),
                    ("post slug", post.slug.as_str()),
                ])?,
                context,
            });
        }

        for tag in &self.index.tags {
            let mut context = Context::new();
            context.insert("config", &config_data);
            context.insert("navigation", &navigation);
            context.insert(
                "pageTitle",
                &self.config.page_title(&format!("Tag: {}", tag.name)),
            );
            context.insert("recentPosts", &self.index.recent_posts);
            context.insert("tag", tag);

            jobs.push(RenderJob {
                layout: TAG_LAYOUT.to_string(),
                output_dir: self
                    .output_dir(&[("tag directory", "tag"), ("tag", tag.name.as_str())])?,
                context,
            });
        }

        let mut seen = HashSet::with_capacity(jobs.len());
        for job in &jobs {
            if !seen.insert(job.output_dir.as_path()) {
                return Err(BuildError::DuplicateOutput {
                    path: job.output_dir.clone(),
                });
            }
        }

        tracing::debug!("Planned {} render jobs", jobs.len());
        Ok(jobs)
    }

    /// Join `parts` under the output directory; each part must be a plain
    /// relative path
    fn output_dir(&self, parts: &[(&'static str, &str)]) -> Result<PathBuf> {
        let mut dir = self.public_dir.to_path_buf();
        for &(kind, value) in parts {
            let path = Path::new(value);
            let mut components = path.components().peekable();
            let plain = components.peek().is_some()
                && components.all(|c| matches!(c, Component::Normal(_)));
            if !plain {
                return Err(BuildError::UnsafeOutputPath {
                    kind,
                    value: value.to_string(),
                });
            }
            dir.push(path);
        }
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::index::tests::{page, post};

    fn config() -> SiteConfig {
        SiteConfig {
            title: "Field Notes".to_string(),
            author: "Ada".to_string(),
            ..Default::default()
        }
    }

    fn index() -> SiteIndex {
        SiteIndex::build(
            vec![
                post("hello", "2024-03-15", &["intro"]),
                post("older", "2023-01-02", &["intro", "misc"]),
            ],
            vec![
                page("index", None),
                page("home", Some(("Home", 1))),
                page("about", Some(("About", 2))),
            ],
            5,
        )
    }

    fn value<'c>(job: &'c RenderJob, key: &str) -> Option<&'c tera::Value> {
        job.context.get(key)
    }

    fn active_slugs(job: &RenderJob) -> Vec<String> {
        value(job, "navigation")
            .and_then(|v| v.as_array())
            .unwrap()
            .iter()
            .filter(|e| e["active"] == true)
            .map(|e| e["slug"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_job_order_and_paths() {
        let index = index();
        let config = config();
        let root = Path::new("/out");
        let jobs = PagePlanner::new(&index, &config, root).plan().unwrap();

        let dirs: Vec<_> = jobs.iter().map(|j| j.output_dir.clone()).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/out"),
                PathBuf::from("/out/home"),
                PathBuf::from("/out/about"),
                PathBuf::from("/out/2024/hello"),
                PathBuf::from("/out/2023/older"),
                PathBuf::from("/out/tag/intro"),
                PathBuf::from("/out/tag/misc"),
            ]
        );

        let layouts: Vec<_> = jobs.iter().map(|j| j.layout.as_str()).collect();
        assert_eq!(layouts, ["page", "page", "page", "post", "post", "tag", "tag"]);
    }

    #[test]
    fn test_home_page_context() {
        let index = index();
        let config = config();
        let jobs = PagePlanner::new(&index, &config, Path::new("/out")).plan().unwrap();

        let home = &jobs[0];
        assert_eq!(value(home, "isHome"), Some(&tera::Value::Bool(true)));
        assert_eq!(value(home, "showRecent"), Some(&tera::Value::Bool(true)));
        assert_eq!(
            value(home, "pageTitle").and_then(|v| v.as_str()),
            Some("Field Notes - Ada")
        );
        assert!(value(home, "archive").is_some());
        assert!(value(home, "page").is_some());

        let about = &jobs[2];
        assert_eq!(value(about, "isHome"), None);
        assert_eq!(value(about, "showRecent"), None);
        assert_eq!(
            value(about, "pageTitle").and_then(|v| v.as_str()),
            Some("About - Ada")
        );
    }

    #[test]
    fn test_navigation_flags_per_job() {
        let index = index();
        let config = config();
        let jobs = PagePlanner::new(&index, &config, Path::new("/out")).plan().unwrap();

        assert!(active_slugs(&jobs[0]).is_empty());
        assert_eq!(active_slugs(&jobs[1]), ["home"]);
        assert_eq!(active_slugs(&jobs[2]), ["about"]);
        for job in &jobs[3..] {
            assert!(active_slugs(job).is_empty());
        }

        // The index itself is never touched
        assert!(index.navigation.iter().all(|e| !e.active));
    }

    #[test]
    fn test_post_and_tag_context() {
        let index = index();
        let config = config();
        let jobs = PagePlanner::new(&index, &config, Path::new("/out")).plan().unwrap();

        let post_job = &jobs[3];
        assert_eq!(
            value(post_job, "pageTitle").and_then(|v| v.as_str()),
            Some("HELLO - Ada")
        );
        assert_eq!(value(post_job, "post").unwrap()["slug"], "hello");
        assert!(value(post_job, "archive").is_none());

        let tag_job = &jobs[5];
        assert_eq!(
            value(tag_job, "pageTitle").and_then(|v| v.as_str()),
            Some("Tag: intro - Ada")
        );
        let tag = value(tag_job, "tag").unwrap();
        assert_eq!(tag["name"], "intro");
        assert_eq!(tag["posts"].as_array().unwrap().len(), 2);
        assert_eq!(tag["posts"][0]["post"]["slug"], "hello");
        assert_eq!(value(tag_job, "config").unwrap()["author"], "Ada");
    }

    #[test]
    fn test_no_posts_still_plans_pages() {
        let index = SiteIndex::build(vec![], vec![page("index", None)], 5);
        let config = config();
        let jobs = PagePlanner::new(&index, &config, Path::new("/out")).plan().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].output_dir, PathBuf::from("/out"));
    }

    #[test]
    fn test_absolute_tag_is_rejected() {
        let index = SiteIndex::build(vec![post("hello", "2024-03-15", &["/etc"])], vec![], 5);
        let config = config();
        let err = PagePlanner::new(&index, &config, Path::new("/out"))
            .plan()
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::UnsafeOutputPath { kind: "tag", ref value } if value == "/etc"
        ));
    }

    #[test]
    fn test_parent_segments_are_rejected() {
        let config = config();

        let index = SiteIndex::build(vec![post("../../escape", "2024-03-15", &[])], vec![], 5);
        let err = PagePlanner::new(&index, &config, Path::new("/out"))
            .plan()
            .unwrap_err();
        assert!(matches!(err, BuildError::UnsafeOutputPath { kind: "post slug", .. }));

        let index = SiteIndex::build(vec![], vec![page("..", None)], 5);
        let err = PagePlanner::new(&index, &config, Path::new("/out"))
            .plan()
            .unwrap_err();
        assert!(matches!(err, BuildError::UnsafeOutputPath { kind: "page slug", .. }));

        let index = SiteIndex::build(vec![], vec![page("", None)], 5);
        assert!(PagePlanner::new(&index, &config, Path::new("/out"))
            .plan()
            .is_err());
    }

    #[test]
    fn test_nested_tag_stays_inside_output() {
        let index = SiteIndex::build(vec![post("hello", "2024-03-15", &["lang/rust"])], vec![], 5);
        let config = config();
        let jobs = PagePlanner::new(&index, &config, Path::new("/out"))
            .plan()
            .unwrap();
        assert_eq!(jobs[1].output_dir, PathBuf::from("/out/tag/lang/rust"));
    }

    #[test]
    fn test_duplicate_output_is_rejected() {
        let index = SiteIndex::build(
            vec![
                post("hello", "2024-03-15", &[]),
                post("hello", "2024-09-01", &[]),
            ],
            vec![],
            5,
        );
        let config = config();
        let err = PagePlanner::new(&index, &config, Path::new("/out"))
            .plan()
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::DuplicateOutput { ref path } if path == Path::new("/out/2024/hello")
        ));

        let index = SiteIndex::build(
            vec![post("hello", "2023-03-15", &[]), post("hello", "2024-09-01", &[])],
            vec![],
            5,
        );
        assert!(PagePlanner::new(&index, &config, Path::new("/out")).plan().is_ok());
    }
}
