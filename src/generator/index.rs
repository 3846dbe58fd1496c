//! Site index - everything derived from the loaded posts and pages

use indexmap::IndexMap;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::content::{Page, Post};

/// One post under one of its tags
#[derive(Debug, Clone, Serialize)]
pub struct TaggedPost {
    pub post: Arc<Post>,
    pub tag: String,
}

/// All posts sharing a tag, in post discovery order
#[derive(Debug, Clone, Serialize)]
pub struct TagGroup {
    pub name: String,
    pub posts: Vec<TaggedPost>,
}

/// All posts published in one year
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveYear {
    pub year: String,
    pub posts: Vec<Arc<Post>>,
}

/// A site navigation link, derived from a page with `navigation: true`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationEntry {
    pub title: String,
    pub url: String,
    pub slug: String,
    pub order: Option<f64>,
    pub active: bool,
}

/// Derived site data, built once per run
#[derive(Debug, Clone, Serialize)]
pub struct SiteIndex {
    /// Undated posts first, then newest first
    pub posts: Vec<Arc<Post>>,
    #[serde(rename = "recentPosts")]
    pub recent_posts: Vec<Arc<Post>>,
    pub pages: Vec<Arc<Page>>,
    pub tags: Vec<TagGroup>,
    /// Newest year first
    pub archive: Vec<ArchiveYear>,
    /// Ascending by `order`, every entry inactive
    pub navigation: Vec<NavigationEntry>,
}

impl SiteIndex {
    /// Build the index from posts and pages in discovery order
    pub fn build(posts: Vec<Post>, pages: Vec<Page>, recent_limit: usize) -> Self {
        let posts: Vec<Arc<Post>> = posts.into_iter().map(Arc::new).collect();
        let pages: Vec<Arc<Page>> = pages.into_iter().map(Arc::new).collect();

        // Tags keep discovery order, so group before sorting
        let tags = group_tags(&posts);

        let mut posts = posts;
        // Newest first, undated posts ahead of every dated one
        posts.sort_by(|a, b| {
            a.date
                .is_some()
                .cmp(&b.date.is_some())
                .then_with(|| b.date.cmp(&a.date))
        });

        let recent_posts = posts.iter().take(recent_limit).cloned().collect();
        let archive = group_years(&posts);
        let navigation = build_navigation(&pages);

        tracing::debug!(
            "Indexed {} posts, {} pages, {} tags, {} archive years, {} navigation entries",
            posts.len(),
            pages.len(),
            tags.len(),
            archive.len(),
            navigation.len()
        );

        Self {
            posts,
            recent_posts,
            pages,
            tags,
            archive,
            navigation,
        }
    }
}

/// Mark the entry for `slug` active and every other entry inactive
pub fn set_active_navigation(entries: &mut [NavigationEntry], slug: &str) {
    for entry in entries.iter_mut() {
        entry.active = entry.slug == slug;
    }
}

/// Mark every entry inactive
pub fn clear_active_navigation(entries: &mut [NavigationEntry]) {
    for entry in entries.iter_mut() {
        entry.active = false;
    }
}

/// URL a navigation entry links to
pub fn navigation_url(slug: &str) -> String {
    if slug == "home" {
        "/".to_string()
    } else {
        format!("/{}/", slug)
    }
}

fn group_tags(posts: &[Arc<Post>]) -> Vec<TagGroup> {
    let mut groups: IndexMap<&str, Vec<TaggedPost>> = IndexMap::new();
    for post in posts {
        for tag in &post.tags {
            groups.entry(tag.as_str()).or_default().push(TaggedPost {
                post: Arc::clone(post),
                tag: tag.clone(),
            });
        }
    }

    groups
        .into_iter()
        .map(|(name, posts)| TagGroup {
            name: name.to_string(),
            posts,
        })
        .collect()
}

/// Group sorted posts by year, then reverse the key-ordered groups
///
/// Groups are enumerated like an insertion-ordered string map: integer-like
/// keys ascending, then the rest in insertion order. With parseable dates the
/// result is newest year first; an "Invalid date" group ends up in front.
fn group_years(posts: &[Arc<Post>]) -> Vec<ArchiveYear> {
    let mut groups: IndexMap<&str, Vec<Arc<Post>>> = IndexMap::new();
    for post in posts {
        groups
            .entry(post.year.as_str())
            .or_default()
            .push(Arc::clone(post));
    }

    let (mut numeric, other): (Vec<_>, Vec<_>) = groups
        .into_iter()
        .partition(|(year, _)| array_index(year).is_some());
    numeric.sort_by_key(|(year, _)| array_index(year));

    numeric
        .into_iter()
        .chain(other)
        .rev()
        .map(|(year, posts)| ArchiveYear {
            year: year.to_string(),
            posts,
        })
        .collect()
}

/// Canonical non-negative integer keys ("0", "2024", but not "02024")
fn array_index(key: &str) -> Option<u32> {
    let index: u32 = key.parse().ok()?;
    (index != u32::MAX && index.to_string() == key).then_some(index)
}

fn build_navigation(pages: &[Arc<Page>]) -> Vec<NavigationEntry> {
    let mut entries: Vec<NavigationEntry> = pages
        .iter()
        .filter(|page| page.in_navigation())
        .map(|page| NavigationEntry {
            title: page.navigation_title().unwrap_or_default(),
            url: navigation_url(&page.slug),
            slug: page.slug.clone(),
            order: page.order(),
            active: false,
        })
        .collect();

    // Stable; entries without an order go last
    entries.sort_by(|a, b| match (a.order, b.order) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    entries
}
