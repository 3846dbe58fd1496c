//! Post and Page models

use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::PathBuf;

use super::frontmatter::{MetaValue, Metadata};

/// A blog post
///
/// Templates see every front-matter key as written, with the typed fields
/// below layered on top of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Front-matter as the author wrote it
    pub metadata: Metadata,

    /// Publication date, `None` when missing or unparseable
    pub date: Option<NaiveDateTime>,

    pub slug: String,
    pub title: String,
    pub tags: Vec<String>,

    /// Layout template to use
    pub layout: String,

    /// Rendered HTML content
    pub content: String,

    /// Month name and year ("Mar 2024"), exposed as `Date`
    pub display_date: String,

    /// Day and month ("15 03"), exposed as `shortDate`
    pub short_date: String,

    /// Four-digit year, also the first output path segment
    pub year: String,

    /// Source file path
    pub source: PathBuf,
}

impl Serialize for Post {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        const DERIVED: [&str; 8] = [
            "slug",
            "title",
            "tags",
            "layout",
            "content",
            "Date",
            "shortDate",
            "year",
        ];

        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.metadata.iter() {
            if !DERIVED.contains(&key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        map.serialize_entry("slug", &self.slug)?;
        map.serialize_entry("title", &self.title)?;
        map.serialize_entry("tags", &self.tags)?;
        map.serialize_entry("layout", &self.layout)?;
        map.serialize_entry("content", &self.content)?;
        map.serialize_entry("Date", &self.display_date)?;
        map.serialize_entry("shortDate", &self.short_date)?;
        map.serialize_entry("year", &self.year)?;
        map.end()
    }
}

/// A standalone page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Front-matter as the author wrote it
    pub metadata: Metadata,

    pub slug: String,

    /// Layout template to use
    pub layout: String,

    /// Rendered HTML content
    pub content: String,

    /// Source file path
    pub source: PathBuf,
}

impl Page {
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.metadata.get(key)
    }

    /// Whether the page contributes a navigation entry
    pub fn in_navigation(&self) -> bool {
        self.get("navigation").is_some_and(MetaValue::is_truthy)
    }

    pub fn navigation_title(&self) -> Option<String> {
        self.get("navigationTitle").and_then(MetaValue::to_text)
    }

    /// Sort key among navigation entries
    pub fn order(&self) -> Option<f64> {
        self.get("order").and_then(MetaValue::as_f64)
    }

    /// Title shown in `pageTitle` when the page is not the home page
    pub fn display_title(&self) -> String {
        self.navigation_title()
            .or_else(|| self.get("title").and_then(MetaValue::to_text))
            .unwrap_or_else(|| self.slug.clone())
    }
}

impl Serialize for Page {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.metadata.iter() {
            if !matches!(key.as_str(), "slug" | "layout" | "content") {
                map.serialize_entry(key, value)?;
            }
        }
        map.serialize_entry("slug", &self.slug)?;
        map.serialize_entry("layout", &self.layout)?;
        map.serialize_entry("content", &self.content)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(pairs: &[(&str, MetaValue)]) -> Page {
        Page {
            metadata: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            slug: "about".to_string(),
            layout: "page".to_string(),
            content: "<p>hi</p>".to_string(),
            source: PathBuf::from("pages/about.md"),
        }
    }

    #[test]
    fn test_page_navigation_fields() {
        let p = page(&[
            ("navigation", MetaValue::Bool(true)),
            ("navigationTitle", MetaValue::String("About".into())),
            ("order", MetaValue::Integer(3)),
        ]);
        assert!(p.in_navigation());
        assert_eq!(p.navigation_title().as_deref(), Some("About"));
        assert_eq!(p.order(), Some(3.0));
        assert_eq!(p.display_title(), "About");
    }

    #[test]
    fn test_page_display_title_fallbacks() {
        let p = page(&[("title", MetaValue::String("About me".into()))]);
        assert!(!p.in_navigation());
        assert_eq!(p.display_title(), "About me");
        assert_eq!(page(&[]).display_title(), "about");
    }

    #[test]
    fn test_post_serializes_metadata_and_derived_fields() {
        let post = Post {
            metadata: [
                ("date".to_string(), MetaValue::String("2024-03-15".into())),
                ("slug".to_string(), MetaValue::String("hello".into())),
                ("mood".to_string(), MetaValue::String("sunny".into())),
                ("content".to_string(), MetaValue::String("raw".into())),
            ]
            .into_iter()
            .collect(),
            date: None,
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            tags: vec!["intro".to_string()],
            layout: "post".to_string(),
            content: "<p>Hello</p>".to_string(),
            display_date: "Mar 2024".to_string(),
            short_date: "15 03".to_string(),
            year: "2024".to_string(),
            source: PathBuf::from("posts/hello.md"),
        };

        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["date"], "2024-03-15");
        assert_eq!(value["mood"], "sunny");
        assert_eq!(value["content"], "<p>Hello</p>");
        assert_eq!(value["Date"], "Mar 2024");
        assert_eq!(value["shortDate"], "15 03");
        assert_eq!(value["year"], "2024");
        assert_eq!(value["tags"][0], "intro");
    }
}
