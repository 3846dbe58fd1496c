//! List site content

use anyhow::{bail, Result};

use crate::generator::Generator;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let index = Generator::new(site)?.build_index()?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", index.posts.len());
            for post in &index.posts {
                println!(
                    "  {} - {} [{}/{}]",
                    post.short_date, post.title, post.year, post.slug
                );
            }
        }
        "page" | "pages" => {
            println!("Pages ({}):", index.pages.len());
            for page in &index.pages {
                println!("  {} ({}) [{:?}]", page.slug, page.layout, page.source);
            }
        }
        "tag" | "tags" => {
            println!("Tags ({}):", index.tags.len());
            for tag in &index.tags {
                println!("  {} ({})", tag.name, tag.posts.len());
            }
        }
        "archive" => {
            println!("Archive ({} years):", index.archive.len());
            for year in &index.archive {
                println!("  {} ({})", year.year, year.posts.len());
            }
        }
        "nav" | "navigation" => {
            println!("Navigation ({}):", index.navigation.len());
            for entry in &index.navigation {
                println!("  {} -> {}", entry.title, entry.url);
            }
        }
        _ => {
            bail!(
                "Unknown type: {}. Available: post, page, tag, archive, nav",
                content_type
            );
        }
    }

    Ok(())
}
