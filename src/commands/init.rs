//! Initialize a new site

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::templates::scaffold;
use crate::CONFIG_FILE;

const CONFIG: &str = r#"# Site
title: My Blog
author: John Doe

# Number of posts listed as recentPosts
recent_posts: 5

# Directory
posts_dir: posts
pages_dir: pages
layouts_dir: layouts
includes_dir: includes
public_dir: site

# Writing
highlight:
  enable: true
  line_number: false
  theme: base16-ocean.dark
"#;

const INDEX_PAGE: &str = r#"---
slug: index
layout: page
title: Home
---

Welcome! This page is rendered at the root of the site, followed by the
archive of every post.
"#;

const ABOUT_PAGE: &str = r#"---
slug: about
layout: page
title: About
navigation: true
navigationTitle: About
order: 2
---

Write something about yourself here.
"#;

/// Initialize a new site in the given directory
///
/// Existing files are left alone, so running this twice is harmless.
pub fn init_site(target_dir: &Path) -> Result<()> {
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
slug: hello-world
tags:
  - intro
layout: post
---

This is your first post. Edit it in `posts/hello-world.md`, or create
another with `quire new "My Next Post"`, then run `quire generate`.

```rust
fn main() {{
    println!("Hello, world!");
}}
```
"#,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let files: [(&str, &str); 10] = [
        (CONFIG_FILE, CONFIG),
        ("posts/hello-world.md", sample_post.as_str()),
        ("pages/index.md", INDEX_PAGE),
        ("pages/about.md", ABOUT_PAGE),
        ("layouts/page.html", scaffold::LAYOUT_PAGE),
        ("layouts/post.html", scaffold::LAYOUT_POST),
        ("layouts/tag.html", scaffold::LAYOUT_TAG),
        ("includes/head.html", scaffold::INCLUDE_HEAD),
        ("includes/nav.html", scaffold::INCLUDE_NAV),
        ("includes/recent.html", scaffold::INCLUDE_RECENT),
    ];

    for (relative, content) in files {
        let path = target_dir.join(relative);
        if path.exists() {
            tracing::warn!("Skipping existing file {:?}", path);
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!("Created {:?}", path);
    }

    Ok(())
}
