//! Layout and partial templates, rendered with Tera
//!
//! Partials come from the includes directory and are registered once, before
//! any layout is compiled. Layouts are read from the layouts directory on
//! first use and cached by name.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

use crate::error::{BuildError, Result};

/// Scaffold templates written by `quire init`
pub mod scaffold {
    pub const LAYOUT_PAGE: &str = include_str!("scaffold/layouts/page.html");
    pub const LAYOUT_POST: &str = include_str!("scaffold/layouts/post.html");
    pub const LAYOUT_TAG: &str = include_str!("scaffold/layouts/tag.html");
    pub const INCLUDE_HEAD: &str = include_str!("scaffold/includes/head.html");
    pub const INCLUDE_NAV: &str = include_str!("scaffold/includes/nav.html");
    pub const INCLUDE_RECENT: &str = include_str!("scaffold/includes/recent.html");
}

/// Template renderer over a site's layouts and includes
pub struct TemplateRenderer {
    tera: Tera,
    layouts_dir: PathBuf,
    layouts: HashSet<String>,
    partials: Vec<String>,
}

impl TemplateRenderer {
    /// Create a renderer and register every partial in `includes_dir`
    pub fn new(includes_dir: &Path, layouts_dir: &Path) -> Result<Self> {
        let mut tera = Tera::default();

        // Content is already HTML; escaping would mangle it
        tera.autoescape_on(vec![]);

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        let mut renderer = Self {
            tera,
            layouts_dir: layouts_dir.to_path_buf(),
            layouts: HashSet::new(),
            partials: Vec::new(),
        };
        renderer.register_partials(includes_dir)?;
        Ok(renderer)
    }

    /// Register each file in `includes_dir` under the part of its name
    /// before the first `.`; a missing directory registers nothing
    fn register_partials(&mut self, includes_dir: &Path) -> Result<()> {
        let entries = match fs::read_dir(includes_dir) {
            Ok(entries) => entries,
            Err(_) => {
                tracing::debug!("No includes directory at {:?}", includes_dir);
                return Ok(());
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();

        let mut templates = Vec::with_capacity(files.len());
        for path in files {
            let name = partial_name(&path);
            let source = fs::read_to_string(&path).map_err(|source| BuildError::Read {
                path: path.clone(),
                source,
            })?;
            tracing::debug!("Registered partial `{}` from {:?}", name, path);
            templates.push((name, source));
        }

        // Added together so partials may include one another
        self.tera
            .add_raw_templates(templates.iter().map(|(n, s)| (n.as_str(), s.as_str())))
            .map_err(|source| BuildError::Template {
                name: includes_dir.display().to_string(),
                source,
            })?;
        self.partials = templates.into_iter().map(|(name, _)| name).collect();

        Ok(())
    }

    /// Names of the registered partials
    pub fn partials(&self) -> &[String] {
        &self.partials
    }

    /// Render the layout `<layouts_dir>/<layout>.html` with given context
    pub fn render(&mut self, layout: &str, context: &Context, output: &Path) -> Result<String> {
        let template_name = self.load_layout(layout)?;
        self.tera
            .render(&template_name, context)
            .map_err(|source| BuildError::Render {
                layout: layout.to_string(),
                output: output.to_path_buf(),
                source,
            })
    }

    /// Compile a layout on first use
    fn load_layout(&mut self, layout: &str) -> Result<String> {
        let template_name = format!("layouts/{}.html", layout);
        if self.layouts.contains(layout) {
            return Ok(template_name);
        }

        let path = self.layouts_dir.join(format!("{}.html", layout));
        let source = fs::read_to_string(&path).map_err(|_| BuildError::LayoutNotFound {
            name: layout.to_string(),
            path: path.clone(),
        })?;

        self.tera
            .add_raw_template(&template_name, &source)
            .map_err(|source| BuildError::Template {
                name: template_name.clone(),
                source,
            })?;
        self.layouts.insert(layout.to_string());
        tracing::debug!("Compiled layout `{}` from {:?}", layout, path);

        Ok(template_name)
    }
}

/// Partial name: the file name up to its first `.`
fn partial_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or_default()
        .to_string()
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(tera::Value::String(result))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => " .....".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Dirs {
        _root: TempDir,
        includes: PathBuf,
        layouts: PathBuf,
    }

    fn dirs() -> Dirs {
        let root = TempDir::new().unwrap();
        let includes = root.path().join("includes");
        let layouts = root.path().join("layouts");
        fs::create_dir_all(&includes).unwrap();
        fs::create_dir_all(&layouts).unwrap();
        Dirs {
            _root: root,
            includes,
            layouts,
        }
    }

    #[test]
    fn test_partials_registered_by_first_segment() {
        let d = dirs();
        fs::write(d.includes.join("header.html"), "<h1>{{ pageTitle }}</h1>").unwrap();
        fs::write(d.includes.join("footer.tpl.html"), "<footer/>").unwrap();
        fs::write(
            d.layouts.join("page.html"),
            r#"{% include "header" %}{{ page.content }}{% include "footer" %}"#,
        )
        .unwrap();

        let mut renderer = TemplateRenderer::new(&d.includes, &d.layouts).unwrap();
        assert_eq!(renderer.partials(), ["footer", "header"]);

        let mut context = Context::new();
        context.insert("pageTitle", "About - Ada");
        context.insert("page", &serde_json::json!({ "content": "<p>hi</p>" }));

        let html = renderer.render("page", &context, Path::new("out")).unwrap();
        assert_eq!(html, "<h1>About - Ada</h1><p>hi</p><footer/>");
    }

    #[test]
    fn test_missing_includes_dir_is_fine() {
        let d = dirs();
        let renderer = TemplateRenderer::new(&d.includes.join("missing"), &d.layouts).unwrap();
        assert!(renderer.partials().is_empty());
    }

    #[test]
    fn test_missing_layout_is_an_error() {
        let d = dirs();
        let mut renderer = TemplateRenderer::new(&d.includes, &d.layouts).unwrap();
        let err = renderer
            .render("nope", &Context::new(), Path::new("out"))
            .unwrap_err();
        assert!(matches!(err, BuildError::LayoutNotFound { ref name, .. } if name == "nope"));
    }

    #[test]
    fn test_loops_and_conditionals() {
        let d = dirs();
        fs::write(
            d.layouts.join("list.html"),
            "{% if isHome %}home{% endif %}{% for p in recentPosts %}[{{ p.title }}]{% endfor %}",
        )
        .unwrap();
        let mut renderer = TemplateRenderer::new(&d.includes, &d.layouts).unwrap();

        let mut context = Context::new();
        context.insert(
            "recentPosts",
            &serde_json::json!([{ "title": "B" }, { "title": "A" }]),
        );
        let html = renderer.render("list", &context, Path::new("out")).unwrap();
        assert_eq!(html, "[B][A]");

        context.insert("isHome", &true);
        let html = renderer.render("list", &context, Path::new("out")).unwrap();
        assert_eq!(html, "home[B][A]");
    }

    #[test]
    fn test_strip_html_filter() {
        let value = tera::Value::String("<p>Hello <b>world</b></p>".to_string());
        let result = strip_html_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(result, tera::Value::String("Hello world".to_string()));
    }

    #[test]
    fn test_truncate_chars_filter() {
        let value = tera::Value::String("abcdefghij".to_string());
        let mut args = HashMap::new();
        args.insert("length".to_string(), tera::Value::from(4));
        args.insert("omission".to_string(), tera::Value::from("..."));
        let result = truncate_chars_filter(&value, &args).unwrap();
        assert_eq!(result, tera::Value::String("abcd...".to_string()));
    }

    #[test]
    fn test_scaffold_templates_compile() {
        let d = dirs();
        fs::write(d.includes.join("head.html"), scaffold::INCLUDE_HEAD).unwrap();
        fs::write(d.includes.join("nav.html"), scaffold::INCLUDE_NAV).unwrap();
        fs::write(d.includes.join("recent.html"), scaffold::INCLUDE_RECENT).unwrap();
        fs::write(d.layouts.join("page.html"), scaffold::LAYOUT_PAGE).unwrap();
        fs::write(d.layouts.join("post.html"), scaffold::LAYOUT_POST).unwrap();
        fs::write(d.layouts.join("tag.html"), scaffold::LAYOUT_TAG).unwrap();

        let mut renderer = TemplateRenderer::new(&d.includes, &d.layouts).unwrap();
        for layout in ["page", "post", "tag"] {
            renderer.load_layout(layout).unwrap();
        }
    }
}
