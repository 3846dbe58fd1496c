//! Build errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort (or fail) a site build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed front-matter in {path:?}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error("{path:?} is missing required front-matter key `{key}`")]
    MissingKey { path: PathBuf, key: &'static str },

    #[error("invalid configuration in {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("layout `{name}` not found at {path:?}")]
    LayoutNotFound { name: String, path: PathBuf },

    #[error("failed to compile template `{name}`: {source}")]
    Template {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("failed to render layout `{layout}` for {output:?}: {source}")]
    Render {
        layout: String,
        output: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("{kind} `{value}` does not name a path inside the output directory")]
    UnsafeOutputPath { kind: &'static str, value: String },

    #[error("more than one page renders to {path:?}")]
    DuplicateOutput { path: PathBuf },

    #[error("{failed} of {total} pages could not be written")]
    WriteFailures { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, BuildError>;
