//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::paths;
use crate::source::Span;

/// Context provided to per-file rules.
///
/// Holds the analyzed file's location relative to the project root and its
/// text. Created fresh for every analyzed file.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path to the file as given to the analyzer.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Project root that import paths are expressed against.
    pub root: PathBuf,
    /// Path relative to the project root, `/`-joined.
    pub relative_path: String,
    /// Normalized absolute directory containing the file.
    pub directory: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    ///
    /// Relative `path`s are resolved against `root`.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let root = paths::normalize(root);
        let absolute = paths::normalize(&root.join(path));
        let relative_path = paths::relative_to(&root, &absolute);
        let directory = absolute
            .parent()
            .map_or_else(|| root.clone(), Path::to_path_buf);

        Self {
            path,
            content,
            root,
            relative_path,
            directory,
        }
    }

    /// Resolves an import specifier against this file's directory and
    /// expresses the result relative to the project root.
    #[must_use]
    pub fn path_from_root(&self, specifier: &str) -> String {
        paths::relative_to(&self.root, &self.directory.join(specifier))
    }

    /// Returns the source text covered by a byte range.
    ///
    /// Out-of-range or non-boundary offsets yield an empty string.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        self.content.get(start..end).unwrap_or("")
    }

    /// Returns the source text covered by a span.
    #[must_use]
    pub fn text(&self, span: &Span) -> &'a str {
        self.slice(span.start, span.end)
    }
}
