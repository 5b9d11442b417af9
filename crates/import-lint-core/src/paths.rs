//! Path classification and lexical path arithmetic.
//!
//! All functions here are pure: nothing touches the filesystem. Results use
//! `/` as separator so that configured patterns match on every platform.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Returns true if an import specifier is relative to the importing file.
///
/// Relative means exactly `.` or `..`, or starting with `./` or `../`
/// (also with the platform separator).
///
/// ```
/// use import_lint_core::paths::is_relative;
///
/// assert!(is_relative("../domain"));
/// assert!(!is_relative("lodash"));
/// ```
#[must_use]
pub fn is_relative(path: &str) -> bool {
    let rest = path
        .strip_prefix("..")
        .or_else(|| path.strip_prefix('.'));

    match rest {
        Some("") => true,
        Some(rest) => rest.starts_with('/') || rest.starts_with(MAIN_SEPARATOR),
        None => false,
    }
}

/// Lexically normalizes a path, folding `.` and `..` components.
///
/// Leading `..` components of a relative path are kept.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Expresses `target` relative to `base`, joined with `/`.
///
/// Both paths are normalized first. Returns an empty string when they are
/// the same directory.
#[must_use]
pub fn relative_to(base: &Path, target: &Path) -> String {
    let base = normalize(base);
    let target = normalize(target);
    let base: Vec<_> = base.components().collect();
    let target: Vec<_> = target.components().collect();

    let common = base
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = base.len() - common;
    let mut parts: Vec<String> = std::iter::repeat("..".to_string()).take(ups).collect();
    parts.extend(
        target[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

/// Number of segments in a `/`-joined path.
#[must_use]
pub fn depth(path: &str) -> usize {
    path.split('/').count()
}
