//! Project path algebra.
//!
//! Project paths are POSIX-style virtual paths rooted at `/` inside a
//! project's dataset namespace. Every function here first brings its input
//! into normal form with [`normalize`], so callers can pass relative paths
//! and paths containing `.`, `..` or repeated separators.

use thiserror::Error;

/// Error type for project path operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path does not lie under the given root.
    #[error("{path} is not a sub path of {root}")]
    NotSubPath { path: String, root: String },
}

/// Bring a project path into normal form.
///
/// The path is taken relative to `/`, `.` segments and repeated separators
/// are dropped and `..` removes the previous segment (never climbing above
/// the root). A trailing slash on the input is preserved.
///
/// # Examples
///
/// ```
/// use faculty_core::datasets::path::normalize;
///
/// assert_eq!(normalize("a/b/../c/"), "/a/c/");
/// assert_eq!(normalize("/a/./b"), "/a/b");
/// assert_eq!(normalize(""), "/");
/// ```
pub fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut normed = format!("/{}", segments.join("/"));
    if (path.is_empty() || path.ends_with('/')) && !normed.ends_with('/') {
        normed.push('/');
    }
    normed
}

/// Express `path` relative to `root`.
///
/// Both paths are normalized, `root` is removed from the front of `path`
/// and any leading slashes of the remainder are dropped. The containment
/// check is a plain string prefix test on the normalized forms.
///
/// # Examples
///
/// ```
/// use faculty_core::datasets::path::relative;
///
/// assert_eq!(relative("/a/", "/a/b/c").unwrap(), "b/c");
/// assert!(relative("/a/", "/x/y").is_err());
/// ```
pub fn relative(root: &str, path: &str) -> Result<String, PathError> {
    let root = normalize(root);
    let path = normalize(path);

    match path.strip_prefix(root.as_str()) {
        Some(rest) => Ok(rest.trim_start_matches('/').to_string()),
        None => Err(PathError::NotSubPath { path, root }),
    }
}

/// Every directory containing `path`, from `/` down to its immediate parent.
///
/// Each directory is returned with a trailing slash. A trailing slash on
/// `path` itself is ignored: a directory's ancestors are listed, not the
/// directory.
///
/// # Examples
///
/// ```
/// use faculty_core::datasets::path::parent_directories;
///
/// assert_eq!(parent_directories("/a/b/c.txt"), vec!["/", "/a/", "/a/b/"]);
/// ```
pub fn parent_directories(path: &str) -> Vec<String> {
    let normed = normalize(path);
    let parent = dirname(normed.trim_end_matches('/'));

    // The root has no ancestors of its own, so "/a" yields only "/" and
    // never a doubled "//".
    let segments: Vec<&str> = parent.trim_end_matches('/').split('/').collect();
    (1..=segments.len())
        .map(|n| format!("{}/", segments[..n].join("/")))
        .collect()
}

/// The directory immediately containing `path`, or `None` for the root.
///
/// Unlike [`parent_directories`] the result carries no trailing slash
/// (except for the root itself).
///
/// # Examples
///
/// ```
/// use faculty_core::datasets::path::parent_directory;
///
/// assert_eq!(parent_directory("/"), None);
/// assert_eq!(parent_directory("/a/b/").as_deref(), Some("/a"));
/// ```
pub fn parent_directory(path: &str) -> Option<String> {
    let normed = normalize(path);
    if normed == "/" {
        return None;
    }
    Some(dirname(normed.trim_end_matches('/')).to_string())
}

/// POSIX dirname: everything before the final separator, with trailing
/// separators removed unless the result is only separators.
fn dirname(path: &str) -> &str {
    let head = match path.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "",
    };
    if head.is_empty() || head.bytes().all(|b| b == b'/') {
        head
    } else {
        head.trim_end_matches('/')
    }
}
