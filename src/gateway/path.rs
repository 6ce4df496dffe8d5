//! Path resolution helpers.
//!
//! Resolution is plain prefixing: a non-empty base URI is prepended verbatim
//! to the caller path, exactly as the original gateway did. No separator
//! normalization and no traversal rejection happens here; `..` filtering is
//! an opt-in handled by the caller via [`has_dot_segments`].

/// Qualify a caller path against the configured base URI.
pub(crate) fn resolve(base_uri: &str, path: &str) -> String {
    if base_uri.is_empty() {
        path.to_string()
    } else {
        format!("{base_uri}{path}")
    }
}

/// Whether any `/`-separated segment of the path is `.` or `..`.
pub(crate) fn has_dot_segments(path: &str) -> bool {
    path.split('/').any(|seg| seg == "." || seg == "..")
}

/// Final path component, used to carry a file name across a transfer.
pub(crate) fn base_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Append a file name to a directory path unless the directory already ends
/// in a separator.
pub(crate) fn join_target(dir: &str, file_name: &str) -> String {
    if dir.ends_with('/') {
        format!("{dir}{file_name}")
    } else {
        format!("{dir}/{file_name}")
    }
}
