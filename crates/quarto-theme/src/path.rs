/*
 * path.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Asset prefix and path composition.
 */

//! Asset prefix/path composition.
//!
//! Asset prefixes come in two shapes:
//! - a slash-separated path (`/static`, `assets/theme`), joined segment-wise
//!   and lexically cleaned
//! - an absolute URL containing `://` (a CDN root), joined with exactly one
//!   `/` and otherwise left untouched so query and fragment characters
//!   survive

/// Join an asset prefix with a relative asset path.
///
/// One leading `/` is stripped from `relative` first. An empty prefix returns
/// the stripped path unchanged. A URL prefix strips one more, so the join
/// point carries a single `/`.
pub fn join_asset_path(prefix: &str, relative: &str) -> String {
    let relative = relative.strip_prefix('/').unwrap_or(relative);
    if prefix.is_empty() {
        return relative.to_string();
    }
    if prefix.contains("://") {
        let prefix = prefix.strip_suffix('/').unwrap_or(prefix);
        let relative = relative.strip_prefix('/').unwrap_or(relative);
        return format!("{}/{}", prefix, relative);
    }
    clean_slash_path(&format!("{}/{}", prefix, relative))
}

/// Lexically clean a slash-separated path.
///
/// Collapses repeated separators, drops `.` segments, resolves `..` against
/// the preceding segment and removes any trailing slash. `..` above a rooted
/// path is discarded; above a relative path it is kept. An empty result is
/// `.`.
pub fn clean_slash_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
