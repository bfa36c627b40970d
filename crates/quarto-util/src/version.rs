//! Version ordering for versioned resources
//!
//! Theme manifests (and other registries) are keyed by free-form version
//! strings such as `1.2.0` or `v2.0`. This module implements the ordering
//! used to pick the "latest" entry:
//! - an optional leading `v` is ignored
//! - dotted segments are compared left to right as integers
//! - missing trailing segments count as `0`, so `1.0` == `1.0.0`
//! - a segment is read up to its first non-digit; no digits means `0`
//!
//! This is deliberately not SemVer. Pre-release and build metadata are not
//! understood: `1.0.0-rc1` reads its last segment as `0` and therefore
//! compares equal to `1.0.0`.

use std::cmp::Ordering;

/// Compare two version strings segment by segment.
///
/// ```
/// use std::cmp::Ordering;
/// use quarto_util::version::compare_versions;
///
/// assert_eq!(compare_versions("1.1.0", "1.0.0"), Ordering::Greater);
/// assert_eq!(compare_versions("1.0", "1.0.0"), Ordering::Equal);
/// ```
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a = parse_version_parts(a);
    let b = parse_version_parts(b);

    let len = a.len().max(b.len());
    for i in 0..len {
        let av = a.get(i).copied().unwrap_or(0);
        let bv = b.get(i).copied().unwrap_or(0);
        match av.cmp(&bv) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}

/// Split a version string into its numeric segments.
///
/// An empty string (after stripping `v`) has no segments.
pub fn parse_version_parts(version: &str) -> Vec<u64> {
    let version = version.strip_prefix('v').unwrap_or(version);
    if version.is_empty() {
        return Vec::new();
    }
    version.split('.').map(leading_number).collect()
}

/// Parse the leading run of ASCII digits; saturates instead of overflowing.
fn leading_number(segment: &str) -> u64 {
    segment
        .trim_start()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, d| {
            acc.saturating_mul(10).saturating_add(u64::from(d - b'0'))
        })
}
