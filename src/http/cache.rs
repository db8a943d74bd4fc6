//! HTTP cache validation module
//!
//! Weak `ETag` generation for static assets and `If-None-Match` evaluation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate a weak `ETag` of the form `W/"<len hex>-<hash hex>"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("W/\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// Whether the client's `If-None-Match` header names the current `ETag`.
///
/// Uses weak comparison: `W/` prefixes are ignored on both sides. Accepts a
/// comma-separated list and the `*` wildcard.
pub fn is_not_modified(if_none_match: Option<&str>, etag: &str) -> bool {
    let current = opaque_tag(etag);
    if_none_match.is_some_and(|header| {
        header
            .split(',')
            .map(str::trim)
            .any(|candidate| candidate == "*" || opaque_tag(candidate) == current)
    })
}

fn opaque_tag(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}
