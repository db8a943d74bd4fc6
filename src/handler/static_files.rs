//! Static file serving module
//!
//! Serves the public asset directory and the built client bundle, with a
//! single-page-app fallback to the bundle's index file.

use crate::config::SiteConfig;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Request information needed to answer a static request
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
}

/// A file loaded from one of the site roots
#[derive(Debug)]
pub struct StaticFile {
    pub content: Bytes,
    pub content_type: &'static str,
}

/// Serve a static path: public assets first, then the bundle, then the SPA index
pub async fn serve_site(ctx: &RequestContext<'_>, site: &SiteConfig) -> Response<Full<Bytes>> {
    for root in [&site.public_dir, &site.dist_dir] {
        if let Some(file) = load_from_directory(root, ctx.path, &site.index_files).await {
            return build_static_file_response(file, ctx);
        }
    }

    if site.spa_fallback {
        if let Some(file) = load_from_directory(&site.dist_dir, "/", &site.index_files).await {
            logger::log_debug(&format!("SPA fallback for {}", ctx.path));
            return build_static_file_response(file, ctx);
        }
    }

    http::build_404_response()
}

/// Load a file below `root`, resolving directories to their index file.
///
/// Returns `None` when the file is missing or resolves outside `root`.
pub async fn load_from_directory(
    root: &str,
    request_path: &str,
    index_files: &[String],
) -> Option<StaticFile> {
    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_debug(&format!("Site root unavailable '{root}': {e}"));
            return None;
        }
    };

    let relative = request_path.trim_start_matches('/');
    let mut file_path = root_canonical.join(relative);

    if relative.is_empty() || relative.ends_with('/') || is_dir(&file_path).await {
        file_path = find_index(&file_path, index_files).await?;
    }

    // File not found is common (404), no need to log at warning level
    let file_canonical = fs::canonicalize(&file_path).await.ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            file_canonical.display()
        ));
        return None;
    }

    if !fs::metadata(&file_canonical).await.ok()?.is_file() {
        return None;
    }

    match fs::read(&file_canonical).await {
        Ok(content) => Some(StaticFile {
            content: Bytes::from(content),
            content_type: mime::content_type_for(&file_canonical),
        }),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_canonical.display(),
                e
            ));
            None
        }
    }
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

async fn find_index(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for index_file in index_files {
        let candidate = dir.join(index_file);
        if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
            return Some(candidate);
        }
    }
    None
}

/// Build static file response with `ETag` support
fn build_static_file_response(file: StaticFile, ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&file.content);

    if cache::is_not_modified(ctx.if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::build_cached_response(file.content, file.content_type, &etag, ctx.is_head)
}
