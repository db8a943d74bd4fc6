// Resume download endpoint

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::io::ErrorKind;
use std::path::Path;

use super::response::error_response;
use crate::config::{AppState, ResumeConfig};
use crate::http::{self, mime};
use crate::logger;

/// `GET /api/download-resume`
pub async fn handle_download(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    match &state.config.resume {
        ResumeConfig::Redirect { target } => http::build_redirect_response(target),
        ResumeConfig::File {
            path,
            download_name,
        } => match tokio::fs::read(path).await {
            Ok(data) => http::build_attachment_response(
                Bytes::from(data),
                mime::content_type_for(Path::new(path)),
                download_name,
                is_head,
            ),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                logger::log_warning(&format!("Resume file not found: {path}"));
                error_response(StatusCode::NOT_FOUND, "Resume file not found")
            }
            Err(e) => {
                logger::log_error(&format!("Resume download error for '{path}': {e}"));
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to download resume")
            }
        },
    }
}
