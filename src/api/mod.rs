// API module entry
// JSON endpoints under /api

mod contact;
mod resume;
mod response;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};

use crate::config::AppState;

pub const CONTACT_PATH: &str = "/api/contact";
pub const RESUME_PATH: &str = "/api/download-resume";

/// Whether a path belongs to the API namespace
pub fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// API route handler
///
/// Dispatches to handler functions based on request path and method
pub async fn handle_api<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match (&method, path.as_str()) {
        (&Method::POST, CONTACT_PATH) => contact::handle_contact(req, state).await,
        (&Method::GET, RESUME_PATH) => resume::handle_download(state, false).await,
        (&Method::HEAD, RESUME_PATH) => resume::handle_download(state, true).await,
        (_, CONTACT_PATH) => response::method_not_allowed("POST, OPTIONS"),
        (_, RESUME_PATH) => response::method_not_allowed("GET, HEAD, OPTIONS"),
        _ => response::not_found(),
    }
}
