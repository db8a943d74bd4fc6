//! Shared helpers for handler tests

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::config::{AppState, Config, ResumeConfig};
use crate::logger;

/// Default configuration rooted at `root`, with no acknowledgment delay
pub fn config_in(root: &Path) -> Config {
    let mut config = Config::load_from("tests/no-such-config").unwrap();
    config.contact.ack_delay_ms = 0;
    config.site.dist_dir = root.join("dist").to_string_lossy().into_owned();
    config.site.public_dir = root.join("public").to_string_lossy().into_owned();
    config.resume = ResumeConfig::File {
        path: root.join("public/resume.pdf").to_string_lossy().into_owned(),
        download_name: "Pratyush_Goutam_Resume.pdf".to_string(),
    };
    config
}

pub fn state(config: Config) -> Arc<AppState> {
    Arc::new(AppState::new(config).unwrap())
}

pub fn request(method: &str, uri: &str, content_type: Option<&str>, body: &str) -> Request<Full<Bytes>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    builder.body(Full::new(Bytes::from(body.to_string()))).unwrap()
}

pub fn json_post(uri: &str, body: &str) -> Request<Full<Bytes>> {
    request("POST", uri, Some("application/json"), body)
}

pub async fn read_body(resp: Response<Full<Bytes>>) -> Bytes {
    resp.into_body().collect().await.unwrap().to_bytes()
}

pub async fn read_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
    serde_json::from_slice(&read_body(resp).await).unwrap()
}

/// Route the global log writer to a file and return its path.
///
/// The writer can only be set once per process, so every test that reads
/// log output shares this file.
pub fn captured_log() -> &'static Path {
    static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();
    LOG_FILE.get_or_init(|| {
        let path = tempfile::Builder::new()
            .prefix("portfolio-server-")
            .suffix(".log")
            .tempfile()
            .unwrap()
            .into_temp_path()
            .keep()
            .unwrap();
        logger::writer::init(path.to_str(), None, false).unwrap();
        path
    })
}
