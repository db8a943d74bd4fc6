//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: preflight handling, body size
//! checks, health probes, then dispatch to the API or the static site.

use crate::api;
use crate::config::{AppState, HealthConfig};
use crate::handler::static_files::{self, RequestContext};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut response = route_request(req, &state).await;

    let http_config = &state.config.http;
    http::apply_common_headers(&mut response, &http_config.server_name, http_config.enable_cors);
    Ok(response)
}

async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    logger::log_debug(&format!(
        "{} {} ({} headers)",
        req.method(),
        req.uri().path(),
        req.headers().len()
    ));

    // 1. Preflight
    if req.method() == Method::OPTIONS {
        return http::build_options_response();
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    // 3. Health check endpoints
    if let Some(resp) = check_health(req.method(), req.uri().path(), &state.config.health) {
        return resp;
    }

    // 4. JSON API
    if api::is_api_path(req.uri().path()) {
        return api::handle_api(req, state).await;
    }

    // 5. Static site
    serve_static(&req, state).await
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(hyper::header::CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn check_health(
    method: &Method,
    path: &str,
    health: &HealthConfig,
) -> Option<Response<Full<Bytes>>> {
    if !health.enabled || !matches!(*method, Method::GET | Method::HEAD) {
        return None;
    }
    (path == health.liveness_path || path == health.readiness_path)
        .then(|| http::build_health_response("ok"))
}

async fn serve_static<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let is_head = match req.method() {
        &Method::GET => false,
        &Method::HEAD => true,
        method => {
            logger::log_warning(&format!(
                "Method not allowed: {method} {}",
                req.uri().path()
            ));
            return http::build_405_response("GET, HEAD, OPTIONS");
        }
    };

    let ctx = RequestContext {
        path: req.uri().path(),
        is_head,
        if_none_match: req
            .headers()
            .get(hyper::header::IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok()),
    };

    static_files::serve_site(&ctx, &state.config.site).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RelayConfig, ResumeConfig};
    use crate::test_support::{config_in, json_post, read_body, read_json, request, state};
    use httpmock::prelude::*;
    use std::fs;

    fn site_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("dist")).unwrap();
        fs::create_dir_all(dir.path().join("public")).unwrap();
        fs::write(dir.path().join("dist/index.html"), "<html>portfolio</html>").unwrap();
        dir
    }

    async fn send(
        req: Request<Full<Bytes>>,
        state: &Arc<AppState>,
    ) -> Response<Full<Bytes>> {
        handle_request(req, Arc::clone(state)).await.unwrap()
    }

    #[tokio::test]
    async fn test_valid_contact_is_acknowledged() {
        let dir = site_dir();
        let state = state(config_in(dir.path()));

        let resp = send(
            json_post(
                "/api/contact",
                r#"{"name":"Ann","email":"ann@example.com","message":"hi"}"#,
            ),
            &state,
        )
        .await;

        assert_eq!(resp.status(), 200);
        assert_eq!(
            read_json(resp).await,
            serde_json::json!({"success": true, "message": "Contact form submitted successfully"})
        );
    }

    #[tokio::test]
    async fn test_bad_email_is_rejected() {
        let dir = site_dir();
        let state = state(config_in(dir.path()));

        let resp = send(
            json_post(
                "/api/contact",
                r#"{"name":"Ann","email":"bad-email","message":"hi"}"#,
            ),
            &state,
        )
        .await;

        assert_eq!(resp.status(), 400);
        let body = read_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Validation error");
        assert_eq!(
            body["errors"],
            serde_json::json!([{"field": "email", "message": "Valid email is required"}])
        );
    }

    #[tokio::test]
    async fn test_every_invalid_field_is_reported() {
        let dir = site_dir();
        let state = state(config_in(dir.path()));

        for (payload, expected) in [
            (r"{}", vec!["name", "email", "message"]),
            (r#"{"name":"","email":"ann@example.com","message":"hi"}"#, vec!["name"]),
            (r#"{"name":"Ann","email":"ann@example.com"}"#, vec!["message"]),
            (r#"{"name":"Ann","message":"hi"}"#, vec!["email"]),
            (r#"{"name":null,"email":"x@y","message":7}"#, vec!["name", "email", "message"]),
        ] {
            let resp = send(json_post("/api/contact", payload), &state).await;
            assert_eq!(resp.status(), 400, "payload: {payload}");
            let body = read_json(resp).await;
            let fields: Vec<_> = body["errors"]
                .as_array()
                .unwrap()
                .iter()
                .map(|e| e["field"].as_str().unwrap().to_string())
                .collect();
            assert_eq!(fields, expected, "payload: {payload}");
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let dir = site_dir();
        let state = state(config_in(dir.path()));

        let resp = send(json_post("/api/contact", "{\"name\":"), &state).await;
        assert_eq!(resp.status(), 400);
        assert_eq!(read_json(resp).await["errors"][0]["field"], "body");
    }

    #[tokio::test]
    async fn test_form_encoded_contact() {
        let dir = site_dir();
        let state = state(config_in(dir.path()));

        let resp = send(
            request(
                "POST",
                "/api/contact",
                Some("application/x-www-form-urlencoded"),
                "name=Ann&email=ann%40example.com&message=hello",
            ),
            &state,
        )
        .await;
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn test_repeated_submissions_are_all_accepted() {
        let dir = site_dir();
        let state = state(config_in(dir.path()));
        let payload = r#"{"name":"Ann","email":"ann@example.com","message":"hi"}"#;

        for _ in 0..3 {
            let resp = send(json_post("/api/contact", payload), &state).await;
            assert_eq!(resp.status(), 200);
        }
    }

    #[tokio::test]
    async fn test_oversized_contact_body() {
        let dir = site_dir();
        let mut config = config_in(dir.path());
        config.http.max_body_size = 16;
        let state = state(config);

        let payload = r#"{"name":"Ann","email":"ann@example.com","message":"hi"}"#;

        // Declared length over the limit
        let mut req = json_post("/api/contact", payload);
        req.headers_mut()
            .insert("content-length", payload.len().to_string().parse().unwrap());
        assert_eq!(send(req, &state).await.status(), 413);

        // No declared length, limit enforced while reading
        assert_eq!(send(json_post("/api/contact", payload), &state).await.status(), 413);
    }

    #[tokio::test]
    async fn test_contact_relayed_when_configured() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/f/portfolio")
                    .body_contains("name=Ann")
                    .body_contains("_replyto=ann%40example.com");
                then.status(200).body(r#"{"ok":true}"#);
            })
            .await;

        let dir = site_dir();
        let mut config = config_in(dir.path());
        config.contact.relay = Some(RelayConfig {
            endpoint: server.url("/f/portfolio"),
            timeout_secs: 5,
            subject_prefix: "Portfolio Contact from".to_string(),
        });
        let state = state(config);

        let resp = send(
            json_post(
                "/api/contact",
                r#"{"name":"Ann","email":"ann@example.com","message":"hi"}"#,
            ),
            &state,
        )
        .await;
        assert_eq!(resp.status(), 200);
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_relay_failure_is_internal_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/f/portfolio");
                then.status(503);
            })
            .await;

        let dir = site_dir();
        let mut config = config_in(dir.path());
        config.contact.relay = Some(RelayConfig {
            endpoint: server.url("/f/portfolio"),
            timeout_secs: 5,
            subject_prefix: "Portfolio Contact from".to_string(),
        });
        let state = state(config);

        let resp = send(
            json_post(
                "/api/contact",
                r#"{"name":"Ann","email":"ann@example.com","message":"hi"}"#,
            ),
            &state,
        )
        .await;
        assert_eq!(resp.status(), 500);
        assert_eq!(
            read_json(resp).await,
            serde_json::json!({"success": false, "message": "Internal server error"})
        );
    }

    #[tokio::test]
    async fn test_contact_ignores_non_json_body() {
        let dir = site_dir();
        let state = state(config_in(dir.path()));

        let payload = r#"{"name":"Ann","email":"ann@example.com","message":"hi"}"#;
        let resp = send(request("POST", "/api/contact", Some("text/plain"), payload), &state).await;
        assert_eq!(resp.status(), 400);
        let body = read_json(resp).await;
        let fields: Vec<_> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["name", "email", "message"]);
    }

    #[tokio::test]
    async fn test_contact_wrong_method() {
        let dir = site_dir();
        let state = state(config_in(dir.path()));

        let resp = send(request("GET", "/api/contact", None, ""), &state).await;
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["allow"], "POST, OPTIONS");
    }

    #[tokio::test]
    async fn test_resume_download() {
        let dir = site_dir();
        fs::write(dir.path().join("public/resume.pdf"), b"%PDF-1.7 resume").unwrap();
        let state = state(config_in(dir.path()));

        let resp = send(request("GET", "/api/download-resume", None, ""), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "application/pdf");
        assert_eq!(
            resp.headers()["content-disposition"],
            "attachment; filename=\"Pratyush_Goutam_Resume.pdf\""
        );
        assert_eq!(read_body(resp).await, Bytes::from_static(b"%PDF-1.7 resume"));
    }

    #[tokio::test]
    async fn test_resume_missing() {
        let dir = site_dir();
        let state = state(config_in(dir.path()));

        let resp = send(request("GET", "/api/download-resume", None, ""), &state).await;
        assert_eq!(resp.status(), 404);
        assert_eq!(
            read_json(resp).await,
            serde_json::json!({"error": "Resume file not found"})
        );
    }

    #[tokio::test]
    async fn test_resume_head_has_headers_without_body() {
        let dir = site_dir();
        fs::write(dir.path().join("public/resume.pdf"), b"%PDF-1.7 resume").unwrap();
        let state = state(config_in(dir.path()));

        let resp = send(request("HEAD", "/api/download-resume", None, ""), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-length"], "15");
        assert_eq!(
            resp.headers()["content-disposition"],
            "attachment; filename=\"Pratyush_Goutam_Resume.pdf\""
        );
        assert!(read_body(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_resume_unreadable_is_500() {
        let dir = site_dir();
        // A directory in place of the file fails with something other than NotFound
        fs::create_dir_all(dir.path().join("public/resume.pdf")).unwrap();
        let state = state(config_in(dir.path()));

        let resp = send(request("GET", "/api/download-resume", None, ""), &state).await;
        assert_eq!(resp.status(), 500);
        assert_eq!(
            read_json(resp).await,
            serde_json::json!({"error": "Failed to download resume"})
        );
    }

    #[tokio::test]
    async fn test_resume_redirect_mode() {
        let dir = site_dir();
        let mut config = config_in(dir.path());
        config.resume = ResumeConfig::Redirect {
            target: "/resume.pdf".to_string(),
        };
        let state = state(config);

        let resp = send(request("GET", "/api/download-resume", None, ""), &state).await;
        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers()["location"], "/resume.pdf");
    }

    #[tokio::test]
    async fn test_unknown_api_path_is_json_404() {
        let dir = site_dir();
        let state = state(config_in(dir.path()));

        let resp = send(request("GET", "/api/unknown", None, ""), &state).await;
        assert_eq!(resp.status(), 404);
        assert_eq!(read_json(resp).await, serde_json::json!({"error": "Not Found"}));
    }

    #[tokio::test]
    async fn test_static_fallback_and_methods() {
        let dir = site_dir();
        let state = state(config_in(dir.path()));

        let resp = send(request("GET", "/education", None, ""), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(read_body(resp).await, Bytes::from_static(b"<html>portfolio</html>"));

        let resp = send(request("DELETE", "/education", None, ""), &state).await;
        assert_eq!(resp.status(), 405);
    }

    #[tokio::test]
    async fn test_options_and_common_headers() {
        let dir = site_dir();
        let state = state(config_in(dir.path()));

        let resp = send(request("OPTIONS", "/api/contact", None, ""), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(resp.headers()["server"], "portfolio-server/0.1");
    }

    #[tokio::test]
    async fn test_health_probes() {
        let dir = site_dir();
        let state = state(config_in(dir.path()));

        let resp = send(request("GET", "/healthz", None, ""), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(read_body(resp).await, Bytes::from_static(b"ok"));

        let resp = send(request("GET", "/readyz", None, ""), &state).await;
        assert_eq!(resp.status(), 200);
    }
}
