// API response utility functions module

use crate::contact::FieldError;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

pub const CONTACT_SUCCESS: &str = "Contact form submitted successfully";
pub const VALIDATION_ERROR: &str = "Validation error";
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Body of every `/api/contact` response
#[derive(Debug, Serialize)]
pub struct ContactResponse<'a> {
    pub success: bool,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a [FieldError]>,
}

impl<'a> ContactResponse<'a> {
    pub const fn accepted() -> Self {
        Self {
            success: true,
            message: CONTACT_SUCCESS,
            errors: None,
        }
    }

    pub const fn rejected(errors: &'a [FieldError]) -> Self {
        Self {
            success: false,
            message: VALIDATION_ERROR,
            errors: Some(errors),
        }
    }

    pub const fn failed() -> Self {
        Self {
            success: false,
            message: INTERNAL_ERROR,
            errors: None,
        }
    }
}

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .body(Full::new(Bytes::from(
                    r#"{"success":false,"message":"Internal server error"}"#,
                )))
                .unwrap_or_else(|_| http::empty_response());
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            http::empty_response()
        })
}

/// `{"error": message}` body with the given status
pub fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &serde_json::json!({ "error": message }))
}

/// 404 Not Found response for unknown API paths
pub fn not_found() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}

/// 405 Method Not Allowed response for known API paths
pub fn method_not_allowed(allow: &'static str) -> Response<Full<Bytes>> {
    let mut response = error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    response
        .headers_mut()
        .insert(hyper::header::ALLOW, hyper::header::HeaderValue::from_static(allow));
    response
}
