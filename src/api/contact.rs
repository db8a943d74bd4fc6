// Contact form endpoint

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};

use super::response::{json_response, ContactResponse};
use crate::config::AppState;
use crate::contact::{self, ContactError};
use crate::http;
use crate::logger;

/// `POST /api/contact`
pub async fn handle_contact<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let content_type = req
        .headers()
        .get(hyper::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);
    let body = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Contact body exceeded {limit} bytes"));
            return http::build_413_response();
        }
        Err(e) => {
            logger::log_error(&format!("Failed to read contact body: {e}"));
            return json_response(StatusCode::INTERNAL_SERVER_ERROR, &ContactResponse::failed());
        }
    };

    match process(&body, content_type.as_deref(), state).await {
        Ok(()) => json_response(StatusCode::OK, &ContactResponse::accepted()),
        Err(ContactError::Validation(errors)) => {
            logger::log_debug(&format!("Contact submission rejected: {errors:?}"));
            json_response(StatusCode::BAD_REQUEST, &ContactResponse::rejected(&errors))
        }
        Err(e) => {
            logger::log_error(&format!("Contact submission failed: {e}"));
            json_response(StatusCode::INTERNAL_SERVER_ERROR, &ContactResponse::failed())
        }
    }
}

async fn process(
    body: &[u8],
    content_type: Option<&str>,
    state: &AppState,
) -> Result<(), ContactError> {
    let submission = contact::accept(body, content_type)?;
    contact::submit(state, &submission).await
}
