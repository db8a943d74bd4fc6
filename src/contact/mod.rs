//! Contact submission module
//!
//! A submission is received, validated or rejected, then acknowledged.
//! Accepted submissions are written to the audit log and either handed to
//! the configured form relay or acknowledged after a fixed delay.

mod error;
mod relay;
mod validate;

pub use error::{ContactError, FieldError, RelayError};
pub use relay::FormRelay;
pub use validate::ContactSubmission;

use validate::{parse_body, validate};

use chrono::Local;
use std::time::Duration;

use crate::config::AppState;
use crate::logger;

/// Render the audit record for an accepted submission as one JSON line
pub fn audit_record(submission: &ContactSubmission) -> String {
    serde_json::json!({
        "event": "contact_submission",
        "time": Local::now().to_rfc3339(),
        "name": submission.name,
        "email": submission.email,
        "message": submission.message,
    })
    .to_string()
}

/// Parse and validate a request body
pub fn accept(body: &[u8], content_type: Option<&str>) -> Result<ContactSubmission, ContactError> {
    let raw = parse_body(body, content_type).map_err(|e| ContactError::Validation(vec![e]))?;
    validate(raw).map_err(ContactError::Validation)
}

/// Log an accepted submission and deliver it
pub async fn submit(state: &AppState, submission: &ContactSubmission) -> Result<(), ContactError> {
    logger::log_contact_submission(&audit_record(submission));

    match &state.relay {
        Some(relay) => relay.deliver(submission).await?,
        None => {
            tokio::time::sleep(Duration::from_millis(state.config.contact.ack_delay_ms)).await;
        }
    }

    Ok(())
}
