//! Form relay client
//!
//! Forwards accepted submissions to a third-party form service that turns
//! them into email. One attempt per submission; failures surface to the caller.

use reqwest::header::ACCEPT;
use std::time::Duration;

use super::error::RelayError;
use super::validate::ContactSubmission;
use crate::config::RelayConfig;

pub struct FormRelay {
    client: reqwest::Client,
    endpoint: String,
    subject_prefix: String,
}

impl FormRelay {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(RelayError::Client)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            subject_prefix: config.subject_prefix.clone(),
        })
    }

    /// Form fields sent to the relay, including its `_subject`/`_replyto` hints
    fn form_fields(&self, submission: &ContactSubmission) -> [(&'static str, String); 5] {
        [
            ("name", submission.name.clone()),
            ("email", submission.email.clone()),
            ("message", submission.message.clone()),
            (
                "_subject",
                format!("{} {}", self.subject_prefix, submission.name),
            ),
            ("_replyto", submission.email.clone()),
        ]
    }

    pub async fn deliver(&self, submission: &ContactSubmission) -> Result<(), RelayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .form(&self.form_fields(submission))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RelayError::Rejected(status))
        }
    }
}
