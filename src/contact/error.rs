//! Contact error types

use serde::Serialize;
use thiserror::Error;

/// One invalid input field and the message shown for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("relay delivery failed: {0}")]
    Relay(#[from] RelayError),
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed to build relay client: {0}")]
    Client(reqwest::Error),

    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("relay rejected submission with status {0}")]
    Rejected(reqwest::StatusCode),
}
