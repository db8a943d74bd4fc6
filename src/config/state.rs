// Application state module
// Shared, read-only state handed to every request

use super::types::Config;
use crate::contact::{FormRelay, RelayError};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Present when `contact.relay` is configured
    pub relay: Option<FormRelay>,
}

impl AppState {
    /// Build state from configuration, constructing the relay client if enabled
    pub fn new(config: Config) -> Result<Self, RelayError> {
        let relay = config
            .contact
            .relay
            .as_ref()
            .map(FormRelay::new)
            .transpose()?;

        Ok(Self { config, relay })
    }
}
