//! API query and error types.

use serde::{Deserialize, Serialize};

/// Optional locality for the tariff endpoint.
#[derive(Debug, Deserialize)]
pub struct TariffQuery {
    pub locality: Option<String>,
}

/// Error response body for 4xx/5xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
