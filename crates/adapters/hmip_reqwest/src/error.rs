//! HomematicIP adapter error types.

use hmipbridge_domain::error::BridgeError;

/// Errors specific to the HomematicIP adapter.
#[derive(Debug, thiserror::Error)]
pub enum HmipError {
    /// A required configuration value is missing.
    #[error("invalid HomematicIP configuration: {0}")]
    InvalidConfig(&'static str),

    /// A credential cannot be sent as an HTTP header.
    #[error("invalid header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The request could not be sent or the response not read.
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("HomematicIP API returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body, for diagnostics.
        body: String,
    },

    /// The response payload is not valid JSON of the expected shape.
    #[error("failed to decode HomematicIP payload")]
    Decode(#[source] serde_json::Error),
}

impl HmipError {
    /// Convert into a [`BridgeError::Vendor`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> BridgeError {
        BridgeError::vendor(self)
    }
}

impl From<HmipError> for BridgeError {
    fn from(err: HmipError) -> Self {
        err.into_domain()
    }
}
