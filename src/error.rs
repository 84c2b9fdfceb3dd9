//! Error types and handling for `AirMap`

use thiserror::Error;

/// Main error type for the `AirMap` service
#[derive(Error, Debug)]
pub enum AirMapError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Network, timeout, HTTP status or body decoding failures talking to WAQI
    #[error("Upstream request failed: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    /// WAQI answered with `status: "error"` (bad token, over quota, ...)
    #[error("Upstream rejected request: {message}")]
    UpstreamRejected { message: String },

    /// WAQI answered, but not in the envelope shape we expect
    #[error("Malformed upstream payload: {message}")]
    MalformedPayload { message: String },
}

impl AirMapError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream rejection error
    pub fn rejected<S: Into<String>>(message: S) -> Self {
        Self::UpstreamRejected {
            message: message.into(),
        }
    }

    /// Create a new malformed payload error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// Whether the upstream answered badly or not at all, as opposed to a
    /// local fault
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AirMapError::Transport { .. }
                | AirMapError::UpstreamRejected { .. }
                | AirMapError::MalformedPayload { .. }
        )
    }
}
