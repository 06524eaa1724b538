//! Error types for HubSpot API operations.

use thiserror::Error;

/// Errors that can occur during HubSpot API operations.
#[derive(Debug, Error)]
pub enum HubSpotError {
    /// Configuration is missing or incomplete.
    #[error("HubSpot configuration required: {0}")]
    ConfigMissing(String),

    /// A local precondition failed before any request was sent.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The remote API answered with a non-success status.
    #[error("HubSpot API error: {status} {description}")]
    Remote {
        status: u16,
        description: String,
        /// Raw response body, kept for diagnostics.
        body: Option<String>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON could not be produced or parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl HubSpotError {
    /// HTTP status of a remote failure, if this is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the remote API reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Result type alias for HubSpot operations.
pub type Result<T> = core::result::Result<T, HubSpotError>;
