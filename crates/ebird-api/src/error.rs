//! Error types for the eBird API client

use std::fmt;

/// Errors that can occur when talking to the eBird API
#[derive(Debug)]
pub enum EbirdError {
    /// HTTP request failed (connection, timeout, body read)
    Http(reqwest::Error),
    /// Failed to parse JSON response
    Json(serde_json::Error),
    /// The API answered with a non-success status
    Upstream { status: u16, endpoint: String },
    /// The client was constructed without an API token
    MissingToken,
}

impl fmt::Display for EbirdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "eBird HTTP error: {}", e),
            Self::Json(e) => write!(f, "eBird JSON parse error: {}", e),
            Self::Upstream { status, endpoint } => {
                write!(f, "eBird API returned status {} for {}", status, endpoint)
            }
            Self::MissingToken => write!(f, "eBird API token is empty"),
        }
    }
}

impl std::error::Error for EbirdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for EbirdError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<serde_json::Error> for EbirdError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Result type for eBird API operations
pub type Result<T> = std::result::Result<T, EbirdError>;
