//! Error types for the findings listing snippets

use std::time::Duration;
use thiserror::Error;

/// Result type alias for findings operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the listing procedures.
///
/// Each variant prefixes the underlying client error with the short
/// human-readable step identifier; the cause is part of the message, so it
/// is not additionally exposed as a source.
#[derive(Debug, Error)]
pub enum Error {
    /// The Security Command Center client handle could not be constructed.
    #[error("Error instantiating client: {0}")]
    ClientInit(ApiError),

    /// A page fetch or item decode failed while walking the listing.
    #[error("Error listing sources: {0}")]
    Listing(ApiError),

    /// The computed read-time could not be represented in the wire encoding.
    #[error("Error converting five days ago: {0}")]
    TimeConversion(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// API-related errors from the Security Command Center client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request was not authenticated. Application default credentials are required.")]
    Unauthorized,

    #[error("Access denied. The caller lacks permission on this resource.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
