//! Error types for the GData client.
//!
//! A single `GDataError` covers the whole crate: the normalization core only
//! ever produces `MalformedDocument` and `PageLimitExceeded`, the rest come
//! from the transport, the login flow and the resource methods.

use thiserror::Error;

/// Main error type for the client library.
#[derive(Debug, Error)]
pub enum GDataError {
    /// A call that needs a session was made before authenticating.
    #[error("Authentication required: call authenticate() before accessing this feed")]
    AuthenticationRequired,

    /// A caller-supplied argument was rejected before any request was made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The service answered with a status the resource method does not accept.
    #[error("Remote service returned status {status}{}", body_suffix(.body))]
    RemoteService { status: u16, body: String },

    /// The response body is not well-formed XML.
    #[error("Malformed document: {0}")]
    MalformedDocument(#[from] roxmltree::Error),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// All retry attempts for an idempotent request failed.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// ClientLogin rejected the credentials.
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// A pagination walk fetched more pages than allowed.
    #[error("Pagination stopped after {limit} pages")]
    PageLimitExceeded { limit: usize },

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, GDataError>;
