//! Error types for the AZCC domain.
//!
//! Each bounded context has its own `thiserror` enum; only configuration and
//! client-initialization failures are fatal to the process.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Deployment not found: {0}")]
    ModelNotFound(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// A failed model request, as seen by the caller of a session.
///
/// Recoverable: the turn produces no response and nothing is recorded.
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("The model returned an empty response")]
    EmptyResponse,
}

/// The completion client could not be constructed.
#[derive(Debug, Clone, Error)]
pub enum ClientInitError {
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to load history from {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("Failed to save history to {path}: {reason}")]
    Save { path: PathBuf, reason: String },

    #[error("Failed to export history to {path}: {reason}")]
    Export { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Context path '{0}' does not exist")]
    PathNotFound(PathBuf),

    #[error("Failed to read {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Invalid file pattern: {0}")]
    Pattern(String),
}
