//! Error types for linear-mcp.

use thiserror::Error;

/// Main error type for linear-mcp operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(String),

    /// Credential rejected by the upstream service (401/403)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned an error
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Upstream returned a 5xx status
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Map a non-success HTTP status and body to an error.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Error::Unauthorized(message),
            404 => Error::NotFound(message),
            500..=599 => Error::ServerError { status, message },
            _ => Error::Api { status, message },
        }
    }

    /// Short machine-readable name of the error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Http(_) => "http",
            Error::Unauthorized(_) => "unauthorized",
            Error::NotFound(_) => "not_found",
            Error::Api { .. } => "api",
            Error::ServerError { .. } => "server_error",
            Error::InvalidData(_) => "invalid_data",
            Error::Config(_) => "config",
        }
    }
}

/// Result type alias for linear-mcp operations.
pub type Result<T> = std::result::Result<T, Error>;
