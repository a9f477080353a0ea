//! Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PungoError>;

/// Errors shared across the Pungo backend
#[derive(Error, Debug)]
pub enum PungoError {
    /// Missing or malformed request fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database read or write failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Upstream service call failure (payment provider etc.)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PungoError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, PungoError::Persistence(_) | PungoError::Upstream(_))
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            PungoError::Validation(_) => "Invalid request. Please check your input.",
            PungoError::Persistence(_) => "We could not save your data. Please try again.",
            PungoError::Upstream(_) => "An external service failed. Please try again.",
            PungoError::Config(_) => "Service configuration error.",
        }
    }
}
