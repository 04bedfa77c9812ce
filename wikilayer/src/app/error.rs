//! Application error types.

use std::fmt;

use crate::wikipedia::WikipediaError;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Configuration file could not be read or parsed.
    Config(String),

    /// Failed to create the HTTP client.
    HttpClient(WikipediaError),

    /// Simulator connector failure.
    Connector(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            AppError::HttpClient(e) => {
                write!(f, "Failed to create HTTP client: {}", e)
            }
            AppError::Connector(msg) => {
                write!(f, "Simulator connector error: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(_) => None,
            AppError::HttpClient(e) => Some(e),
            AppError::Connector(_) => None,
        }
    }
}

impl From<ini::Error> for AppError {
    fn from(e: ini::Error) -> Self {
        AppError::Config(e.to_string())
    }
}
