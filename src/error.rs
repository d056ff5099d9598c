// src/error.rs

//! Unified error handling for the scraper.

use std::fmt;

use thiserror::Error;

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Identifier or URL could not be resolved to a video id
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP 404, or a detail page whose body reads as "not found"
    #[error("Not found: {0}")]
    NotFound(String),

    /// Tag page whose body reads as "not found"
    #[error("Tag not found: {0}")]
    TagNotFound(String),

    /// Non-2xx status, connection failure or timeout
    #[error("Network error for {url}: {message}")]
    Network {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// A listing-based query produced nothing
    #[error("No results: {0}")]
    NoResults(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a transport failure error carrying the underlying cause.
    pub fn network(url: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self::Network {
            url: url.into(),
            status: None,
            message: cause.to_string(),
        }
    }

    /// Create an error for an unexpected HTTP status.
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Network {
            url: url.into(),
            status: Some(status),
            message: format!("HTTP status {status}"),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error means the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::TagNotFound(_))
    }

    /// HTTP status code attached to a network error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            _ => None,
        }
    }
}
