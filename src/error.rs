//! Error handling for the folio admin client

use std::fmt;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Fallback shown when a failed response carries no readable message
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Unified error type for the folio admin client
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or rejected session token
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Network unreachable, connection reset or request cancelled
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Non-2xx response from the API
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Field-level validation failures, produced locally
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Arguments rejected before any request was built
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Session persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new transport error
    pub fn transport<T: fmt::Display>(msg: T) -> Self {
        Error::Transport(msg.to_string())
    }

    /// Create a new server error
    pub fn server<T: fmt::Display>(status: u16, msg: T) -> Self {
        Error::Server {
            status,
            message: msg.to_string(),
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidInput(msg.to_string())
    }

    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// True for errors that mean the session is missing or was rejected
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// True for network level failures, timeouts included
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout)
    }

    /// HTTP status of a server error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            Error::Auth(_) => "Your session has expired. Please log in again.".to_string(),
            Error::Transport(_) | Error::Timeout => {
                "Unable to reach the server. Please check your connection.".to_string()
            }
            Error::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            Error::Server { .. } => GENERIC_FAILURE_MESSAGE.to_string(),
            Error::Validation(errors) => errors.to_string(),
            Error::InvalidInput(msg) => msg.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_decode() {
            Error::Transport(format!("failed to decode response: {}", err))
        } else {
            Error::Transport(err.to_string())
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
