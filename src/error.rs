/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Error type shared by every client family
//!
//! Nothing in this crate retries or falls back: each failure is returned to the
//! caller as an [`AppError`] at the point it happened.

use std::fmt;

/// Main error type for the library
#[derive(Debug)]
pub enum AppError {
    /// An operation needed resolved settings but none were available
    MissingSettings,
    /// An auth mode was selected without the fields it requires
    MissingCredentials(String),
    /// A login status code outside of `200..=599` was registered
    InvalidStatusCode(u16),
    /// The login response status was not in the accepted set
    SessionLoginFailed(u16),
    /// The configured data key is absent from a response body
    DataKeyNotFound(String),
    /// Opaque failure raised by the HTTP transport
    Transport(reqwest::Error),
    /// The response body could not be parsed or deserialized
    Json(serde_json::Error),
    /// A URL could not be parsed
    InvalidUrl(String),
    /// A header name or value is not valid HTTP
    InvalidHeader(String),
    /// A caller supplied argument is invalid
    InvalidInput(String),
    /// I/O failure
    Io(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingSettings => write!(f, "missing settings"),
            AppError::MissingCredentials(what) => write!(f, "missing credentials: {what}"),
            AppError::InvalidStatusCode(code) => write!(f, "invalid status code: {code}"),
            AppError::SessionLoginFailed(status) => {
                write!(f, "session login failed with status {status}")
            }
            AppError::DataKeyNotFound(key) => write!(f, "data key not found: {key}"),
            AppError::Transport(e) => write!(f, "transport error: {e}"),
            AppError::Json(e) => write!(f, "json error: {e}"),
            AppError::InvalidUrl(msg) => write!(f, "invalid url: {msg}"),
            AppError::InvalidHeader(msg) => write!(f, "invalid header: {msg}"),
            AppError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            AppError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Transport(e) => Some(e),
            AppError::Json(e) => Some(e),
            AppError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Transport(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}

impl From<reqwest::header::InvalidHeaderName> for AppError {
    fn from(e: reqwest::header::InvalidHeaderName) -> Self {
        AppError::InvalidHeader(e.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for AppError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        AppError::InvalidHeader(e.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(e: url::ParseError) -> Self {
        AppError::InvalidUrl(e.to_string())
    }
}

/// Result alias used across the crate
pub type AppResult<T> = Result<T, AppError>;
