// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the session client
//!
//! Only construction reports errors directly. Request failures are absorbed
//! by [`SessionClient`](crate::SessionClient) and exposed through
//! `last_error()`, so most of these variants reach callers that way.

use thiserror::Error;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the session client
#[derive(Error, Debug)]
pub enum Error {
    /// Identifier is empty, whitespace-only or not usable as a file name
    #[error("Identifier isn't valid: {identifier:?}")]
    InvalidIdentifier { identifier: String },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Caller supplied a header that cannot go on the wire
    #[error("Invalid header '{name}': {reason}")]
    Header { name: String, reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid identifier error
    pub fn invalid_identifier(identifier: impl Into<String>) -> Self {
        Error::InvalidIdentifier {
            identifier: identifier.into(),
        }
    }

    /// Create an invalid header error
    pub fn header(name: impl Into<String>, reason: impl ToString) -> Self {
        Error::Header {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if this is an invalid identifier error
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(self, Error::InvalidIdentifier { .. })
    }

    /// Check if the request never completed on the network
    pub fn is_network(&self) -> bool {
        match self {
            Error::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_timeout())
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Http(e) => e.url().map(|u| u.as_str()),
            _ => None,
        }
    }
}
