//! Error types for the HTTP server.

use thiserror::Error;

use crate::parser::Error as ParserError;
use crate::routing::Error as RoutingError;

/// Errors that can occur during HTTP server operation.
///
/// Handlers return this type, so anything they propagate with `?` ends up as
/// a 500 response.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Route registration or dispatch error.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// A configuration variable could not be used.
    #[error("Invalid value {value:?} for {var}: {reason}")]
    InvalidConfig {
        var: String,
        value: String,
        reason: String,
    },

    /// A status code outside `100..=999`.
    #[error("Invalid status code: {0}")]
    InvalidStatus(u16),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    InternalError(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
