//! Error types for routing and dispatch.

use std::fmt;
use thiserror::Error;

use crate::parser::Method;
use crate::server::StatusCode;

/// Errors produced while registering routes or resolving a request.
#[derive(Debug, Error)]
pub enum Error {
    /// A route pattern could not be compiled.
    #[error("Invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// No route matched both the path and the method.
    #[error("No route for {method} {path}")]
    RouteNotFound { method: Method, path: String },

    /// A middleware failed, so the handler was never invoked.
    #[error("Middleware rejected request: {0}")]
    MiddlewareRejected(Rejection),

    /// The handler returned an error or panicked.
    #[error("Handler failed: {0}")]
    HandlerFailure(String),
}

/// The failure value of a middleware.
///
/// The reason becomes the response body. Without an explicit status the
/// response keeps the transport default of 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub reason: String,
    pub status: Option<StatusCode>,
}

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}
