//! Handler and middleware signatures.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use serde_json::Value;

use crate::parser::{HttpRequest, QueryParams};
use crate::routing::error::Rejection;
use crate::routing::pattern::PathParams;
use crate::server::{Error, ResponseValue};

/// Type alias for the boxed future a handler returns.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<ResponseValue, Error>> + Send>>;

/// A route handler, invoked with the captures, query and middleware results.
pub type Handler = Arc<dyn Fn(HandlerArgs) -> HandlerFuture + Send + Sync>;

/// Type alias for the boxed future a middleware returns.
pub type MiddlewareFuture = Pin<Box<dyn Future<Output = Result<Value, Rejection>> + Send>>;

/// A middleware, run before the handler with its own copy of the request.
pub type Middleware = Arc<dyn Fn(HttpRequest) -> MiddlewareFuture + Send + Sync>;

/// Everything a handler receives for one request.
#[derive(Debug, Clone, Default)]
pub struct HandlerArgs {
    /// Pattern captures, in the order the pattern declares them.
    pub params: PathParams,
    /// Parsed query string.
    pub query: QueryParams,
    /// Resolved middleware values: global scope first, then the path scope,
    /// each in registration order.
    pub middleware: Vec<Value>,
}
