//! Route and middleware registration.

use std::future::Future;
use std::sync::Arc;
use serde_json::Value;

use crate::parser::{HttpRequest, Method};
use crate::routing::error::{Error, Rejection};
use crate::routing::handler::{Handler, HandlerArgs, HandlerFuture, Middleware, MiddlewareFuture};
use crate::routing::middleware::MiddlewareRegistry;
use crate::routing::pattern::PathPattern;
use crate::routing::router::Router;
use crate::routing::table::RouteTable;
use crate::server::{Error as ServerError, ResponseValue};

/// Collects routes and middleware during application setup.
///
/// Nothing registered here is visible to requests until [`build`] freezes
/// the builder into a [`Router`].
///
/// [`build`]: RouterBuilder::build
#[derive(Debug, Default)]
pub struct RouterBuilder {
    routes: RouteTable,
    middleware: MiddlewareRegistry,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `method` on `pattern`.
    ///
    /// Fails only if the pattern does not compile.
    pub fn route<F, Fut>(&mut self, method: Method, pattern: &str, handler: F) -> Result<&mut Self, Error>
    where
        F: Fn(HandlerArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResponseValue, ServerError>> + Send + 'static,
    {
        let pattern = PathPattern::parse(pattern)?;
        let handler: Handler = Arc::new(move |args: HandlerArgs| -> HandlerFuture {
            Box::pin(handler(args))
        });

        self.routes.register(pattern, method, handler);
        Ok(self)
    }

    pub fn get<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, Error>
    where
        F: Fn(HandlerArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResponseValue, ServerError>> + Send + 'static,
    {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, Error>
    where
        F: Fn(HandlerArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResponseValue, ServerError>> + Send + 'static,
    {
        self.route(Method::POST, pattern, handler)
    }

    pub fn put<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, Error>
    where
        F: Fn(HandlerArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResponseValue, ServerError>> + Send + 'static,
    {
        self.route(Method::PUT, pattern, handler)
    }

    pub fn delete<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, Error>
    where
        F: Fn(HandlerArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResponseValue, ServerError>> + Send + 'static,
    {
        self.route(Method::DELETE, pattern, handler)
    }

    /// Register middleware under `scope`.
    ///
    /// `scope` is either [`GLOBAL_SCOPE`](crate::routing::GLOBAL_SCOPE) or an
    /// exact request path.
    pub fn middleware<F, Fut>(&mut self, scope: &str, middleware: F) -> &mut Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, Rejection>> + Send + 'static,
    {
        let middleware: Middleware = Arc::new(move |request: HttpRequest| -> MiddlewareFuture {
            Box::pin(middleware(request))
        });

        self.middleware.register(scope, middleware);
        self
    }

    /// Freeze the registrations into a read-only router.
    pub fn build(self) -> Router {
        Router::new(self.routes, self.middleware)
    }
}
