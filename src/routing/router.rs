//! Request dispatch.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use futures::future::try_join_all;
use futures::FutureExt;
use log::{debug, error, warn};

use crate::parser::HttpRequest;
use crate::routing::builder::RouterBuilder;
use crate::routing::error::{Error, Rejection};
use crate::routing::handler::HandlerArgs;
use crate::routing::middleware::MiddlewareRegistry;
use crate::routing::table::{RouteMatch, RouteTable};
use crate::server::{shape, Error as ServerError, HttpResponse, ResponseValue, StatusCode};

/// Body of the response sent when no route matches.
pub const NOT_FOUND_BODY: &str = "Resource not found";

/// A frozen set of routes and middleware.
///
/// A request moves through the router as follows:
///
/// 1. The route table is searched for the first route whose pattern and
///    method both match. If none does, the request ends with a 404.
/// 2. The global middleware and the middleware registered for the exact
///    path are started together and awaited as a group.
/// 3. If any middleware rejects, the handler is skipped and the rejection
///    becomes the response.
/// 4. Otherwise the handler runs with the captures, the query and the
///    middleware values, and its result is shaped into the response.
#[derive(Debug)]
pub struct Router {
    routes: RouteTable,
    middleware: MiddlewareRegistry,
}

impl Router {
    pub(crate) fn new(routes: RouteTable, middleware: MiddlewareRegistry) -> Self {
        Self { routes, middleware }
    }

    /// Start registering routes.
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn middleware(&self) -> &MiddlewareRegistry {
        &self.middleware
    }

    /// Run a request through the pipeline without shaping the outcome.
    ///
    /// The error variants are the dispatch failure taxonomy:
    /// [`Error::RouteNotFound`], [`Error::MiddlewareRejected`] and
    /// [`Error::HandlerFailure`].
    pub async fn resolve(&self, request: HttpRequest) -> Result<ResponseValue, Error> {
        let RouteMatch { route, params } = self
            .routes
            .find(&request.path, request.method)
            .ok_or_else(|| Error::RouteNotFound {
                method: request.method,
                path: request.path.clone(),
            })?;

        debug!(
            "{method} {path} matched {pattern}",
            method = request.method,
            path = request.path,
            pattern = route.pattern.as_str()
        );

        let chain = self.middleware.resolve(&request.path);
        let middleware = if chain.is_empty() {
            Vec::new()
        } else {
            debug!("Running {len} middleware for {path}", len = chain.len(), path = request.path);
            // try_join_all yields results in input order, whatever order they settle in
            try_join_all(chain.into_iter().map(|middleware| {
                let request = request.clone();
                // A panicking middleware fails the group like a rejection
                AssertUnwindSafe(async move { middleware(request).await })
                    .catch_unwind()
                    .map(middleware_outcome)
            }))
            .await
            .map_err(Error::MiddlewareRejected)?
        };

        let args = HandlerArgs {
            params,
            query: request.query,
            middleware,
        };

        let handler = &route.handler;
        match AssertUnwindSafe(async move { handler(args).await }).catch_unwind().await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(ServerError::InternalError(message))) => Err(Error::HandlerFailure(message)),
            Ok(Err(e)) => Err(Error::HandlerFailure(e.to_string())),
            Err(panic) => Err(Error::HandlerFailure(format!("handler {}", panic_message(&*panic)))),
        }
    }

    /// Run a request through the pipeline and produce exactly one response.
    pub async fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        let method = request.method;
        let path = request.path.clone();

        match self.resolve(request).await {
            Ok(value) => shape(&value),
            Err(Error::RouteNotFound { .. }) => {
                debug!("No route for {method} {path}");
                not_found()
            }
            Err(Error::MiddlewareRejected(rejection)) => {
                warn!("Middleware rejected {method} {path}: {rejection}");
                HttpResponse::new(rejection.status.unwrap_or(StatusCode::OK))
                    .with_body_string(rejection.reason)
            }
            Err(e) => {
                error!("Error handling {method} {path}: {e}");
                let message = match e {
                    Error::HandlerFailure(message) => message,
                    other => other.to_string(),
                };
                HttpResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                    .with_content_type("text/plain")
                    .with_body_string(format!("Internal server error: {message}"))
            }
        }
    }
}

/// The fixed response for requests that match no route.
fn not_found() -> HttpResponse {
    HttpResponse::new(StatusCode::NOT_FOUND)
        .with_content_type("text/plain")
        .with_body_string(NOT_FOUND_BODY)
}

fn middleware_outcome(
    outcome: std::thread::Result<Result<serde_json::Value, Rejection>>,
) -> Result<serde_json::Value, Rejection> {
    outcome.unwrap_or_else(|panic| {
        Err(Rejection::new(format!("middleware {}", panic_message(&*panic)))
            .with_status(StatusCode::INTERNAL_SERVER_ERROR))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}
