//! A minimal HTTP request router.
//!
//! Routes pair a path pattern with a method and an async handler. Middleware
//! is registered either globally or for one exact path; for every matched
//! request the applicable middleware runs concurrently and its results are
//! handed to the handler in registration order. Handler results are shaped
//! into a single HTTP response.
//!
//! # Features
//!
//! - First-match routing over `:param`, `*splat` and optional `( … )` patterns
//! - Global and per-path middleware with deterministic result ordering
//! - Fail-fast middleware: one rejection skips the handler
//! - Handler errors and panics mapped to `500 Internal Server Error`
//! - A small tokio server with connection limiting and graceful shutdown
//!
//! # Examples
//!
//! ```
//! use microroute_rs::{HttpRequest, Method, Rejection, ResponseValue, Router, GLOBAL_SCOPE};
//! use serde::Serialize;
//! use serde_json::Value;
//!
//! #[derive(Serialize)]
//! struct User<'a> {
//!     id: &'a str,
//!     role: &'a str,
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = Router::builder();
//! builder.middleware(GLOBAL_SCOPE, |_req: HttpRequest| async {
//!     Ok::<_, Rejection>(Value::from("admin"))
//! });
//! builder.get("/users/:id", |args| async move {
//!     let role = args.middleware[0].as_str().unwrap_or_default();
//!     ResponseValue::json(&User { id: &args.params[0], role })
//! })?;
//! let router = builder.build();
//!
//! let request = HttpRequest::from_target(Method::GET, "/users/42")?;
//! let response = router.dispatch(request).await;
//! assert_eq!(response.status.as_u16(), 200);
//! assert_eq!(response.body, br#"{"id":"42","role":"admin"}"#);
//! # Ok(())
//! # }
//! ```
//!
//! See `demos/users_api.rs` for a complete server.

// Request-line parsing
pub mod parser;

// Route matching, middleware and dispatch
pub mod routing;

// Response shaping and the TCP server
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, HttpRequest, HttpVersion, Method, QueryParams, parse_request};
pub use routing::{
    Error as RoutingError, HandlerArgs, PathParams, PathPattern, Rejection, Router, RouterBuilder,
    GLOBAL_SCOPE, NOT_FOUND_BODY,
};
pub use server::{
    Error as ServerError, HttpResponse, HttpServer, ResponseDescriptor, ResponseValue, ServerConfig,
    StatusCode, shape,
};
