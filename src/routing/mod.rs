//! Route matching, middleware aggregation and request dispatch.
//!
//! Routes and middleware are registered on a [`RouterBuilder`] during
//! application setup and frozen into an immutable [`Router`] that the server
//! shares between connections.

mod builder;
mod error;
mod handler;
mod middleware;
mod pattern;
mod router;
mod table;

// Re-export public items
pub use builder::RouterBuilder;
pub use error::{Error, Rejection};
pub use handler::{Handler, HandlerArgs, HandlerFuture, Middleware, MiddlewareFuture};
pub use middleware::{MiddlewareRegistry, GLOBAL_SCOPE};
pub use pattern::{PathParams, PathPattern};
pub use router::{Router, NOT_FOUND_BODY};
pub use table::{Route, RouteMatch, RouteTable};
