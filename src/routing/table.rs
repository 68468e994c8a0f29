//! The ordered route table.

use std::fmt;

use crate::parser::Method;
use crate::routing::handler::Handler;
use crate::routing::pattern::{PathParams, PathPattern};

/// A registered (pattern, method, handler) triple.
pub struct Route {
    pub pattern: PathPattern,
    pub method: Method,
    pub handler: Handler,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// A route selected for a request, with the captures it produced.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: PathParams,
}

/// Routes in registration order.
///
/// Lookup is first-match: the earliest route whose method and pattern both
/// match wins, so a later duplicate is unreachable.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Duplicates are accepted.
    pub fn register(&mut self, pattern: PathPattern, method: Method, handler: Handler) {
        self.routes.push(Route {
            pattern,
            method,
            handler,
        });
    }

    /// Find the first route matching both `path` and `method`.
    pub fn find(&self, path: &str, method: Method) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| {
                route
                    .pattern
                    .match_path(path)
                    .map(|params| RouteMatch { route, params })
            })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}
