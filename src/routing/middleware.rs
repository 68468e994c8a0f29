//! Scoped middleware registry.

use std::collections::HashMap;
use std::fmt;

use crate::routing::handler::Middleware;

/// Scope key for middleware that runs on every matched request.
pub const GLOBAL_SCOPE: &str = "*";

/// Middleware lists keyed by scope.
///
/// A scope is either [`GLOBAL_SCOPE`] or an exact request path. Path scopes
/// are compared by string equality, not matched as route patterns.
#[derive(Default)]
pub struct MiddlewareRegistry {
    scopes: HashMap<String, Vec<Middleware>>,
}

impl MiddlewareRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `middleware` to the list for `scope`.
    pub fn register(&mut self, scope: impl Into<String>, middleware: Middleware) {
        self.scopes.entry(scope.into()).or_default().push(middleware);
    }

    /// Middleware applicable to `path`: the global list followed by the list
    /// registered for exactly `path`.
    pub fn resolve(&self, path: &str) -> Vec<&Middleware> {
        let global = self.scopes.get(GLOBAL_SCOPE).into_iter().flatten();
        let scoped = self.scopes.get(path).into_iter().flatten();

        global.chain(scoped).collect()
    }

    /// Number of middleware registered across all scopes.
    pub fn len(&self) -> usize {
        self.scopes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (scope, list) in &self.scopes {
            map.entry(scope, &list.len());
        }
        map.finish()
    }
}
