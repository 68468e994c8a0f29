//! HTTP server for microroute-rs.
//!
//! Accepts connections, parses each request head, hands it to a frozen
//! [`Router`](crate::routing::Router) and writes back exactly one response.

mod response;
mod config;
mod error;
mod http_server;
mod shaper;
mod tests;

// Re-export public items
pub use response::{HttpResponse, ResponseDescriptor, ResponseValue, StatusCode};
pub use config::{ServerConfig, DEFAULT_HOST, DEFAULT_PORT, HOST_VAR, PORT_VAR};
pub use error::Error;
pub use http_server::HttpServer;
pub use shaper::shape;
