//! HTTP request-line parser.
//!
//! Only the parts of a request the router consumes are modelled: method,
//! path, query string, protocol version and headers. Bodies are ignored.

mod request;
mod method;
mod query;
mod version;
mod error;

// Re-export public items
pub use request::{HttpRequest, parse_request};
pub use method::Method;
pub use query::{QueryParams, percent_decode};
pub use version::HttpVersion;
pub use error::Error;
