//! HTTP request parsing and representation.

use std::collections::HashMap;
use std::str::FromStr;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::query::QueryParams;
use crate::parser::version::HttpVersion;

/// Represents an inbound HTTP request as seen by the router.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request path, without query string or fragment
    pub path: String,
    /// Query parameters parsed from the request target
    pub query: QueryParams,
    /// The HTTP version
    pub version: HttpVersion,
    /// The HTTP headers
    pub headers: HashMap<String, String>,
}

impl HttpRequest {
    /// Create a request from a method and a raw request target.
    ///
    /// The target must be in origin form (`/path?query`). Anything after a
    /// `#` is discarded.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method
    /// * `target` - The request target from the request line
    /// * `version` - The HTTP version
    /// * `headers` - The HTTP headers
    pub fn new(
        method: Method,
        target: &str,
        version: HttpVersion,
        headers: HashMap<String, String>,
    ) -> Result<Self, Error> {
        if !target.starts_with('/') {
            return Err(Error::InvalidTarget(target.to_string()));
        }

        let target = target.split_once('#').map_or(target, |(before, _)| before);
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, QueryParams::parse(query)),
            None => (target, QueryParams::new()),
        };

        Ok(Self {
            method,
            path: path.to_string(),
            query,
            version,
            headers,
        })
    }

    /// Create an HTTP/1.1 request with no headers.
    pub fn from_target(method: Method, target: &str) -> Result<Self, Error> {
        Self::new(method, target, HttpVersion::Http11, HashMap::new())
    }

    /// Get a header value, ignoring the case of its name.
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                Some(v)
            } else {
                None
            }
        })
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }
}

/// Parse an HTTP request head from a byte slice.
///
/// Only the request line and headers are read; any body bytes after the blank
/// line are ignored.
///
/// # Arguments
///
/// * `input` - A byte slice containing the HTTP request to parse
///
/// # Returns
///
/// The parsed HTTP request, or an error if the request is invalid
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let input_str = match std::str::from_utf8(input) {
        Ok(s) => s,
        Err(_) => return Err(Error::MalformedRequestLine("Invalid UTF-8".to_string())),
    };

    let mut lines = input_str.lines();

    let request_line = match lines.next() {
        Some(line) if !line.trim().is_empty() => line,
        _ => return Err(Error::EmptyRequest),
    };

    // Split the request line into method, target, and version
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    }

    let method = Method::from_str(parts[0])?;
    let version = HttpVersion::from_str(parts[2])?;

    let mut headers = HashMap::new();
    for line in lines {
        // Empty line indicates the end of headers
        if line.is_empty() {
            break;
        }

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::InvalidHeaderFormat(line.to_string()))?;

        headers.insert(name.trim().to_string(), value.trim().to_string());
    }

    if version == HttpVersion::Http11 && !headers.keys().any(|k| k.eq_ignore_ascii_case("Host")) {
        return Err(Error::MissingHeader("Host".to_string()));
    }

    HttpRequest::new(method, parts[1], version, headers)
}
