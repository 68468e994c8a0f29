//! HTTP response types and the values handlers produce.

use std::collections::HashMap;
use std::fmt;
use serde::Serialize;

use crate::server::error::Error;

/// An HTTP status code.
///
/// Any three-digit code can be represented; the associated constants cover
/// the ones the router itself emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const CREATED: StatusCode = StatusCode(201);
    pub const ACCEPTED: StatusCode = StatusCode(202);
    pub const NO_CONTENT: StatusCode = StatusCode(204);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const UNAUTHORIZED: StatusCode = StatusCode(401);
    pub const FORBIDDEN: StatusCode = StatusCode(403);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    pub const UNPROCESSABLE_ENTITY: StatusCode = StatusCode(422);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
    pub const NOT_IMPLEMENTED: StatusCode = StatusCode(501);
    pub const SERVICE_UNAVAILABLE: StatusCode = StatusCode(503);

    /// Create a status code from its numeric value.
    ///
    /// Fails unless the code is in `100..=999`.
    pub fn from_u16(code: u16) -> Result<Self, Error> {
        if (100..=999).contains(&code) {
            Ok(Self(code))
        } else {
            Err(Error::InvalidStatus(code))
        }
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Get the reason phrase for this status code.
    ///
    /// Codes without a registered phrase yield an empty string.
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            418 => "I'm a teapot",
            422 => "Unprocessable Entity",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            _ => "",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

/// A structured response produced by a handler.
///
/// Missing fields fall back to the transport defaults: status 200 and no
/// `Content-Type` header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseDescriptor {
    pub status: Option<StatusCode>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// The value a handler resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseValue {
    /// A raw payload, written verbatim with transport defaults.
    Plain(Vec<u8>),
    /// A payload with an explicit status and/or content type.
    Descriptor(ResponseDescriptor),
}

impl ResponseValue {
    /// Serialize `value` as JSON with an `application/json` content type.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::Descriptor(ResponseDescriptor {
            status: None,
            content_type: Some("application/json".to_string()),
            body,
        }))
    }

    /// Build a JSON error payload `{"error": message}` with the given status.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        let message: String = message.into();
        let body = serde_json::json!({ "error": message }).to_string();
        Self::Descriptor(ResponseDescriptor {
            status: Some(status),
            content_type: Some("application/json".to_string()),
            body: body.into_bytes(),
        })
    }

    /// Override the status of this value, turning a plain payload into a
    /// descriptor.
    pub fn with_status(self, status: StatusCode) -> Self {
        let mut descriptor = self.into_descriptor();
        descriptor.status = Some(status);
        Self::Descriptor(descriptor)
    }

    /// Override the content type of this value.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        let mut descriptor = self.into_descriptor();
        descriptor.content_type = Some(content_type.into());
        Self::Descriptor(descriptor)
    }

    fn into_descriptor(self) -> ResponseDescriptor {
        match self {
            Self::Plain(body) => ResponseDescriptor { body, ..Default::default() },
            Self::Descriptor(descriptor) => descriptor,
        }
    }
}

impl From<String> for ResponseValue {
    fn from(body: String) -> Self {
        Self::Plain(body.into_bytes())
    }
}

impl From<&str> for ResponseValue {
    fn from(body: &str) -> Self {
        Self::Plain(body.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for ResponseValue {
    fn from(body: Vec<u8>) -> Self {
        Self::Plain(body)
    }
}

impl From<ResponseDescriptor> for ResponseValue {
    fn from(descriptor: ResponseDescriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}

/// Represents an HTTP response ready to be written to the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code
    pub status: StatusCode,
    /// The HTTP headers
    pub headers: HashMap<String, String>,
    /// The response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create an empty response with the given status code.
    pub fn new(status: StatusCode) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Server".to_string(), "microroute-rs".to_string());
        headers.insert("Content-Length".to_string(), "0".to_string());

        Self {
            status,
            headers,
            body: Vec::new(),
        }
    }

    /// Set the response body with a string.
    pub fn with_body_string(self, body: impl Into<String>) -> Self {
        self.with_body_bytes(body.into().into_bytes())
    }

    /// Set the response body with bytes.
    pub fn with_body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        let content_length = self.body.len().to_string();
        self.with_header("Content-Length", content_length)
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the content type.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// Get a header value, ignoring the case of its name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Convert the response to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        let status_line = format!(
            "HTTP/1.1 {} {}\r\n",
            self.status.as_u16(),
            self.status.reason_phrase()
        );
        bytes.extend_from_slice(status_line.as_bytes());

        // Sorted so the head is stable across writes
        let mut headers: Vec<_> = self.headers.iter().collect();
        headers.sort();
        for (name, value) in headers {
            let header_line = format!("{name}: {value}\r\n");
            bytes.extend_from_slice(header_line.as_bytes());
        }

        bytes.extend_from_slice(b"\r\n");
        bytes.extend_from_slice(&self.body);

        bytes
    }
}
