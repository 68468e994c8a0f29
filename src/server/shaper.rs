//! Turns handler results into HTTP responses.

use crate::server::response::{HttpResponse, ResponseValue, StatusCode};

/// Normalize a handler's result into a response.
///
/// A descriptor's status replaces the default 200 and its content type is
/// written only when present. Bodies are copied verbatim. The function is
/// pure, so shaping the same value twice yields equal responses.
pub fn shape(value: &ResponseValue) -> HttpResponse {
    match value {
        ResponseValue::Plain(body) => HttpResponse::new(StatusCode::OK).with_body_bytes(body.clone()),
        ResponseValue::Descriptor(descriptor) => {
            let mut response = HttpResponse::new(descriptor.status.unwrap_or(StatusCode::OK));
            if let Some(content_type) = &descriptor.content_type {
                response = response.with_content_type(content_type.clone());
            }
            response.with_body_bytes(descriptor.body.clone())
        }
    }
}
