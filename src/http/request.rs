//! Request identification.
//!
//! Every postback gets an `x-request-id` (kept if the sender supplied one,
//! otherwise a UUID v4). The id is part of the request span and is echoed on
//! the response. A generated id is not part of what the sender sent, so it is
//! left out of the captured headers.

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Marks a request whose `x-request-id` was assigned by this service.
#[derive(Debug, Clone, Copy)]
pub struct GeneratedRequestId;

/// Runs ahead of `SetRequestIdLayer` and records whether the id it is about
/// to see came from the sender.
pub async fn mark_generated_request_id(mut request: Request<Body>, next: Next) -> Response {
    if !request.headers().contains_key(&X_REQUEST_ID) {
        request.extensions_mut().insert(GeneratedRequestId);
    }
    next.run(request).await
}

/// The headers as the sender sent them.
pub fn sender_headers(mut headers: HeaderMap, generated: bool) -> HeaderMap {
    if generated {
        headers.remove(&X_REQUEST_ID);
    }
    headers
}

/// The request id as a string, or `"unknown"` when absent.
pub fn request_id_of<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
