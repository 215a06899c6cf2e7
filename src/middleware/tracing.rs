// ABOUTME: Request tracing middleware for correlation and structured logging
// ABOUTME: Generates x-request-id values and builds the per-request span for tower-http's TraceLayer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::body::Body;
use http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Header carrying the request ID in both directions
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// `x-request-id` as a typed header name
#[must_use]
pub const fn request_id_header() -> HeaderName {
    HeaderName::from_static(REQUEST_ID_HEADER)
}

/// Generates `req_<uuid>` request IDs for requests that arrive without one
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = format!("req_{}", Uuid::new_v4().simple());
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Request ID attached by `SetRequestIdLayer`, if any
#[must_use]
pub fn request_id<B>(request: &Request<B>) -> Option<&str> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
}

/// Create a tracing span for HTTP requests
pub fn create_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = request_id(request).unwrap_or_default(),
        status_code = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    )
}
