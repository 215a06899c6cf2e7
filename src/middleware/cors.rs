// ABOUTME: CORS middleware configuration for HTTP API endpoints
// ABOUTME: Lets the static meal request form post from its own origin or any origin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::ServerConfig;

/// Configure CORS from `CORS_ALLOWED_ORIGINS`
///
/// `*` (the default) allows any origin; otherwise only the listed origins are
/// allowed. Entries that are not valid header values are skipped, and if none
/// remain the layer falls back to any origin.
///
/// ```bash
/// export CORS_ALLOWED_ORIGINS="https://mealprep.example.com"
/// ```
pub fn setup_cors(config: &ServerConfig) -> CorsLayer {
    let wildcard = config.cors_origins.is_empty() || config.cors_origins.iter().any(|o| o == "*");

    let allow_origin = if wildcard {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
            .collect();

        if origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}
