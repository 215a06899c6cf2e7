// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Liveness at /health, and /ready reporting generation provider, mail mode, and catalog size
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for load balancers and uptime probes

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::constants::service_names;
use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        async fn health_handler() -> Json<Value> {
            Json(json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        async fn ready_handler(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
            Json(json!({
                "status": "ready",
                "service": service_names::MEALPREP_SERVER,
                "version": service_names::SERVER_VERSION,
                "generation_provider": resources.provider_name,
                "delivery_mode": resources.delivery_mode,
                "catalog_recipes": resources.catalog.len(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        Router::new()
            .route("/health", get(health_handler))
            .route("/ready", get(ready_handler))
            .with_state(resources)
    }
}
