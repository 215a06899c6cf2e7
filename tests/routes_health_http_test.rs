// ABOUTME: HTTP integration tests for health check routes
// ABOUTME: Liveness, readiness details, CORS preflight, and request ID headers on plain routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::sync::Arc;

use axum::Router;
use helpers::axum_test::AxumTestRequest;
use helpers::fixtures::{app, resources, TUNA_RICE_RECIPE};
use helpers::stubs::{RecordingMailer, StubProvider};
use mealprep_server::mail::DeliveryMode;
use mealprep_server::routes::health::HealthRoutes;

fn health_routes() -> Router {
    HealthRoutes::routes(resources(
        Arc::new(StubProvider::new(TUNA_RICE_RECIPE)),
        Arc::new(RecordingMailer::with_mode(DeliveryMode::DryRun)),
    ))
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let response = AxumTestRequest::get("/health").send(health_routes()).await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_ready_endpoint_reports_collaborators() {
    let response = AxumTestRequest::get("/ready").send(health_routes()).await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["generation_provider"], "stub");
    assert_eq!(body["delivery_mode"], "dry_run");
    assert_eq!(body["catalog_recipes"], 8);
}

#[tokio::test]
async fn test_health_endpoint_wrong_method() {
    let response = AxumTestRequest::post("/health").send(health_routes()).await;
    assert_eq!(response.status(), 405);
}

#[tokio::test]
async fn test_full_router_sets_request_id() {
    let router = app(
        Arc::new(StubProvider::new(TUNA_RICE_RECIPE)),
        Arc::new(RecordingMailer::new()),
    );

    let response = AxumTestRequest::get("/health").send(router).await;

    assert_eq!(response.status(), 200);
    assert!(response.header("x-request-id").unwrap().starts_with("req_"));
}

#[tokio::test]
async fn test_cors_preflight_is_allowed() {
    let router = app(
        Arc::new(StubProvider::new(TUNA_RICE_RECIPE)),
        Arc::new(RecordingMailer::new()),
    );

    let response = AxumTestRequest::options("/api/meal-plan")
        .header("origin", "https://mealprep.example.com")
        .header("access-control-request-method", "POST")
        .send(router)
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some("*")
    );
}
