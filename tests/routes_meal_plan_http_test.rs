// ABOUTME: HTTP integration tests for the meal request routes
// ABOUTME: Covers form and JSON submission, status mapping per failed stage, and request ID propagation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::sync::Arc;

use helpers::axum_test::AxumTestRequest;
use helpers::fixtures::{app, REFUSAL, TUNA_RICE_RECIPE};
use helpers::stubs::{FailingMailer, HangingProvider, RecordingMailer, StubProvider};
use mealprep_server::constants::user_messages;
use mealprep_server::mail::DeliveryMode;
use serde_json::{json, Value};

fn tuna_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("description", "high protein lunch under 500 calories"),
        ("ingredients", "rice, tuna"),
        ("goal", "high_protein"),
        ("meal_type", "lunch"),
        ("budget", "6"),
        ("email", "sam@example.com"),
        ("name", "Sam"),
    ]
}

// ============================================================================
// Success
// ============================================================================

#[tokio::test]
async fn test_form_submission_end_to_end() {
    let provider = Arc::new(StubProvider::new(TUNA_RICE_RECIPE));
    let mailer = Arc::new(RecordingMailer::new());

    let response = AxumTestRequest::post("/generate")
        .form(&tuna_form())
        .send(app(provider.clone(), mailer.clone()))
        .await;

    assert_eq!(response.status(), 200);
    assert!(response.header("x-request-id").is_some());
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], user_messages::MEAL_PLAN_SENT);
    assert_eq!(body["recipe"]["title"], "Tuna Rice Power Bowl");
    assert!(body["recipe"]["nutrition"]["calories"].as_f64().unwrap() <= 500.0);
    assert_eq!(body["delivery"]["mode"], "smtp");

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "sam@example.com");
    assert!(sent[0].body.contains("1 can tuna in water"));
    assert!(sent[0].body.contains("150 g cooked rice"));

    let prompt = provider.last_request().unwrap();
    assert!(prompt.last_user_message().unwrap().contains("rice, tuna"));
}

#[tokio::test]
async fn test_free_text_only_request_end_to_end() {
    let provider = Arc::new(StubProvider::new(TUNA_RICE_RECIPE));
    let mailer = Arc::new(RecordingMailer::new());

    let response = AxumTestRequest::post("/api/meal-plan")
        .json(&json!({
            "description": "I have rice and tuna, high protein dinner under 500 calories",
            "email": "user@example.com"
        }))
        .send(app(provider.clone(), mailer.clone()))
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "user@example.com");
    let email_body = sent[0].body.to_lowercase();
    assert!(email_body.contains("rice"));
    assert!(email_body.contains("tuna"));
    let calories: f64 = sent[0]
        .body
        .lines()
        .find_map(|line| line.trim().strip_prefix("Calories: "))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|value| value.parse().ok())
        .unwrap();
    assert!(calories <= 500.0);

    let prompt = provider.last_request().unwrap();
    assert!(prompt
        .last_user_message()
        .unwrap()
        .contains("I have rice and tuna, high protein dinner under 500 calories"));
}

#[tokio::test]
async fn test_json_submission() {
    let mailer = Arc::new(RecordingMailer::new());

    let response = AxumTestRequest::post("/api/meal-plan")
        .json(&json!({
            "description": "quick lunch",
            "ingredients": ["rice", "tuna"],
            "budget": 6.5,
            "email": "sam@example.com"
        }))
        .send(app(Arc::new(StubProvider::new(TUNA_RICE_RECIPE)), mailer.clone()))
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_dry_run_mode_is_reported() {
    let mailer = Arc::new(RecordingMailer::with_mode(DeliveryMode::DryRun));

    let response = AxumTestRequest::post("/generate")
        .form(&tuna_form())
        .send(app(Arc::new(StubProvider::new(TUNA_RICE_RECIPE)), mailer))
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], user_messages::MEAL_PLAN_DRY_RUN);
    assert_eq!(body["delivery"]["mode"], "dry_run");
}

// ============================================================================
// 400 - Invalid input
// ============================================================================

#[tokio::test]
async fn test_missing_email_is_bad_request() {
    let provider = Arc::new(StubProvider::new(TUNA_RICE_RECIPE));

    let response = AxumTestRequest::post("/api/meal-plan")
        .json(&json!({"description": "dinner"}))
        .send(app(provider.clone(), Arc::new(RecordingMailer::new())))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(body["stage"], "received");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_empty_request_is_bad_request() {
    let response = AxumTestRequest::post("/generate")
        .form(&[("email", "sam@example.com")])
        .send(app(
            Arc::new(StubProvider::new(TUNA_RICE_RECIPE)),
            Arc::new(RecordingMailer::new()),
        ))
        .await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_unparseable_budget_is_bad_request() {
    let response = AxumTestRequest::post("/generate")
        .form(&[
            ("description", "dinner"),
            ("budget", "cheap"),
            ("email", "sam@example.com"),
        ])
        .send(app(
            Arc::new(StubProvider::new(TUNA_RICE_RECIPE)),
            Arc::new(RecordingMailer::new()),
        ))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["message"], "budget must be a number");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let response = AxumTestRequest::post("/api/meal-plan")
        .raw("application/json", "{not json")
        .send(app(
            Arc::new(StubProvider::new(TUNA_RICE_RECIPE)),
            Arc::new(RecordingMailer::new()),
        ))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_unknown_meal_type_is_bad_request() {
    let provider = Arc::new(StubProvider::new(TUNA_RICE_RECIPE));

    let response = AxumTestRequest::post("/generate")
        .form(&[
            ("description", "something light"),
            ("meal_type", "brunch"),
            ("email", "sam@example.com"),
        ])
        .send(app(provider.clone(), Arc::new(RecordingMailer::new())))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("brunch"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_oversized_body_is_rejected_before_generation() {
    let provider = Arc::new(StubProvider::new(TUNA_RICE_RECIPE));

    let response = AxumTestRequest::post("/api/meal-plan")
        .json(&json!({
            "description": "dinner",
            "email": "sam@example.com",
            "notes": "a".repeat(100_000)
        }))
        .send(app(provider.clone(), Arc::new(RecordingMailer::new())))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(provider.calls(), 0);
}

// ============================================================================
// 502 / 504 - Upstream failures
// ============================================================================

#[tokio::test]
async fn test_unusable_generation_is_bad_gateway() {
    let mailer = Arc::new(RecordingMailer::new());

    let response = AxumTestRequest::post("/generate")
        .form(&tuna_form())
        .send(app(Arc::new(StubProvider::new(REFUSAL)), mailer.clone()))
        .await;

    assert_eq!(response.status(), 502);
    let body: Value = response.json();
    assert_eq!(body["message"], user_messages::GENERATION_FAILED);
    assert_eq!(body["stage"], "parsing");
    assert_eq!(body["retryable"], true);
    assert!(body["request_id"].as_str().unwrap().starts_with("req_"));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_delivery_failure_is_bad_gateway_with_distinct_message() {
    let response = AxumTestRequest::post("/generate")
        .form(&tuna_form())
        .send(app(
            Arc::new(StubProvider::new(TUNA_RICE_RECIPE)),
            Arc::new(FailingMailer),
        ))
        .await;

    assert_eq!(response.status(), 502);
    let body: Value = response.json();
    assert_eq!(body["message"], user_messages::DELIVERY_FAILED);
    assert_eq!(body["stage"], "delivering");
    assert_eq!(body["code"], "DELIVERY_FAILED");
}

#[tokio::test]
async fn test_generation_timeout_is_gateway_timeout() {
    let response = AxumTestRequest::post("/generate")
        .form(&tuna_form())
        .send(app(Arc::new(HangingProvider), Arc::new(RecordingMailer::new())))
        .await;

    assert_eq!(response.status(), 504);
    let body: Value = response.json();
    assert_eq!(body["stage"], "generating");
    assert_eq!(body["code"], "EXTERNAL_TIMEOUT");
}

#[tokio::test]
async fn test_client_request_id_is_echoed() {
    let response = AxumTestRequest::post("/generate")
        .header("x-request-id", "req_from_client")
        .form(&tuna_form())
        .send(app(Arc::new(StubProvider::new(REFUSAL)), Arc::new(RecordingMailer::new())))
        .await;

    assert_eq!(response.header("x-request-id").as_deref(), Some("req_from_client"));
    let body: Value = response.json();
    assert_eq!(body["request_id"], "req_from_client");
}
