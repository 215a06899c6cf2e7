// ABOUTME: HTTP integration tests for the seed catalog routes
// ABOUTME: Suggestion filtering and ordering, recipe detail with pantry delta, and catalog loading from disk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::io::Write;
use std::sync::Arc;

use axum::Router;
use helpers::axum_test::AxumTestRequest;
use helpers::fixtures::{app, TUNA_RICE_RECIPE};
use helpers::stubs::{RecordingMailer, StubProvider};
use mealprep_server::recipes::RecipeCatalog;
use serde_json::{json, Value};

fn catalog_app() -> Router {
    app(
        Arc::new(StubProvider::new(TUNA_RICE_RECIPE)),
        Arc::new(RecordingMailer::new()),
    )
}

// ============================================================================
// POST /suggest
// ============================================================================

#[tokio::test]
async fn test_suggest_filters_by_meal_type() {
    let response = AxumTestRequest::post("/suggest")
        .json(&json!({"meal_type": "breakfast"}))
        .send(catalog_app())
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    let recipes = body["recipes"].as_array().unwrap();
    assert!(!recipes.is_empty());
    assert!(recipes.iter().all(|r| r["meal_type"] == "breakfast"));
}

#[tokio::test]
async fn test_suggest_low_budget_sorts_by_cost() {
    let response = AxumTestRequest::post("/suggest")
        .json(&json!({"goals": ["low_budget"]}))
        .send(catalog_app())
        .await;

    let body: Value = response.json();
    let costs: Vec<f64> = body["recipes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["cost_per_serving_usd"].as_f64().unwrap())
        .collect();
    assert!(!costs.is_empty());
    assert!(costs.windows(2).all(|w| w[0] <= w[1]), "{costs:?}");
}

#[tokio::test]
async fn test_suggest_high_protein_sorts_by_protein_descending() {
    let response = AxumTestRequest::post("/suggest")
        .json(&json!({"goals": "high_protein"}))
        .send(catalog_app())
        .await;

    let body: Value = response.json();
    let protein: Vec<f64> = body["recipes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["macros"]["protein_g"].as_f64().unwrap())
        .collect();
    assert!(protein.len() >= 2);
    assert!(protein.windows(2).all(|w| w[0] >= w[1]), "{protein:?}");
}

#[tokio::test]
async fn test_suggest_falls_back_to_any_goal() {
    // No seed recipe is both keto_friendly and vegan
    let response = AxumTestRequest::post("/suggest")
        .json(&json!({"goals": ["keto_friendly", "vegan"]}))
        .send(catalog_app())
        .await;

    let body: Value = response.json();
    let recipes = body["recipes"].as_array().unwrap();
    assert!(!recipes.is_empty());
}

#[tokio::test]
async fn test_suggest_limit_is_applied() {
    let response = AxumTestRequest::post("/suggest")
        .json(&json!({"limit": 2}))
        .send(catalog_app())
        .await;

    let body: Value = response.json();
    assert_eq!(body["recipes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_surprise_me_keeps_every_candidate() {
    let response = AxumTestRequest::post("/suggest")
        .json(&json!({"meal_type": "lunch", "goals": ["surprise_me"], "limit": 50}))
        .send(catalog_app())
        .await;

    let body: Value = response.json();
    assert_eq!(body["recipes"].as_array().unwrap().len(), 3);
}

// ============================================================================
// POST /recipe
// ============================================================================

#[tokio::test]
async fn test_recipe_detail_with_pantry_delta() {
    let response = AxumTestRequest::post("/recipe")
        .json(&json!({"id": 1, "pantry": ["Rice", "canned tuna"]}))
        .send(catalog_app())
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["title"], "Tuna Rice Bowl");
    assert_eq!(body["ingredients"].as_array().unwrap().len(), 4);
    let delta: Vec<&str> = body["shopping_delta"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["item"].as_str().unwrap())
        .collect();
    assert_eq!(delta, ["cucumber", "soy sauce"]);
    assert_eq!(body["cost_usd"], 2.75);
}

#[tokio::test]
async fn test_unknown_recipe_is_not_found() {
    let response = AxumTestRequest::post("/recipe")
        .json(&json!({"id": 9999}))
        .send(catalog_app())
        .await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_recipe_without_id_is_bad_request() {
    let response = AxumTestRequest::post("/recipe")
        .json(&json!({"pantry": []}))
        .send(catalog_app())
        .await;

    assert_eq!(response.status(), 400);
}

// ============================================================================
// Catalog loading
// ============================================================================

#[test]
fn test_catalog_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"id": 42, "title": "Toast", "cost_usd": 0.5, "ingredients": [{{"name": "bread"}}]}}]"#
    )
    .unwrap();

    let catalog = RecipeCatalog::load(file.path()).unwrap();
    assert_eq!(catalog.len(), 1);
    let toast = catalog.find(42).unwrap();
    assert_eq!(toast.cost_per_serving_usd, Some(0.5));
    assert_eq!(toast.time_min, 20);
}

#[test]
fn test_missing_catalog_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = RecipeCatalog::load(&dir.path().join("absent.json")).unwrap();
    assert!(catalog.is_empty());
}

#[test]
fn test_malformed_catalog_is_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{\"not\": \"an array\"}}").unwrap();

    let error = RecipeCatalog::load(file.path()).unwrap_err();
    assert_eq!(error.http_status(), 500);
}
