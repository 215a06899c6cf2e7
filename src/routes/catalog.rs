// ABOUTME: Seed catalog routes: filtered suggestions and recipe details with a pantry shopping delta
// ABOUTME: Thin handlers over RecipeCatalog; limits are clamped and unknown ids return 404
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use mealprep_core::GroceryItem;
use serde::{Deserialize, Serialize};

use super::{ApiJson, ListField};
use crate::constants::{defaults, limits};
use crate::errors::{AppError, AppResult};
use crate::recipes::{CatalogIngredient, CatalogMacros, CatalogRecipe, SuggestQuery};
use crate::resources::ServerResources;

/// `POST /suggest` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestRequest {
    /// Meal type filter
    #[serde(default, alias = "meal")]
    pub meal_type: Option<String>,
    /// Goal filters
    #[serde(default)]
    pub goals: ListField,
    /// Maximum results; 0 or absent means the default
    #[serde(default)]
    pub limit: Option<usize>,
}

/// `POST /suggest` response
#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestResponse {
    /// Matching recipes, best first
    pub recipes: Vec<CatalogRecipe>,
}

/// Recipe id sent as a number or a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecipeId {
    /// `3`
    Number(u64),
    /// `"3"`
    Text(String),
}

impl RecipeId {
    fn value(&self) -> AppResult<u64> {
        match self {
            Self::Number(id) => Ok(*id),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| AppError::invalid_input("id must be a number")),
        }
    }
}

/// `POST /recipe` body
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeDetailRequest {
    /// Catalog id
    pub id: RecipeId,
    /// Ingredients the user already has
    #[serde(default)]
    pub pantry: ListField,
}

/// `POST /recipe` response
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeDetailResponse {
    /// Catalog id
    pub id: u64,
    /// Display title
    pub title: String,
    /// Every ingredient
    pub ingredients: Vec<CatalogIngredient>,
    /// Cost per serving
    pub cost_usd: Option<f64>,
    /// Per-serving macros
    pub macros: CatalogMacros,
    /// Ingredients not covered by the pantry
    pub shopping_delta: Vec<GroceryItem>,
    /// Total time in minutes
    pub time_min: u32,
}

/// Catalog routes
pub struct CatalogRoutes;

impl CatalogRoutes {
    /// Create all catalog routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/suggest", post(Self::handle_suggest))
            .route("/recipe", post(Self::handle_recipe))
            .with_state(resources)
    }

    async fn handle_suggest(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(request): ApiJson<SuggestRequest>,
    ) -> Json<SuggestResponse> {
        let limit = request
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(defaults::SUGGESTION_LIMIT)
            .min(limits::MAX_SUGGESTION_LIMIT);
        let goals = request.goals.into_vec();
        let query = SuggestQuery::new(request.meal_type.as_deref(), &goals, Some(limit));

        let recipes = resources.catalog.suggest(&query, &mut rand::thread_rng());
        Json(SuggestResponse { recipes })
    }

    async fn handle_recipe(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(request): ApiJson<RecipeDetailRequest>,
    ) -> AppResult<Json<RecipeDetailResponse>> {
        let id = request.id.value()?;
        let recipe = resources
            .catalog
            .find(id)
            .ok_or_else(|| AppError::not_found(format!("recipe {id}")))?;
        let pantry = request.pantry.into_vec();

        Ok(Json(RecipeDetailResponse {
            id: recipe.id,
            title: recipe.title.clone(),
            ingredients: recipe.ingredients.clone(),
            cost_usd: recipe.cost_per_serving_usd,
            macros: recipe.macros.clone(),
            shopping_delta: recipe.shopping_delta(&pantry),
            time_min: recipe.time_min,
        }))
    }
}
