// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Meal-plan orchestration, the cooking coach, and grocery list delivery
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Route handlers stay thin: they decode the request, call one service, and
//! shape the response. Everything with a failure mode lives here.

/// Emil-ia cooking coach: instructions and chat
pub mod coach;

/// Grocery list email for catalog recipes
pub mod grocery_list;

/// Meal-plan request handler state machine
pub mod meal_plan;

pub use coach::{CoachService, RecipeContext};
pub use grocery_list::{GroceryListRequest, GroceryListService};
pub use meal_plan::{
    GenerationSettings, MealPlanReport, MealPlanService, MealPlanState, StageFailure,
};
