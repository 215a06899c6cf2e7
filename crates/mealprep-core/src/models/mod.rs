// ABOUTME: Domain model re-exports for meal requests, recipes, and outbound email
// ABOUTME: Groups per-request value types used across the whole pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

mod email;
mod extracted;
mod meal_request;
mod recipe;

pub use email::{EmailMessage, GroceryItem, Quantity};
pub use extracted::Extracted;
pub use meal_request::{DietaryGoal, MealRequest, MealType, UnknownMealType};
pub use recipe::{GeneratedRecipe, NutritionSummary};
