// ABOUTME: Core domain types for the MealPrepAI recipe delivery service
// ABOUTME: Foundation crate shared by the prompt builder, parser, composer, and HTTP layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # `MealPrep` Core
//!
//! Plain data types that flow through a single meal-plan request. Nothing in
//! this crate performs I/O; every value is created per request and dropped
//! when the request completes.
//!
//! ## Modules
//!
//! - **models**: `MealRequest`, `GeneratedRecipe`, `EmailMessage` and the
//!   `Extracted` sentinel used for fields the parser could not identify

/// Core data models (`MealRequest`, `GeneratedRecipe`, `EmailMessage`, etc.)
pub mod models;

pub use models::{
    DietaryGoal, EmailMessage, Extracted, GeneratedRecipe, GroceryItem, MealRequest, MealType,
    NutritionSummary, Quantity, UnknownMealType,
};
