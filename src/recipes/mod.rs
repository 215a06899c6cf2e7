// ABOUTME: Recipe domain logic: prompt construction, output parsing, and the seed catalog
// ABOUTME: Pure computation over core types; no network I/O happens here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Recipe prompt, parser, and catalog

/// Curated recipe catalog with suggestions and shopping deltas
pub mod catalog;
/// Tolerant parser for generation output
pub mod parser;
/// Generation prompt builder
pub mod prompt;

pub use catalog::{CatalogIngredient, CatalogMacros, CatalogRecipe, RecipeCatalog, SuggestQuery};
pub use parser::{ParseError, ParserConfig, RecipeParser};
pub use prompt::{build_recipe_prompt, RESPONSE_SECTIONS};
