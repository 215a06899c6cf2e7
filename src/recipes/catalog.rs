// ABOUTME: Read-only seed catalog of curated recipes loaded from JSON at startup
// ABOUTME: Goal-aware suggestions, lookup by id, and pantry-based shopping deltas
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipe Catalog
//!
//! A small curated recipe set shipped with the server. It is loaded once and
//! never written; suggestions and shopping deltas are computed per request.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use mealprep_core::{GroceryItem, Quantity};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};

/// Goal that shuffles suggestions instead of filtering them
pub const SURPRISE_ME: &str = "surprise_me";

const fn default_time_min() -> u32 {
    20
}

/// Ingredient line of a catalog recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogIngredient {
    /// Ingredient name, matched case-insensitively against the pantry
    pub name: String,
    /// Amount, numeric or free text
    #[serde(default)]
    pub qty: Option<Quantity>,
    /// Unit of `qty`
    #[serde(default)]
    pub unit: Option<String>,
}

/// Per-serving macros of a catalog recipe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogMacros {
    /// Energy in kcal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kcal: Option<f64>,
    /// Protein in grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    /// Carbohydrates in grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    /// Fat in grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
}

/// One curated recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecipe {
    /// Stable identifier used by `/recipe`
    pub id: u64,
    /// Display title
    pub title: String,
    /// breakfast, lunch, dinner or snack
    #[serde(default)]
    pub meal_type: Option<String>,
    /// Goals this recipe satisfies (`low_budget`, `vegan`, ...)
    #[serde(default)]
    pub goal: Vec<String>,
    /// Cost per serving in USD
    #[serde(default, alias = "cost_usd")]
    pub cost_per_serving_usd: Option<f64>,
    /// Total time in minutes
    #[serde(default = "default_time_min")]
    pub time_min: u32,
    /// Per-serving macros
    #[serde(default)]
    pub macros: CatalogMacros,
    /// Ingredient lines
    #[serde(default)]
    pub ingredients: Vec<CatalogIngredient>,
}

impl CatalogRecipe {
    fn has_goal(&self, goal: &str) -> bool {
        self.goal.iter().any(|g| g.eq_ignore_ascii_case(goal))
    }

    fn is_meal_type(&self, meal_type: &str) -> bool {
        self.meal_type
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case(meal_type))
    }

    /// Ingredients whose name is not in the pantry, compared case-insensitively
    #[must_use]
    pub fn shopping_delta(&self, pantry: &[String]) -> Vec<GroceryItem> {
        let pantry: Vec<String> = pantry
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        self.ingredients
            .iter()
            .filter(|ing| {
                let name = ing.name.trim().to_lowercase();
                !name.is_empty() && !pantry.contains(&name)
            })
            .map(|ing| GroceryItem {
                item: ing.name.clone(),
                qty: ing.qty.clone(),
                unit: ing.unit.clone(),
            })
            .collect()
    }
}

/// Filters for [`RecipeCatalog::suggest`]
#[derive(Debug, Clone, Default)]
pub struct SuggestQuery {
    /// Keep only this meal type
    pub meal_type: Option<String>,
    /// Lowercased goals; ALL must match when possible, else ANY.
    /// `surprise_me` never filters, it shuffles.
    pub goals: Vec<String>,
    /// Maximum number of results
    pub limit: usize,
}

impl SuggestQuery {
    /// Normalize raw query input
    #[must_use]
    pub fn new(meal_type: Option<&str>, goals: &[String], limit: Option<usize>) -> Self {
        Self {
            meal_type: meal_type
                .map(|m| m.trim().to_lowercase())
                .filter(|m| !m.is_empty()),
            goals: goals
                .iter()
                .map(|g| g.trim().to_lowercase())
                .filter(|g| !g.is_empty())
                .collect(),
            limit: limit.unwrap_or(defaults::SUGGESTION_LIMIT),
        }
    }
}

/// Ordering applied by the first goal that implies one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    CostAscending,
    TimeAscending,
    ProteinDescending,
    CaloriesAscending,
}

impl SortKey {
    fn for_goal(goal: &str) -> Option<Self> {
        match goal {
            "low_budget" => Some(Self::CostAscending),
            "quick_meal" => Some(Self::TimeAscending),
            "gain_muscle" | "high_protein" => Some(Self::ProteinDescending),
            "lose_fat" | "keto_friendly" | "low_carb" => Some(Self::CaloriesAscending),
            _ => None,
        }
    }

    // Missing values sort last
    fn compare(self, a: &CatalogRecipe, b: &CatalogRecipe) -> Ordering {
        match self {
            Self::CostAscending => ascending(a.cost_per_serving_usd, b.cost_per_serving_usd),
            Self::TimeAscending => a.time_min.cmp(&b.time_min),
            Self::ProteinDescending => descending(a.macros.protein_g, b.macros.protein_g),
            Self::CaloriesAscending => ascending(a.macros.kcal, b.macros.kcal),
        }
    }
}

fn ascending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        _ => ascending(a, b),
    }
}

/// Immutable recipe catalog
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<CatalogRecipe>,
}

impl RecipeCatalog {
    /// Build a catalog from already-loaded recipes
    #[must_use]
    pub const fn from_recipes(recipes: Vec<CatalogRecipe>) -> Self {
        Self { recipes }
    }

    /// Load the catalog from a JSON array on disk
    ///
    /// A missing file yields an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the file exists but cannot be read
    /// or is not a JSON array of recipes.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "Recipe catalog not found, suggestions disabled");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("cannot read recipe catalog {}", path.display())).with_source(e)
        })?;
        let recipes: Vec<CatalogRecipe> = serde_json::from_str(&raw).map_err(|e| {
            AppError::config(format!("invalid recipe catalog {}", path.display())).with_source(e)
        })?;

        info!(path = %path.display(), recipes = recipes.len(), "Loaded recipe catalog");
        Ok(Self::from_recipes(recipes))
    }

    /// Number of recipes
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the catalog holds no recipes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Look up a recipe by id
    #[must_use]
    pub fn find(&self, id: u64) -> Option<&CatalogRecipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Suggest recipes for a meal type and set of goals
    pub fn suggest<R: Rng + ?Sized>(&self, query: &SuggestQuery, rng: &mut R) -> Vec<CatalogRecipe> {
        let mut candidates: Vec<&CatalogRecipe> = self
            .recipes
            .iter()
            .filter(|r| query.meal_type.as_deref().is_none_or(|m| r.is_meal_type(m)))
            .collect();

        let filters: Vec<&str> = query
            .goals
            .iter()
            .map(String::as_str)
            .filter(|g| *g != SURPRISE_ME)
            .collect();

        if !filters.is_empty() {
            let strict: Vec<&CatalogRecipe> = candidates
                .iter()
                .copied()
                .filter(|r| filters.iter().all(|g| r.has_goal(g)))
                .collect();
            candidates = if strict.is_empty() {
                candidates
                    .into_iter()
                    .filter(|r| filters.iter().any(|g| r.has_goal(g)))
                    .collect()
            } else {
                strict
            };
        }

        if query.goals == [SURPRISE_ME] {
            candidates.shuffle(rng);
        }

        if let Some(key) = query.goals.iter().find_map(|g| SortKey::for_goal(g)) {
            candidates.sort_by(|a, b| key.compare(a, b));
        }

        candidates
            .into_iter()
            .take(query.limit)
            .cloned()
            .collect()
    }
}
