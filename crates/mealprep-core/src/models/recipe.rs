// ABOUTME: Structured recipe extracted from generation output
// ABOUTME: Defines GeneratedRecipe and NutritionSummary with per-field unknown sentinels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::Extracted;

/// Per-serving macronutrient summary
///
/// All readings are non-negative or `Unknown`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionSummary {
    /// Energy in kcal
    pub calories: Extracted<f64>,
    /// Protein in grams
    pub protein_g: Extracted<f64>,
    /// Carbohydrates in grams
    pub carbs_g: Extracted<f64>,
    /// Fat in grams
    pub fat_g: Extracted<f64>,
}

impl NutritionSummary {
    /// Whether at least one macro was identified
    #[must_use]
    pub const fn any_known(&self) -> bool {
        self.calories.is_known()
            || self.protein_g.is_known()
            || self.carbs_g.is_known()
            || self.fat_g.is_known()
    }

    /// Names of the macros that were not identified
    #[must_use]
    pub fn unknown_fields(&self) -> Vec<&'static str> {
        [
            ("calories", self.calories.is_unknown()),
            ("protein_g", self.protein_g.is_unknown()),
            ("carbs_g", self.carbs_g.is_unknown()),
            ("fat_g", self.fat_g.is_unknown()),
        ]
        .into_iter()
        .filter_map(|(name, unknown)| unknown.then_some(name))
        .collect()
    }
}

/// Recipe assembled from the generation service's raw text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    /// Recipe name
    pub title: Extracted<String>,
    /// Ingredient lines in the order given
    pub ingredients: Extracted<Vec<String>>,
    /// Preparation steps in order
    pub steps: Extracted<Vec<String>>,
    /// Macronutrients per serving
    pub nutrition: NutritionSummary,
    /// Estimated cost per serving in USD
    pub estimated_cost_usd: Extracted<f64>,
    /// Estimated preparation time in minutes
    pub prep_time_minutes: Extracted<u32>,
    /// Items to buy, unique and in first-seen order
    pub shopping_list: Extracted<Vec<String>>,
}

impl GeneratedRecipe {
    /// Names of every field still holding the `Unknown` sentinel
    #[must_use]
    pub fn unknown_fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = [
            ("title", self.title.is_unknown()),
            ("ingredients", self.ingredients.is_unknown()),
            ("steps", self.steps.is_unknown()),
        ]
        .into_iter()
        .filter_map(|(name, unknown)| unknown.then_some(name))
        .collect();

        fields.extend(self.nutrition.unknown_fields());

        for (name, unknown) in [
            ("estimated_cost_usd", self.estimated_cost_usd.is_unknown()),
            ("prep_time_minutes", self.prep_time_minutes.is_unknown()),
            ("shopping_list", self.shopping_list.is_unknown()),
        ] {
            if unknown {
                fields.push(name);
            }
        }
        fields
    }

    /// Title for display, falling back to a generic label
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.known().map_or("Your recipe", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_recipe_is_all_unknown() {
        let recipe = GeneratedRecipe::default();
        assert_eq!(recipe.unknown_fields().len(), 10);
        assert_eq!(recipe.display_title(), "Your recipe");
        assert!(!recipe.nutrition.any_known());
    }

    #[test]
    fn test_unknown_fields_reports_only_missing() {
        let recipe = GeneratedRecipe {
            title: Extracted::Known("Tuna Rice Bowl".into()),
            nutrition: NutritionSummary {
                calories: Extracted::Known(480.0),
                ..NutritionSummary::default()
            },
            ..GeneratedRecipe::default()
        };

        let unknown = recipe.unknown_fields();
        assert!(!unknown.contains(&"title"));
        assert!(!unknown.contains(&"calories"));
        assert!(unknown.contains(&"protein_g"));
        assert!(unknown.contains(&"shopping_list"));
    }
}
