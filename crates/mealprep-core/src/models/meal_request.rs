// ABOUTME: User-supplied meal request with free text and optional structured hints
// ABOUTME: Defines MealRequest, DietaryGoal, and MealType with input normalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dietary goal selected by the user
///
/// The named variants are the goal vocabulary of the `MealPrepAI` front end.
/// Anything else the user types is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DietaryGoal {
    /// Keep the cost per serving low
    LowBudget,
    /// Short total preparation time
    QuickMeal,
    /// Calorie deficit friendly
    LoseFat,
    /// Calorie surplus with plenty of protein
    GainMuscle,
    /// Protein-dense meal
    HighProtein,
    /// No animal products
    Vegan,
    /// No meat or fish
    Vegetarian,
    /// No gluten-containing ingredients
    GlutenFree,
    /// Very low carbohydrate
    KetoFriendly,
    /// Reduced carbohydrate
    LowCarb,
    /// Batch-cookable and stores well
    MealPrep,
    /// No dairy products
    DairyFree,
    /// No constraint, pick something unexpected
    SurpriseMe,
    /// Free-text goal not in the known vocabulary
    Other(String),
}

impl DietaryGoal {
    /// Parse a goal from its wire name, keeping unknown goals verbatim
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "low_budget" => Self::LowBudget,
            "quick_meal" => Self::QuickMeal,
            "lose_fat" => Self::LoseFat,
            "gain_muscle" => Self::GainMuscle,
            "high_protein" => Self::HighProtein,
            "vegan" => Self::Vegan,
            "vegetarian" => Self::Vegetarian,
            "gluten_free" => Self::GlutenFree,
            "keto_friendly" | "keto" => Self::KetoFriendly,
            "low_carb" => Self::LowCarb,
            "meal_prep" => Self::MealPrep,
            "dairy_free" => Self::DairyFree,
            "surprise_me" => Self::SurpriseMe,
            _ => Self::Other(raw.trim().to_owned()),
        }
    }

    /// Wire name of the goal (`high_protein`, `vegan`, ...)
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::LowBudget => "low_budget",
            Self::QuickMeal => "quick_meal",
            Self::LoseFat => "lose_fat",
            Self::GainMuscle => "gain_muscle",
            Self::HighProtein => "high_protein",
            Self::Vegan => "vegan",
            Self::Vegetarian => "vegetarian",
            Self::GlutenFree => "gluten_free",
            Self::KetoFriendly => "keto_friendly",
            Self::LowCarb => "low_carb",
            Self::MealPrep => "meal_prep",
            Self::DairyFree => "dairy_free",
            Self::SurpriseMe => "surprise_me",
            Self::Other(goal) => goal,
        }
    }

    /// Instruction phrase used when describing the goal to the generator
    #[must_use]
    pub fn prompt_phrase(&self) -> &str {
        match self {
            Self::LowBudget => "keep the cost per serving as low as possible",
            Self::QuickMeal => "ready in 20 minutes or less",
            Self::LoseFat => "moderate calories with high satiety",
            Self::GainMuscle => "calorie dense with at least 35 g of protein",
            Self::HighProtein => "high in protein",
            Self::Vegan => "strictly vegan, no animal products",
            Self::Vegetarian => "vegetarian, no meat or fish",
            Self::GlutenFree => "completely gluten free",
            Self::KetoFriendly => "keto friendly, under 20 g net carbs",
            Self::LowCarb => "low in carbohydrates",
            Self::MealPrep => "easy to batch cook and store for several days",
            Self::DairyFree => "free of dairy products",
            Self::SurpriseMe => "anything creative and unexpected",
            Self::Other(goal) => goal,
        }
    }
}

impl fmt::Display for DietaryGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DietaryGoal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DietaryGoal {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|raw| Self::parse(&raw))
    }
}

/// Type of meal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Breakfast meal
    Breakfast,
    /// Lunch meal
    Lunch,
    /// Dinner meal
    Dinner,
    /// Snack between meals
    Snack,
}

/// Meal type outside breakfast, lunch, dinner and snack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMealType(pub String);

impl fmt::Display for UnknownMealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown meal type '{}': expected breakfast, lunch, dinner or snack",
            self.0
        )
    }
}

impl std::error::Error for UnknownMealType {}

impl FromStr for MealType {
    type Err = UnknownMealType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snack" => Ok(Self::Snack),
            _ => Err(UnknownMealType(s.trim().to_owned())),
        }
    }
}

impl MealType {
    /// Lowercase name used on the wire and in prompts
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }
}

/// A single meal request as submitted by the user
///
/// Immutable once built; lives only for the duration of one HTTP request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRequest {
    /// Free-text description of what the user wants
    pub description: String,
    /// Ingredients the user already has
    pub ingredients: Vec<String>,
    /// Dietary goal
    pub goal: Option<DietaryGoal>,
    /// Ingredients that must not appear in the recipe
    pub allergies: Vec<String>,
    /// Maximum spend per serving in USD
    pub budget: Option<f64>,
    /// Breakfast, lunch, dinner or snack
    pub meal_type: Option<MealType>,
    /// Recipient address for the finished recipe
    pub email: String,
    /// Name used in the email greeting
    pub name: Option<String>,
}

impl MealRequest {
    /// Build a request, trimming text and dropping blank or duplicate list entries
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn normalized(
        description: &str,
        ingredients: Vec<String>,
        goal: Option<&str>,
        allergies: Vec<String>,
        budget: Option<f64>,
        meal_type: Option<MealType>,
        email: &str,
        name: Option<&str>,
    ) -> Self {
        Self {
            description: description.trim().to_owned(),
            ingredients: dedupe(ingredients),
            goal: goal
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(DietaryGoal::parse),
            allergies: dedupe(allergies),
            budget,
            meal_type,
            email: email.trim().to_owned(),
            name: name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_owned),
        }
    }

    /// Whether any structured hint (ingredients, goal, allergies, budget) was supplied
    #[must_use]
    pub fn has_hints(&self) -> bool {
        !self.ingredients.is_empty()
            || self.goal.is_some()
            || !self.allergies.is_empty()
            || self.budget.is_some()
            || self.meal_type.is_some()
    }

    /// Whether the request carries anything a recipe can be generated from
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.description.is_empty() || self.has_hints()
    }
}

/// Trim entries, drop blanks, and remove case-insensitive duplicates keeping first order
fn dedupe(items: Vec<String>) -> Vec<String> {
    let mut seen = Vec::<String>::with_capacity(items.len());
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(trimmed.to_owned());
    }
    out
}
