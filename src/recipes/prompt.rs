// ABOUTME: Builds the recipe generation prompt from a user's meal request
// ABOUTME: Every supplied field lands in the prompt, followed by the response format contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write as _;

use mealprep_core::MealRequest;

use crate::constants::limits;
use crate::errors::MealPlanError;

/// Section headings the generator is asked to use, in order
pub const RESPONSE_SECTIONS: [&str; 7] = [
    "Title:",
    "Ingredients:",
    "Steps:",
    "Nutrition:",
    "Estimated cost:",
    "Prep time:",
    "Shopping list:",
];

const RESPONSE_FORMAT: &str = "\
Respond using exactly these section headings, each starting its own line:
Title: <recipe name>
Ingredients:
- <quantity> <ingredient>
Steps:
1. <step>
Nutrition: Calories <number> kcal, Protein <number> g, Carbs <number> g, Fat <number> g
Estimated cost: $<amount> per serving
Prep time: <number> minutes
Shopping list:
- <item the user still needs to buy>";

/// Build the user prompt for a meal request
///
/// Sections appear in a fixed order so identical requests always produce
/// identical prompts.
///
/// # Errors
///
/// Returns `MealPlanError::InvalidInput` when the request has neither a
/// description nor any structured hint, when the budget is negative or not a
/// number, or when a field exceeds its size limit.
pub fn build_recipe_prompt(request: &MealRequest) -> Result<String, MealPlanError> {
    validate(request)?;

    let mut prompt = String::with_capacity(512);

    if request.description.is_empty() {
        prompt.push_str("Create one recipe that fits the constraints below.\n");
    } else {
        let _ = writeln!(prompt, "Meal request: {}", request.description);
    }

    if let Some(meal_type) = request.meal_type {
        let _ = writeln!(prompt, "Meal type: {}", meal_type.as_str());
    }

    if !request.ingredients.is_empty() {
        let _ = writeln!(
            prompt,
            "Ingredients I already have: {}",
            request.ingredients.join(", ")
        );
    }

    if let Some(goal) = &request.goal {
        if goal.as_str() == goal.prompt_phrase() {
            let _ = writeln!(prompt, "Dietary goal: {goal}");
        } else {
            let _ = writeln!(prompt, "Dietary goal: {goal} ({})", goal.prompt_phrase());
        }
    }

    if !request.allergies.is_empty() {
        let _ = writeln!(
            prompt,
            "Allergies, never use: {}",
            request.allergies.join(", ")
        );
    }

    if let Some(budget) = request.budget {
        let _ = writeln!(prompt, "Budget: at most ${} per serving", format_budget(budget));
    }

    prompt.push('\n');
    prompt.push_str(RESPONSE_FORMAT);
    Ok(prompt)
}

/// Cents when that is exact, otherwise the amount as supplied
fn format_budget(budget: f64) -> String {
    let supplied = budget.to_string();
    match supplied.split_once('.') {
        Some((_, fraction)) if fraction.len() > 2 => supplied,
        _ => format!("{budget:.2}"),
    }
}

fn validate(request: &MealRequest) -> Result<(), MealPlanError> {
    if !request.has_content() {
        return Err(MealPlanError::invalid_input(
            "describe the meal you want or add ingredients, a goal, allergies, or a budget",
        ));
    }

    if request.description.chars().count() > limits::MAX_DESCRIPTION_CHARS {
        return Err(MealPlanError::invalid_input(format!(
            "description must be at most {} characters",
            limits::MAX_DESCRIPTION_CHARS
        )));
    }

    for (field, entries) in [
        ("ingredients", &request.ingredients),
        ("allergies", &request.allergies),
    ] {
        if entries.len() > limits::MAX_LIST_ENTRIES {
            return Err(MealPlanError::invalid_input(format!(
                "{field} must have at most {} entries",
                limits::MAX_LIST_ENTRIES
            )));
        }
    }

    match request.budget {
        Some(budget) if !budget.is_finite() || budget < 0.0 => Err(MealPlanError::invalid_input(
            "budget must be a non-negative number",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealprep_core::MealType;

    fn request(description: &str) -> MealRequest {
        MealRequest::normalized(
            description,
            vec![],
            None,
            vec![],
            None,
            None,
            "user@example.com",
            None,
        )
    }

    #[test]
    fn test_prompt_contains_every_supplied_field() {
        let request = MealRequest::normalized(
            "quick high protein dinner",
            vec!["rice".into(), "tuna".into()],
            Some("high_protein"),
            vec!["peanuts".into(), "shellfish".into()],
            Some(7.5),
            Some(MealType::Dinner),
            "user@example.com",
            None,
        );

        let prompt = build_recipe_prompt(&request).unwrap();
        for expected in [
            "quick high protein dinner",
            "rice",
            "tuna",
            "high_protein",
            "high in protein",
            "peanuts",
            "shellfish",
            "$7.50",
            "dinner",
        ] {
            assert!(prompt.contains(expected), "prompt is missing {expected}");
        }
    }

    #[test]
    fn test_budget_is_never_rounded_away() {
        let mut request = request("lunch");
        request.budget = Some(12.345);
        let prompt = build_recipe_prompt(&request).unwrap();
        assert!(prompt.contains("$12.345 per serving"));

        request.budget = Some(6.0);
        let prompt = build_recipe_prompt(&request).unwrap();
        assert!(prompt.contains("$6.00 per serving"));
    }

    #[test]
    fn test_prompt_ends_with_format_contract() {
        let prompt = build_recipe_prompt(&request("pasta")).unwrap();
        let mut position = 0;
        for heading in RESPONSE_SECTIONS {
            let found = prompt[position..]
                .find(heading)
                .map(|offset| position + offset);
            assert!(found.is_some(), "missing {heading}");
            position = found.unwrap_or(position);
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_recipe_prompt(&request("vegan curry")).unwrap();
        let b = build_recipe_prompt(&request("vegan curry")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_free_text_goal_is_kept_verbatim() {
        let request = MealRequest::normalized(
            "",
            vec![],
            Some("mediterranean"),
            vec![],
            None,
            None,
            "user@example.com",
            None,
        );
        let prompt = build_recipe_prompt(&request).unwrap();
        assert!(prompt.contains("Dietary goal: mediterranean\n"));
    }

    #[test]
    fn test_empty_request_is_invalid_input() {
        let error = build_recipe_prompt(&request("   ")).unwrap_err();
        assert!(matches!(error, MealPlanError::InvalidInput(_)));
    }

    #[test]
    fn test_negative_budget_is_invalid_input() {
        let mut request = request("soup");
        request.budget = Some(-1.0);
        assert!(matches!(
            build_recipe_prompt(&request),
            Err(MealPlanError::InvalidInput(_))
        ));

        request.budget = Some(f64::NAN);
        assert!(build_recipe_prompt(&request).is_err());
    }
}
