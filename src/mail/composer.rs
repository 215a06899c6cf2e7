// ABOUTME: Renders recipes and grocery lists into plain-text email messages
// ABOUTME: Pure formatting with recipient validation; unknown fields render as "unknown"
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write as _;

use mealprep_core::{EmailMessage, Extracted, GeneratedRecipe, GroceryItem};

use super::is_valid_email;
use crate::constants::service_names::BRAND;
use crate::errors::MealPlanError;

const DEFAULT_NAME: &str = "there";
const DEFAULT_GROCERY_TITLE: &str = "Selected Recipe";
const UNKNOWN: &str = "unknown";
const NOTHING_TO_BUY: &str = "Nothing to buy, you have everything";

fn validate_recipient(recipient: &str) -> Result<String, MealPlanError> {
    let recipient = recipient.trim();
    if recipient.is_empty() {
        return Err(MealPlanError::invalid_input("an email address is required"));
    }
    if !is_valid_email(recipient) {
        return Err(MealPlanError::invalid_input("the email address is not valid"));
    }
    Ok(recipient.to_owned())
}

fn greeting_name(name: Option<&str>) -> &str {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_NAME)
}

/// `480` rather than `480.0`, `7.5` stays `7.5`
fn amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn with_unit(value: &Extracted<f64>, unit: &str) -> String {
    value
        .known()
        .map_or_else(|| UNKNOWN.to_owned(), |v| format!("{} {unit}", amount(*v)))
}

fn write_list(body: &mut String, items: &Extracted<Vec<String>>, numbered: bool) {
    match items.known() {
        Some(items) if items.is_empty() => {
            let _ = writeln!(body, "- {NOTHING_TO_BUY}");
        }
        Some(items) => {
            for (index, item) in items.iter().enumerate() {
                if numbered {
                    let _ = writeln!(body, "{}. {item}", index + 1);
                } else {
                    let _ = writeln!(body, "- {item}");
                }
            }
        }
        None => {
            let _ = writeln!(body, "- {UNKNOWN}");
        }
    }
}

/// Render a generated recipe as an email
///
/// The body has three sections (RECIPE, NUTRITION, SHOPPING LIST); every
/// field of the recipe appears, with `unknown` standing in for anything the
/// parser could not identify.
///
/// # Errors
///
/// Returns `MealPlanError::InvalidInput` when the recipient is blank or not
/// an email address.
pub fn compose_recipe_email(
    recipe: &GeneratedRecipe,
    recipient: &str,
    name: Option<&str>,
) -> Result<EmailMessage, MealPlanError> {
    let to = validate_recipient(recipient)?;
    let title = recipe.display_title();

    let mut body = String::with_capacity(1024);
    let _ = writeln!(body, "Hi {},", greeting_name(name));
    body.push('\n');
    let _ = writeln!(body, "Here's your {BRAND} recipe.");
    body.push('\n');

    body.push_str("RECIPE\n");
    let _ = writeln!(body, "{title}");
    let prep = recipe
        .prep_time_minutes
        .known()
        .map_or_else(|| UNKNOWN.to_owned(), |m| format!("{m} minutes"));
    let _ = writeln!(body, "Prep time: {prep}");
    let cost = recipe
        .estimated_cost_usd
        .known()
        .map_or_else(|| UNKNOWN.to_owned(), |c| format!("${c:.2} per serving"));
    let _ = writeln!(body, "Estimated cost: {cost}");
    body.push('\n');
    body.push_str("Ingredients:\n");
    write_list(&mut body, &recipe.ingredients, false);
    body.push('\n');
    body.push_str("Steps:\n");
    write_list(&mut body, &recipe.steps, true);
    body.push('\n');

    let nutrition = &recipe.nutrition;
    body.push_str("NUTRITION (per serving)\n");
    let _ = writeln!(body, "Calories: {}", with_unit(&nutrition.calories, "kcal"));
    let _ = writeln!(body, "Protein: {}", with_unit(&nutrition.protein_g, "g"));
    let _ = writeln!(body, "Carbs: {}", with_unit(&nutrition.carbs_g, "g"));
    let _ = writeln!(body, "Fat: {}", with_unit(&nutrition.fat_g, "g"));
    body.push('\n');

    body.push_str("SHOPPING LIST\n");
    write_list(&mut body, &recipe.shopping_list, false);
    body.push('\n');

    body.push_str("Happy cooking!\n");
    body.push_str(BRAND);
    body.push('\n');

    Ok(EmailMessage {
        to,
        subject: format!("{BRAND}: {title}"),
        body,
    })
}

/// Render a grocery list for a catalog recipe as an email
///
/// # Errors
///
/// Returns `MealPlanError::InvalidInput` when the recipient is blank or not
/// an email address.
pub fn compose_grocery_list_email(
    recipient: &str,
    name: Option<&str>,
    title: Option<&str>,
    items: &[GroceryItem],
    total_estimated: f64,
) -> Result<EmailMessage, MealPlanError> {
    let to = validate_recipient(recipient)?;
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_GROCERY_TITLE);

    let mut body = String::with_capacity(256);
    let _ = writeln!(body, "Hi {},", greeting_name(name));
    let _ = writeln!(body, "Here's your grocery list for '{title}':");
    body.push('\n');
    if items.is_empty() {
        let _ = writeln!(body, "- {NOTHING_TO_BUY}");
    } else {
        for item in items {
            let _ = writeln!(body, "- {item}");
        }
    }
    body.push('\n');
    let total = if total_estimated.is_finite() {
        total_estimated.max(0.0)
    } else {
        0.0
    };
    let _ = writeln!(body, "Estimated total: ${total:.2} USD");
    body.push('\n');
    body.push_str("Happy cooking!\n");
    body.push_str(BRAND);
    body.push('\n');

    Ok(EmailMessage {
        to,
        subject: format!("{BRAND}: Grocery List for {title}"),
        body,
    })
}
