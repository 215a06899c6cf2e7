// ABOUTME: Tolerant extraction of a structured recipe from raw generation output
// ABOUTME: Accepts JSON or sectioned prose and marks anything it cannot find as unknown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Response Parser
//!
//! The generation service is asked for a fixed layout but does not always
//! follow it. The parser accepts two shapes:
//!
//! - a JSON object with recipe-like keys, optionally wrapped in a code fence
//! - sectioned prose or markdown (`Title:`, `## Ingredients`, `**Steps**`, ...)
//!
//! Numeric facts (macros, cost, prep time) are found with regular expressions,
//! first inside their own section and then on labeled lines anywhere in the
//! text. Fields that cannot be identified stay `Extracted::Unknown`.
//!
//! A response only fails when fewer than `min_recognized_sections` of the
//! seven recipe sections could be identified.

use std::sync::LazyLock;

use mealprep_core::{Extracted, GeneratedRecipe, NutritionSummary};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::constants::defaults;

/// Tolerance settings for the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Sections that must be identified before the output counts as a recipe
    pub min_recognized_sections: usize,
}

impl ParserConfig {
    /// Number of recipe sections the parser can recognize
    pub const MAX_SECTIONS: usize = 7;
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_recognized_sections: defaults::PARSER_MIN_SECTIONS,
        }
    }
}

/// Generation output that cannot be used as a recipe
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing but whitespace came back
    #[error("generation output is empty")]
    Empty,
    /// Too little recipe structure (refusal, apology, off-topic answer)
    #[error("no recognizable recipe structure: {recognized} of {required} required sections found")]
    NoRecipeStructure {
        /// Sections identified
        recognized: usize,
        /// Sections required by configuration
        required: usize,
    },
}

// ============================================================================
// Patterns
// ============================================================================

/// Heading keyword, optional parenthetical, optional colon, inline remainder
static HEADING_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(recipe\s+name|recipe\s+title|title|name|ingredient\s+list|ingredients|preparation\s+steps|steps|instructions|directions|method|nutrition(?:al)?(?:\s+(?:info(?:rmation)?|facts|summary))?|macros|macronutrients|estimated\s+cost|cost\s+per\s+serving|cost|estimated\s+price|price|prep(?:aration)?\s+time|total\s+time|cook(?:ing)?\s+time|time|shopping\s+list|grocery\s+list|groceries|to\s+buy)\b\s*(?:\([^)]*\))?\s*(:)?\s*(.*)$",
    )
    .ok()
});

/// Bullet, number, or "Step N" prefix on a list item
static LIST_MARKER_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[-*•+]\s+|\d{1,2}\s*[.)]\s*|step\s*\d+\s*[:.)\-]?\s*)").ok()
});

static HOURS_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:hours?|hrs?|h)(?:\b|\d)").ok());

static MINUTES_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:minutes?|mins?|m)\b").ok());

static MONEY_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\$\s*(\d+(?:\.\d{1,2})?)|(\d+(?:\.\d{1,2})?)\s*(?:usd|dollars?)\b)").ok()
});

static NUMBER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(-?\d+(?:\.\d+)?)").ok());

static COST_LINE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?im)^.*\b(?:estimated\s+cost|cost\s+per\s+serving|cost|price)\b.*$").ok()
});

static TIME_LINE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^.*\b(?:prep(?:aration)?\s+time|total\s+time|cook(?:ing)?\s+time|ready\s+in)\b.*$",
    )
    .ok()
});

/// Labeled (`Protein: 38`) and trailing (`38 g protein`) forms of one macro
///
/// A sign directly before the digits is captured so negative amounts become
/// unknown; `-` only counts as a separator when whitespace follows it.
struct MacroPattern {
    labeled: Option<Regex>,
    trailing: Option<Regex>,
}

impl MacroPattern {
    fn new(label: &str, unit: &str) -> Self {
        Self {
            labeled: Regex::new(&format!(
                r"(?i)\b(?:{label})\b\s*(?:\([^)]*\))?\s*(?:per\s+serving)?\s*(?:[:=]|[\-–]\s)?\s*(?:~|about|approx\.?|approximately)?\s*(-?\d+(?:\.\d+)?)"
            ))
            .ok(),
            trailing: Regex::new(&format!(
                r"(?i)(?:^|[^\d.])(-?\d+(?:\.\d+)?)\s*{unit}\s*(?:of\s+)?(?:{label})\b"
            ))
                .ok(),
        }
    }

    fn find(&self, text: &str) -> Option<f64> {
        [self.labeled.as_ref(), self.trailing.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|re| first_capture(re, text))
    }
}

static CALORIES: LazyLock<MacroPattern> = LazyLock::new(|| MacroPattern {
    labeled: MacroPattern::new("calories|energy|kcal", "").labeled,
    trailing: Regex::new(r"(?i)(?:^|[^\d.])(-?\d+(?:\.\d+)?)\s*(?:kcal|calories|cals?)\b").ok(),
});
static PROTEIN: LazyLock<MacroPattern> =
    LazyLock::new(|| MacroPattern::new("protein", r"(?:g|grams?)"));
static CARBS: LazyLock<MacroPattern> = LazyLock::new(|| {
    MacroPattern::new("carbs|carbohydrates?|carbohydrate", r"(?:g|grams?)")
});
static FAT: LazyLock<MacroPattern> =
    LazyLock::new(|| MacroPattern::new("fats?|total\\s+fat", r"(?:g|grams?)"));

fn first_capture(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)?
        .iter()
        .skip(1)
        .flatten()
        .next()
        .and_then(|m| m.as_str().parse().ok())
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Title,
    Ingredients,
    Steps,
    Nutrition,
    Cost,
    PrepTime,
    ShoppingList,
}

impl Section {
    fn from_keyword(keyword: &str) -> Self {
        let keyword = keyword.to_lowercase();
        if keyword.contains("title") || keyword.contains("name") {
            Self::Title
        } else if keyword.starts_with("ingredient") {
            Self::Ingredients
        } else if keyword.starts_with("nutrition") || keyword.starts_with("macro") {
            Self::Nutrition
        } else if keyword.contains("cost") || keyword.contains("price") {
            Self::Cost
        } else if keyword.contains("time") {
            Self::PrepTime
        } else if keyword.contains("shopping")
            || keyword.contains("grocer")
            || keyword.contains("buy")
        {
            Self::ShoppingList
        } else {
            Self::Steps
        }
    }
}

/// Raw text collected per section while scanning prose
#[derive(Debug, Default)]
struct SectionText {
    title: Option<String>,
    ingredients: Vec<String>,
    steps: Vec<String>,
    nutrition: String,
    cost: String,
    prep_time: String,
    shopping_list: Vec<String>,
}

impl SectionText {
    fn push(&mut self, section: Section, content: &str, inline: bool) {
        let content = content.trim();
        if content.is_empty() {
            return;
        }

        match section {
            Section::Title => {
                if self.title.is_none() {
                    self.title = Some(strip_markdown(content)).filter(|t| !t.is_empty());
                }
            }
            Section::Nutrition => push_line(&mut self.nutrition, content),
            Section::Cost => push_line(&mut self.cost, content),
            Section::PrepTime => push_line(&mut self.prep_time, content),
            list => {
                let target = match list {
                    Section::Ingredients => &mut self.ingredients,
                    Section::Steps => &mut self.steps,
                    _ => &mut self.shopping_list,
                };
                // "Shopping list: rice, tuna" on the heading line
                if inline && list != Section::Steps && content.contains(',') {
                    target.extend(content.split(',').filter_map(list_item));
                } else if let Some(item) = list_item(content) {
                    target.push(item);
                }
            }
        }
    }
}

fn push_line(buffer: &mut String, line: &str) {
    buffer.push_str(line);
    buffer.push('\n');
}

/// Strip the list marker and markdown emphasis; drop empties and sub-headings
fn list_item(raw: &str) -> Option<String> {
    let mut item = raw.trim();
    if let Some(re) = LIST_MARKER_PATTERN.as_ref() {
        if let Some(marker) = re.find(item) {
            item = &item[marker.end()..];
        }
    }
    let item = strip_markdown(item);
    if item.is_empty() || item.ends_with(':') {
        None
    } else {
        Some(item)
    }
}

fn strip_markdown(text: &str) -> String {
    text.trim()
        .trim_start_matches('#')
        .replace("**", "")
        .replace("__", "")
        .trim_matches(|c: char| c == '*' || c == '_' || c == '"' || c.is_whitespace())
        .to_owned()
}

/// Recognize a heading line, returning its section and any inline content
fn classify_heading(line: &str) -> Option<(Section, String)> {
    let cleaned = strip_markdown(line);
    let captures = HEADING_PATTERN.as_ref()?.captures(&cleaned)?;
    let keyword = captures.get(1)?.as_str();
    let has_colon = captures.get(2).is_some();
    let rest = captures.get(3).map_or("", |m| m.as_str()).trim();

    // "Cook the rice" is a step, "Cook time: 10 min" is a heading
    if !rest.is_empty() && !has_colon {
        return None;
    }
    Some((Section::from_keyword(keyword), rest.to_owned()))
}

/// A markdown heading or bold line that names the dish
fn markdown_title(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let looks_like_heading =
        trimmed.starts_with('#') || (trimmed.starts_with("**") && trimmed.ends_with("**"));
    if !looks_like_heading {
        return None;
    }
    let title = strip_markdown(trimmed);
    (!title.is_empty() && title.chars().count() <= 120).then_some(title)
}

fn is_decoration(line: &str) -> bool {
    line.starts_with("```") || line.chars().all(|c| matches!(c, '-' | '=' | '*' | '_'))
}

// ============================================================================
// Value extraction
// ============================================================================

fn bare_number(text: &str) -> Option<f64> {
    NUMBER_PATTERN.as_ref().and_then(|re| first_capture(re, text))
}

/// An amount marked with `$` or `usd`
fn marked_money(text: &str) -> Option<f64> {
    MONEY_PATTERN.as_ref().and_then(|re| first_capture(re, text))
}

/// A marked amount, or the first number when the text is known to be a cost
fn extract_money(text: &str) -> Option<f64> {
    marked_money(text).or_else(|| bare_number(text))
}

/// Minutes from "1 hour 10 minutes", "1h30m", "1.5 hours" or "25 min"
fn marked_minutes(text: &str) -> Option<u32> {
    let hours = HOURS_PATTERN.as_ref().and_then(|re| first_capture(re, text));
    let minutes = MINUTES_PATTERN.as_ref().and_then(|re| first_capture(re, text));
    if hours.is_none() && minutes.is_none() {
        return None;
    }
    to_minutes(hours.unwrap_or(0.0).mul_add(60.0, minutes.unwrap_or(0.0)))
}

/// Marked minutes, or a bare number when the text is known to be a duration
fn extract_minutes(text: &str) -> Option<u32> {
    marked_minutes(text).or_else(|| bare_number(text).and_then(to_minutes))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_minutes(value: f64) -> Option<u32> {
    (value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX))
        .then(|| value.round() as u32)
}

/// Search the section text first, then labeled lines anywhere in the response
///
/// Labeled lines only yield values carrying a unit or currency marker, so a
/// step number on a line that mentions "cost" is never read as a price.
fn from_section_or_labeled_line<T>(
    section: &str,
    whole: &str,
    line_pattern: &LazyLock<Option<Regex>>,
    in_section: impl Fn(&str) -> Option<T>,
    on_line: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    if !section.is_empty() {
        if let Some(value) = in_section(section) {
            return Some(value);
        }
    }
    line_pattern
        .as_ref()?
        .find_iter(whole)
        .find_map(|m| on_line(m.as_str()))
}

fn extract_nutrition(section: &str, whole: &str) -> NutritionSummary {
    let find = |pattern: &MacroPattern| {
        let value = pattern.find(section).or_else(|| pattern.find(whole));
        value.map_or(Extracted::Unknown, Extracted::non_negative)
    };
    NutritionSummary {
        calories: find(&*CALORIES),
        protein_g: find(&*PROTEIN),
        carbs_g: find(&*CARBS),
        fat_g: find(&*FAT),
    }
}

/// Case-insensitive dedupe that keeps the first spelling and order
fn unique(items: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(items.len());
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let key = item.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(item);
        }
    }
    out
}

/// Number of the seven sections that hold a known value
fn recognized_sections(recipe: &GeneratedRecipe) -> usize {
    [
        recipe.title.is_known(),
        recipe.ingredients.is_known(),
        recipe.steps.is_known(),
        recipe.nutrition.any_known(),
        recipe.estimated_cost_usd.is_known(),
        recipe.prep_time_minutes.is_known(),
        recipe.shopping_list.is_known(),
    ]
    .into_iter()
    .filter(|known| *known)
    .count()
}

// ============================================================================
// JSON shape
// ============================================================================

/// Look up a field by any of several names, ignoring case, `_`, `-` and spaces
fn field<'a>(object: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    object.iter().find_map(|(key, value)| {
        let normalized: String = key
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        (names.contains(&normalized.as_str()) && !value.is_null()).then_some(value)
    })
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(strip_markdown(s)).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_number(value: &Value, from_text: impl Fn(&str) -> Option<f64>) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => from_text(s),
        _ => None,
    }
}

/// Render an ingredient object (`{name, qty, unit}`) as one line
fn json_ingredient(object: &Map<String, Value>) -> Option<String> {
    let name = field(object, &["name", "item", "ingredient"]).and_then(json_text)?;
    let qty = field(object, &["qty", "quantity", "amount"]).and_then(json_text);
    let unit = field(object, &["unit", "units"]).and_then(json_text);
    let parts: Vec<String> = [qty, unit, Some(name)].into_iter().flatten().collect();
    Some(parts.join(" "))
}

fn json_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(object) => json_ingredient(object),
                other => json_text(other).and_then(|t| list_item(&t)),
            })
            .collect(),
        Value::String(text) => text.lines().filter_map(list_item).collect(),
        _ => Vec::new(),
    }
}

/// Slice out the outermost JSON object, ignoring fences and surrounding prose
fn json_candidate(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_json(text: &str) -> Option<GeneratedRecipe> {
    let value: Value = serde_json::from_str(json_candidate(text)?).ok()?;
    let root = value.as_object()?;
    let object = field(root, &["recipe"])
        .and_then(Value::as_object)
        .unwrap_or(root);

    let title = field(object, &["title", "name", "recipename", "recipetitle"]).and_then(json_text);
    let ingredients = field(object, &["ingredients", "ingredientlist"]).map(json_list);
    let steps = field(object, &["steps", "instructions", "directions", "method"]).map(json_list);
    let shopping = field(object, &["shoppinglist", "grocerylist", "groceries", "shoppingdelta"])
        .map(json_list);

    if title.is_none() && ingredients.is_none() && steps.is_none() {
        return None;
    }

    let macros = field(object, &["nutrition", "macros", "nutritioninfo", "nutritionfacts"])
        .and_then(Value::as_object)
        .unwrap_or(object);
    let macro_value = |names: &[&str]| {
        field(macros, names)
            .and_then(|v| json_number(v, bare_number))
            .map_or(Extracted::Unknown, Extracted::non_negative)
    };

    let cost = field(
        object,
        &["estimatedcost", "estimatedcostusd", "cost", "costusd", "costperservingusd", "price"],
    )
    .and_then(|v| json_number(v, extract_money));
    let prep = field(
        object,
        &["preptime", "preptimeminutes", "timemin", "totaltime", "cooktime", "time"],
    )
    .and_then(|v| match v {
        Value::Number(n) => n.as_f64().and_then(to_minutes),
        Value::String(s) => extract_minutes(s),
        _ => None,
    });

    Some(GeneratedRecipe {
        title: title.into(),
        ingredients: Extracted::non_empty(ingredients.unwrap_or_default()),
        steps: Extracted::non_empty(steps.unwrap_or_default()),
        nutrition: NutritionSummary {
            calories: macro_value(&["calories", "kcal", "energy"]),
            protein_g: macro_value(&["protein", "proteing", "proteingrams"]),
            carbs_g: macro_value(&["carbs", "carbsg", "carbohydrates", "carbohydratesg"]),
            fat_g: macro_value(&["fat", "fatg", "fats", "totalfat"]),
        },
        estimated_cost_usd: cost.map_or(Extracted::Unknown, Extracted::non_negative),
        prep_time_minutes: prep.into(),
        shopping_list: Extracted::non_empty(unique(shopping.unwrap_or_default())),
    })
}

// ============================================================================
// Prose shape
// ============================================================================

fn parse_prose(text: &str) -> GeneratedRecipe {
    let mut sections = SectionText::default();
    let mut current: Option<Section> = None;
    let mut leading_title: Option<String> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || is_decoration(line) {
            continue;
        }

        if let Some((section, inline)) = classify_heading(line) {
            current = Some(section);
            sections.push(section, &inline, true);
            continue;
        }

        match current {
            Some(section) => sections.push(section, line, false),
            None if leading_title.is_none() => leading_title = markdown_title(line),
            None => {}
        }
    }

    let prep_time = from_section_or_labeled_line(
        &sections.prep_time,
        text,
        &TIME_LINE_PATTERN,
        extract_minutes,
        marked_minutes,
    );
    let cost = from_section_or_labeled_line(
        &sections.cost,
        text,
        &COST_LINE_PATTERN,
        extract_money,
        marked_money,
    );

    GeneratedRecipe {
        title: sections.title.or(leading_title).into(),
        ingredients: Extracted::non_empty(sections.ingredients),
        steps: Extracted::non_empty(sections.steps),
        nutrition: extract_nutrition(&sections.nutrition, text),
        estimated_cost_usd: cost.map_or(Extracted::Unknown, Extracted::non_negative),
        prep_time_minutes: prep_time.into(),
        shopping_list: Extracted::non_empty(unique(sections.shopping_list)),
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Extracts a [`GeneratedRecipe`] from raw generation text
#[derive(Debug, Clone, Default)]
pub struct RecipeParser {
    config: ParserConfig,
}

impl RecipeParser {
    /// Create a parser with the given tolerance
    #[must_use]
    pub const fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse raw generation output
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Empty` for blank input and
    /// `ParseError::NoRecipeStructure` when fewer sections than configured
    /// could be identified. Partial extraction is not an error.
    pub fn parse(&self, raw: &str) -> Result<GeneratedRecipe, ParseError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(ParseError::Empty);
        }

        let recipe = parse_json(text).unwrap_or_else(|| parse_prose(text));
        let recognized = recognized_sections(&recipe);
        let required = self.config.min_recognized_sections;

        debug!(
            recognized,
            required,
            unknown = ?recipe.unknown_fields(),
            "Parsed generation output"
        );

        if recognized < required {
            return Err(ParseError::NoRecipeStructure {
                recognized,
                required,
            });
        }
        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
Title: Tuna Rice Power Bowl
Ingredients:
- 150 g cooked rice
- 1 can tuna in water
- 1 cup spinach
- 1 tbsp soy sauce
Steps:
1. Warm the rice.
2. Flake the tuna over the rice.
3. Wilt the spinach and add soy sauce.
Nutrition: Calories 480 kcal, Protein 42 g, Carbs 55 g, Fat 8 g
Estimated cost: $3.75 per serving
Prep time: 15 minutes
Shopping list:
- spinach
- soy sauce
";

    fn parser() -> RecipeParser {
        RecipeParser::default()
    }

    #[test]
    fn test_well_formed_response_has_no_unknowns() {
        let recipe = parser().parse(WELL_FORMED).unwrap();

        assert!(recipe.unknown_fields().is_empty(), "{:?}", recipe.unknown_fields());
        assert_eq!(recipe.display_title(), "Tuna Rice Power Bowl");
        assert_eq!(recipe.ingredients.items().len(), 4);
        assert_eq!(recipe.steps.items()[1], "Flake the tuna over the rice.");
        assert_eq!(recipe.nutrition.calories, Extracted::Known(480.0));
        assert_eq!(recipe.nutrition.protein_g, Extracted::Known(42.0));
        assert_eq!(recipe.nutrition.carbs_g, Extracted::Known(55.0));
        assert_eq!(recipe.nutrition.fat_g, Extracted::Known(8.0));
        assert_eq!(recipe.estimated_cost_usd, Extracted::Known(3.75));
        assert_eq!(recipe.prep_time_minutes, Extracted::Known(15));
        assert_eq!(recipe.shopping_list.items(), ["spinach", "soy sauce"]);
    }

    #[test]
    fn test_empty_response_is_parse_error() {
        assert_eq!(parser().parse(""), Err(ParseError::Empty));
        assert_eq!(parser().parse("  \n\t "), Err(ParseError::Empty));
    }

    #[test]
    fn test_refusal_has_no_recipe_structure() {
        let error = parser()
            .parse("I'm sorry, but I can't help with that request.")
            .unwrap_err();
        assert_eq!(
            error,
            ParseError::NoRecipeStructure {
                recognized: 0,
                required: 2
            }
        );
    }

    #[test]
    fn test_markdown_drift_is_tolerated() {
        let raw = "\
# Lemon Garlic Chicken

**Ingredients**
* 2 chicken thighs
* 1 lemon

## Instructions
Step 1: Season the chicken.
Step 2: Roast for 25 minutes.

**Macros (per serving):** 520 kcal, 45g protein, 12g carbs, 30g fat
**Total time:** 1 hour 10 minutes
";
        let recipe = parser().parse(raw).unwrap();

        assert_eq!(recipe.display_title(), "Lemon Garlic Chicken");
        assert_eq!(recipe.ingredients.items(), ["2 chicken thighs", "1 lemon"]);
        assert_eq!(recipe.steps.items()[0], "Season the chicken.");
        assert_eq!(recipe.nutrition.calories, Extracted::Known(520.0));
        assert_eq!(recipe.nutrition.protein_g, Extracted::Known(45.0));
        assert_eq!(recipe.nutrition.carbs_g, Extracted::Known(12.0));
        assert_eq!(recipe.nutrition.fat_g, Extracted::Known(30.0));
        assert_eq!(recipe.prep_time_minutes, Extracted::Known(70));
        assert!(recipe.estimated_cost_usd.is_unknown());
        assert!(recipe.shopping_list.is_unknown());
    }

    #[test]
    fn test_partial_extraction_marks_unknown_instead_of_failing() {
        let raw = "Title: Overnight Oats\nIngredients: oats, milk, honey\n";
        let recipe = parser().parse(raw).unwrap();

        assert_eq!(recipe.ingredients.items(), ["oats", "milk", "honey"]);
        let unknown = recipe.unknown_fields();
        assert!(unknown.contains(&"steps"));
        assert!(unknown.contains(&"calories"));
        assert!(unknown.contains(&"estimated_cost_usd"));
    }

    #[test]
    fn test_threshold_is_configurable() {
        let raw = "Title: Mystery Dish";
        assert!(parser().parse(raw).is_err());

        let lenient = RecipeParser::new(ParserConfig {
            min_recognized_sections: 1,
        });
        assert_eq!(lenient.parse(raw).unwrap().display_title(), "Mystery Dish");
    }

    #[test]
    fn test_json_response_in_code_fence() {
        let raw = r#"```json
{
  "recipe": {
    "title": "Black Bean Tacos",
    "ingredients": [
      {"name": "black beans", "qty": 1, "unit": "can"},
      "4 corn tortillas"
    ],
    "instructions": "1. Warm the beans.\n2. Fill the tortillas.",
    "macros": {"kcal": 410, "protein_g": "18 g", "carbs_g": 60, "fat_g": 9},
    "cost_per_serving_usd": "$2.10",
    "time_min": 12,
    "shopping_list": ["tortillas", "Tortillas", "lime"]
  }
}
```"#;
        let recipe = parser().parse(raw).unwrap();

        assert_eq!(recipe.display_title(), "Black Bean Tacos");
        assert_eq!(
            recipe.ingredients.items(),
            ["1 can black beans", "4 corn tortillas"]
        );
        assert_eq!(recipe.steps.items(), ["Warm the beans.", "Fill the tortillas."]);
        assert_eq!(recipe.nutrition.calories, Extracted::Known(410.0));
        assert_eq!(recipe.nutrition.protein_g, Extracted::Known(18.0));
        assert_eq!(recipe.estimated_cost_usd, Extracted::Known(2.10));
        assert_eq!(recipe.prep_time_minutes, Extracted::Known(12));
        assert_eq!(recipe.shopping_list.items(), ["tortillas", "lime"]);
    }

    #[test]
    fn test_negative_numbers_never_become_values() {
        let raw = "Title: Broth\nIngredients:\n- water\nNutrition: Calories -120, Protein -3 g\n";
        let recipe = parser().parse(raw).unwrap();
        assert!(recipe.nutrition.calories.is_unknown());
        assert!(recipe.nutrition.protein_g.is_unknown());

        let json = r#"{"title": "Broth", "ingredients": ["water"], "calories": -50, "protein": "-3 g"}"#;
        let recipe = parser().parse(json).unwrap();
        assert!(recipe.nutrition.calories.is_unknown());
        assert!(recipe.nutrition.protein_g.is_unknown());
    }

    #[test]
    fn test_dash_separator_still_reads_value() {
        let raw = "Title: Broth\nIngredients:\n- water\nNutrition: Calories - 120, Protein – 9 g\n";
        let recipe = parser().parse(raw).unwrap();
        assert_eq!(recipe.nutrition.calories, Extracted::Known(120.0));
        assert_eq!(recipe.nutrition.protein_g, Extracted::Known(9.0));
    }

    #[test]
    fn test_step_mentioning_cost_is_not_a_price() {
        let raw = "\
Title: Egg Fried Rice
Steps:
1. Fry the eggs.
2. Use day-old rice to keep the cost down.
";
        let recipe = parser().parse(raw).unwrap();
        assert!(recipe.estimated_cost_usd.is_unknown());
    }

    #[test]
    fn test_bare_number_inside_cost_section_is_used() {
        let raw = "Title: Egg Fried Rice\nIngredients:\n- rice\nEstimated cost: 2.40 per serving\n";
        let recipe = parser().parse(raw).unwrap();
        assert_eq!(recipe.estimated_cost_usd, Extracted::Known(2.40));
    }

    #[test]
    fn test_compact_hours_and_minutes() {
        let raw = "Title: Braised Beans\nIngredients:\n- beans\nPrep time: 1h30m\n";
        let recipe = parser().parse(raw).unwrap();
        assert_eq!(recipe.prep_time_minutes, Extracted::Known(90));

        assert_eq!(extract_minutes("2h"), Some(120));
        assert_eq!(extract_minutes("1h 15m"), Some(75));
        assert_eq!(extract_minutes("45"), Some(45));
        assert_eq!(marked_minutes("2. Keep prep time short"), None);
    }

    #[test]
    fn test_cost_and_time_found_on_labeled_lines_anywhere() {
        let raw = "\
Title: Egg Fried Rice
Ingredients:
- rice
- eggs
Cost per serving is about $1.80, and total time is 20 minutes.
";
        let recipe = parser().parse(raw).unwrap();
        assert_eq!(recipe.estimated_cost_usd, Extracted::Known(1.80));
        assert_eq!(recipe.prep_time_minutes, Extracted::Known(20));
    }

    #[test]
    fn test_step_durations_are_not_taken_as_prep_time() {
        let raw = "Title: Soup\nSteps:\n1. Simmer for 40 minutes.\n";
        let recipe = parser().parse(raw).unwrap();
        assert!(recipe.prep_time_minutes.is_unknown());
    }
}
