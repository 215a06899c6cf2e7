// ABOUTME: Emil-ia cooking coach: step-by-step instructions and short chat replies for a recipe
// ABOUTME: Calls the generation client with the coach persona under the generation timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write as _;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::timeout;
use tracing::instrument;

use super::meal_plan::GenerationSettings;
use crate::constants::{limits, user_messages};
use crate::errors::{AppError, AppResult, ErrorCode, MealPlanError, PipelineStage};
use crate::llm::prompts::get_coach_system_prompt;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// A numbered step that the model ran into the previous sentence
static INLINE_STEP: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"([^\n])[ \t]+(\d{1,2}\.[ \t])").ok());

/// Recipe the user is cooking, as sent by the client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeContext {
    /// Recipe title
    #[serde(default)]
    pub title: Option<String>,
    /// Meal type
    #[serde(default, alias = "meal")]
    pub meal_type: Option<String>,
    /// Ingredient strings or `{name, qty, unit}` objects
    #[serde(default)]
    pub ingredients: Vec<Value>,
    /// Known macros, passed through as-is
    #[serde(default)]
    pub macros: Option<Value>,
    /// Total time in minutes
    #[serde(default)]
    pub time_min: Option<u32>,
}

impl RecipeContext {
    fn title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("Recipe")
    }

    fn ingredients_json(&self) -> String {
        serde_json::to_string(&self.ingredients).unwrap_or_default()
    }
}

/// Put every numbered step on its own line, separated by a blank line
fn format_steps(text: &str) -> String {
    let text = text.trim();
    INLINE_STEP
        .as_ref()
        .map_or_else(|| text.to_owned(), |re| re.replace_all(text, "$1\n\n$2").into_owned())
}

/// Cooking coach backed by the generation service
pub struct CoachService {
    provider: Arc<dyn LlmProvider>,
    settings: GenerationSettings,
}

impl CoachService {
    /// Create a coach
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    /// Step-by-step cooking guide for a recipe
    ///
    /// # Errors
    ///
    /// Returns a 502 or 504 `AppError` when the generation service fails or
    /// times out.
    #[instrument(skip_all, fields(recipe = %recipe.title()))]
    pub async fn instructions(&self, recipe: &RecipeContext) -> AppResult<String> {
        let title = recipe.title();
        let mut prompt = String::with_capacity(512);
        let _ = writeln!(
            prompt,
            "Greet the user once: \"Hi, I'm Emil-ia! I'm here to guide you through preparing {title}.\""
        );
        prompt.push_str("Then give 5-8 detailed cooking steps, each on its own line, numbered 1., 2., 3. and so on, with a blank line between steps.\n");
        prompt.push_str("Add small tips about heat level, timing, or texture where they help.\n");
        prompt.push_str("End with: \"If you have any questions, let me know!\"\n\n");
        prompt.push_str("Recipe context:\n");
        let _ = writeln!(prompt, "Title: {title}");
        let _ = writeln!(
            prompt,
            "Meal type: {}",
            recipe.meal_type.as_deref().unwrap_or_default()
        );
        let _ = writeln!(prompt, "Ingredients: {}", recipe.ingredients_json());
        let macros = recipe
            .macros
            .as_ref()
            .map_or_else(|| "{}".to_owned(), Value::to_string);
        let time = recipe
            .time_min
            .map_or_else(|| "unknown".to_owned(), |t| t.to_string());
        let _ = writeln!(prompt, "Known data: {macros}, time_min={time}");

        let reply = self.ask(prompt).await?;
        Ok(format_steps(&reply))
    }

    /// Short coaching reply to a user question
    ///
    /// # Errors
    ///
    /// Returns 400 for a blank or oversized message, 502 or 504 when the
    /// generation service fails or times out.
    #[instrument(skip_all)]
    pub async fn chat(&self, message: &str, recipe: Option<&RecipeContext>) -> AppResult<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::missing_field("message"));
        }
        if message.chars().count() > limits::MAX_CHAT_MESSAGE_CHARS {
            return Err(AppError::invalid_input(format!(
                "message must be at most {} characters",
                limits::MAX_CHAT_MESSAGE_CHARS
            )));
        }

        let context = recipe.cloned().unwrap_or_default();
        let mut prompt = String::with_capacity(256);
        prompt.push_str("Reply concisely with practical substitutions when relevant.\n");
        let _ = writeln!(prompt, "Recipe context: {}", context.title());
        let _ = writeln!(prompt, "Ingredients: {}", context.ingredients_json());
        let _ = writeln!(prompt, "User message: {message}");

        self.ask(prompt).await
    }

    async fn ask(&self, prompt: String) -> AppResult<String> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(get_coach_system_prompt()),
            ChatMessage::user(prompt),
        ])
        .with_model(self.settings.model.clone())
        .with_temperature(self.settings.temperature)
        .with_max_tokens(self.settings.max_tokens);

        let result = match timeout(self.settings.timeout, self.provider.complete(&request)).await {
            Ok(Ok(response)) => return Ok(response.content.trim().to_owned()),
            Ok(Err(e)) => MealPlanError::from(e),
            Err(_) => MealPlanError::Timeout {
                stage: PipelineStage::Generating,
                timeout: self.settings.timeout,
            },
        };

        let mut error = AppError::from(result);
        if error.code == ErrorCode::GenerationFailed {
            error.message = user_messages::COACH_UNAVAILABLE.to_owned();
        }
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_steps_breaks_inline_numbering() {
        let formatted = format_steps("Hi! 1. Boil water. 2. Add pasta.\n3. Drain.");
        assert_eq!(formatted, "Hi!\n\n1. Boil water.\n\n2. Add pasta.\n3. Drain.");
    }

    #[test]
    fn test_recipe_context_accepts_mixed_ingredients() {
        let context: RecipeContext = serde_json::from_str(
            r#"{"title": "Oats", "meal": "breakfast", "ingredients": ["oats", {"name": "milk", "qty": 1, "unit": "cup"}]}"#,
        )
        .unwrap();
        assert_eq!(context.meal_type.as_deref(), Some("breakfast"));
        assert!(context.ingredients_json().contains("\"milk\""));
        assert_eq!(RecipeContext::default().title(), "Recipe");
    }
}
