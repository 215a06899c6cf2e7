// ABOUTME: Meal-plan request handler driving prompt, generation, parsing, and delivery in order
// ABOUTME: Explicit state machine with per-stage timeouts and no partial success
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Meal-Plan Request Handler
//!
//! One request moves through
//! `Received -> Generating -> Parsing -> Delivering -> Completed`,
//! or stops in `Failed(stage)` with the error of the stage that failed.
//! Nothing is reported to the caller until one of the two terminal states is
//! reached, and mail is never attempted unless a recipe was parsed.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use mealprep_core::{EmailMessage, Extracted, GeneratedRecipe, MealRequest};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{info, instrument, warn};

use crate::config::ServerConfig;
use crate::errors::{AppError, MealPlanError, PipelineStage};
use crate::llm::prompts::get_recipe_system_prompt;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::mail::{compose_recipe_email, is_valid_email, DeliveryReceipt, Mailer};
use crate::recipes::{build_recipe_prompt, RecipeParser};

/// Model parameters and bound for the generation call
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum completion tokens
    pub max_tokens: u32,
    /// Bound on one generation call
    pub timeout: Duration,
}

/// Where a request currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealPlanState {
    /// Input accepted, being validated
    Received,
    /// Waiting on the generation service
    Generating,
    /// Extracting the recipe from generation output
    Parsing,
    /// Composing and handing the email to the transport
    Delivering,
    /// Email accepted by the transport
    Completed,
    /// Stopped at the given stage
    Failed(PipelineStage),
}

impl MealPlanState {
    /// Stage a non-terminal state belongs to
    #[must_use]
    pub const fn stage(self) -> Option<PipelineStage> {
        match self {
            Self::Received => Some(PipelineStage::Received),
            Self::Generating => Some(PipelineStage::Generating),
            Self::Parsing => Some(PipelineStage::Parsing),
            Self::Delivering => Some(PipelineStage::Delivering),
            Self::Completed | Self::Failed(_) => None,
        }
    }
}

impl fmt::Display for MealPlanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Received => f.write_str("received"),
            Self::Generating => f.write_str("generating"),
            Self::Parsing => f.write_str("parsing"),
            Self::Delivering => f.write_str("delivering"),
            Self::Completed => f.write_str("completed"),
            Self::Failed(stage) => write!(f, "failed({stage})"),
        }
    }
}

/// Successful outcome of a meal-plan request
#[derive(Debug, Clone)]
pub struct MealPlanReport {
    /// Recipe that was delivered
    pub recipe: GeneratedRecipe,
    /// Message handed to the transport
    pub message: EmailMessage,
    /// Transport acknowledgement
    pub receipt: DeliveryReceipt,
}

/// Failed outcome: the stage that failed and why
#[derive(Debug, Error)]
#[error("meal plan failed while {stage}: {error}")]
pub struct StageFailure {
    /// Stage that failed
    pub stage: PipelineStage,
    /// Cause
    #[source]
    pub error: MealPlanError,
}

impl From<StageFailure> for AppError {
    fn from(failure: StageFailure) -> Self {
        Self::from(failure.error).with_stage(failure.stage)
    }
}

/// Tracks the current state and logs each transition
struct Run {
    state: MealPlanState,
    started: Instant,
}

impl Run {
    fn start() -> Self {
        let run = Self {
            state: MealPlanState::Received,
            started: Instant::now(),
        };
        run.log();
        run
    }

    fn enter(&mut self, state: MealPlanState) {
        self.state = state;
        self.log();
    }

    fn fail(&mut self, error: MealPlanError) -> StageFailure {
        let stage = self.state.stage().unwrap_or(PipelineStage::Received);
        self.state = MealPlanState::Failed(stage);
        warn!(
            meal_plan.state = %self.state,
            meal_plan.stage = %stage,
            meal_plan.retryable = error.is_retryable(),
            elapsed_ms = self.elapsed_ms(),
            error = %error,
            "Meal plan failed"
        );
        StageFailure { stage, error }
    }

    fn log(&self) {
        info!(
            meal_plan.state = %self.state,
            elapsed_ms = self.elapsed_ms(),
            "Meal plan state transition"
        );
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Ingredient lines that do not mention anything the user already has
fn derive_shopping_list(ingredients: &[String], pantry: &[String]) -> Vec<String> {
    let pantry: Vec<String> = pantry.iter().map(|p| p.to_lowercase()).collect();
    ingredients
        .iter()
        .filter(|line| {
            let line = line.to_lowercase();
            !pantry.iter().any(|have| line.contains(have.as_str()))
        })
        .cloned()
        .collect()
}

/// Orchestrates one meal-plan request end to end
pub struct MealPlanService {
    provider: Arc<dyn LlmProvider>,
    mailer: Arc<dyn Mailer>,
    parser: RecipeParser,
    generation: GenerationSettings,
    delivery_timeout: Duration,
}

impl MealPlanService {
    /// Create a handler from its collaborators
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        mailer: Arc<dyn Mailer>,
        parser: RecipeParser,
        generation: GenerationSettings,
        delivery_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            mailer,
            parser,
            generation,
            delivery_timeout,
        }
    }

    /// Create a handler using the server configuration's model and bounds
    #[must_use]
    pub fn from_config(
        config: &ServerConfig,
        provider: Arc<dyn LlmProvider>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self::new(
            provider,
            mailer,
            RecipeParser::new(config.parser),
            GenerationSettings {
                model: config.generation.model.clone(),
                temperature: config.generation.temperature,
                max_tokens: config.generation.max_tokens,
                timeout: config.generation.timeout,
            },
            config.mail.timeout,
        )
    }

    /// Run a request to completion
    ///
    /// # Errors
    ///
    /// Returns a [`StageFailure`] naming the stage that failed. Input
    /// problems fail at `Received` before any outbound call.
    #[instrument(skip_all, fields(provider = self.provider.name()))]
    pub async fn handle(&self, request: MealRequest) -> Result<MealPlanReport, StageFailure> {
        let mut run = Run::start();

        if !is_valid_email(request.email.trim()) {
            return Err(run.fail(MealPlanError::invalid_input(
                "a valid email address is required",
            )));
        }
        let prompt = build_recipe_prompt(&request).map_err(|e| run.fail(e))?;

        run.enter(MealPlanState::Generating);
        let raw = self.generate(prompt).await.map_err(|e| run.fail(e))?;

        run.enter(MealPlanState::Parsing);
        let mut recipe = self
            .parser
            .parse(&raw)
            .map_err(|e| run.fail(MealPlanError::Parse(e)))?;
        if recipe.shopping_list.is_unknown() {
            if let Some(ingredients) = recipe.ingredients.known() {
                recipe.shopping_list =
                    Extracted::Known(derive_shopping_list(ingredients, &request.ingredients));
            }
        }
        let unknown = recipe.unknown_fields();
        if !unknown.is_empty() {
            info!(unknown_fields = ?unknown, "Recipe parsed with unknown fields");
        }

        run.enter(MealPlanState::Delivering);
        let message = compose_recipe_email(&recipe, &request.email, request.name.as_deref())
            .map_err(|e| run.fail(e))?;
        let receipt = self.deliver(&message).await.map_err(|e| run.fail(e))?;

        run.enter(MealPlanState::Completed);
        Ok(MealPlanReport {
            recipe,
            message,
            receipt,
        })
    }

    #[instrument(skip_all, fields(model = %self.generation.model))]
    async fn generate(&self, prompt: String) -> Result<String, MealPlanError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(get_recipe_system_prompt()),
            ChatMessage::user(prompt),
        ])
        .with_model(self.generation.model.clone())
        .with_temperature(self.generation.temperature)
        .with_max_tokens(self.generation.max_tokens);

        let bound = self.generation.timeout;
        match timeout(bound, self.provider.complete(&request)).await {
            Ok(Ok(response)) => Ok(response.content),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(MealPlanError::Timeout {
                stage: PipelineStage::Generating,
                timeout: bound,
            }),
        }
    }

    #[instrument(skip_all, fields(mail.mode = self.mailer.mode().as_str()))]
    async fn deliver(&self, message: &EmailMessage) -> Result<DeliveryReceipt, MealPlanError> {
        let bound = self.delivery_timeout;
        match timeout(bound, self.mailer.send(message)).await {
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(MealPlanError::Timeout {
                stage: PipelineStage::Delivering,
                timeout: bound,
            }),
        }
    }
}
