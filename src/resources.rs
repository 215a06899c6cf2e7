// ABOUTME: Centralized resource container shared by every route handler
// ABOUTME: Built once at startup from configuration, the generation provider, and the mailer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Holds the immutable configuration and the services built from it. Handlers
//! receive it as `State<Arc<ServerResources>>`; nothing in it is mutated after
//! startup, so concurrent requests share it without locking.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::llm::{LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use crate::mail::{mailer_from_config, DeliveryMode, Mailer};
use crate::recipes::RecipeCatalog;
use crate::services::{
    CoachService, GenerationSettings, GroceryListService, MealPlanService,
};

/// Shared state for the HTTP layer
#[derive(Clone)]
pub struct ServerResources {
    /// Startup configuration
    pub config: Arc<ServerConfig>,
    /// Meal-plan request handler
    pub meal_plans: Arc<MealPlanService>,
    /// Cooking coach
    pub coach: Arc<CoachService>,
    /// Grocery list emails
    pub grocery_lists: Arc<GroceryListService>,
    /// Seed recipe catalog
    pub catalog: Arc<RecipeCatalog>,
    /// Generation provider name, for readiness reporting
    pub provider_name: &'static str,
    /// Mail transport in use
    pub delivery_mode: DeliveryMode,
}

impl ServerResources {
    /// Assemble resources from explicit collaborators
    ///
    /// Tests use this to inject stub providers and recording mailers.
    #[must_use]
    pub fn new(
        config: Arc<ServerConfig>,
        provider: Arc<dyn LlmProvider>,
        mailer: Arc<dyn Mailer>,
        catalog: RecipeCatalog,
    ) -> Self {
        let generation = GenerationSettings {
            model: config.generation.model.clone(),
            temperature: config.generation.temperature,
            max_tokens: config.generation.max_tokens,
            timeout: config.generation.timeout,
        };

        Self {
            meal_plans: Arc::new(MealPlanService::from_config(
                &config,
                Arc::clone(&provider),
                Arc::clone(&mailer),
            )),
            coach: Arc::new(CoachService::new(Arc::clone(&provider), generation)),
            grocery_lists: Arc::new(GroceryListService::new(
                Arc::clone(&mailer),
                config.mail.timeout,
            )),
            catalog: Arc::new(catalog),
            provider_name: provider.name(),
            delivery_mode: mailer.mode(),
            config,
        }
    }

    /// Build production resources: OpenAI-compatible client, SMTP or dry-run
    /// mailer, and the catalog from disk
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the HTTP client, the SMTP transport,
    /// or the catalog cannot be set up.
    pub fn from_config(config: Arc<ServerConfig>) -> AppResult<Self> {
        let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::from_generation(
            &config.generation,
        ))?;
        let mailer = mailer_from_config(&config.mail)?;
        let catalog = RecipeCatalog::load(&config.catalog_path)?;

        Ok(Self::new(config, Arc::new(provider), mailer, catalog))
    }
}
