// ABOUTME: Cooking coach routes: step-by-step instructions and short chat replies
// ABOUTME: Thin handlers over CoachService
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::ApiJson;
use crate::errors::AppResult;
use crate::resources::ServerResources;
use crate::services::RecipeContext;

/// `POST /ai/instructions` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstructionsRequest {
    /// Recipe to explain
    #[serde(default)]
    pub recipe: RecipeContext,
}

/// `POST /ai/instructions` response
#[derive(Debug, Serialize, Deserialize)]
pub struct InstructionsResponse {
    /// Numbered steps, one per paragraph
    pub message: String,
}

/// `POST /ai/chat` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoachChatRequest {
    /// User question
    #[serde(default)]
    pub message: String,
    /// Recipe being cooked
    #[serde(default)]
    pub recipe: Option<RecipeContext>,
}

/// `POST /ai/chat` response
#[derive(Debug, Serialize, Deserialize)]
pub struct CoachChatResponse {
    /// Coach reply
    pub reply: String,
}

/// Cooking coach routes
pub struct CoachRoutes;

impl CoachRoutes {
    /// Create all coach routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/ai/instructions", post(Self::handle_instructions))
            .route("/ai/chat", post(Self::handle_chat))
            .with_state(resources)
    }

    async fn handle_instructions(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(request): ApiJson<InstructionsRequest>,
    ) -> AppResult<Json<InstructionsResponse>> {
        let message = resources.coach.instructions(&request.recipe).await?;
        Ok(Json(InstructionsResponse { message }))
    }

    async fn handle_chat(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(request): ApiJson<CoachChatRequest>,
    ) -> AppResult<Json<CoachChatResponse>> {
        let reply = resources
            .coach
            .chat(&request.message, request.recipe.as_ref())
            .await?;
        Ok(Json(CoachChatResponse { reply }))
    }
}
