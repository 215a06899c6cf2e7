// ABOUTME: Grocery list email route for catalog recipes
// ABOUTME: Decodes the shopping delta and hands it to GroceryListService
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use mealprep_core::GroceryItem;
use serde::{Deserialize, Serialize};

use super::{header_request_id, ApiJson};
use crate::constants::user_messages;
use crate::errors::AppError;
use crate::mail::DeliveryMode;
use crate::resources::ServerResources;
use crate::services::GroceryListRequest;

/// `POST /email` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailRequest {
    /// Recipient address
    #[serde(default)]
    pub to: Option<String>,
    /// Greeting name
    #[serde(default)]
    pub name: Option<String>,
    /// Recipe title
    #[serde(default)]
    pub title: Option<String>,
    /// Items still to buy
    #[serde(default)]
    pub shopping_delta: Vec<GroceryItem>,
    /// Estimated total in USD
    #[serde(default)]
    pub total_estimated: Option<f64>,
}

/// `POST /email` response
#[derive(Debug, Serialize, Deserialize)]
pub struct EmailResponse {
    /// Always `true`
    pub success: bool,
    /// Outcome
    pub message: String,
    /// Transport that handled the list
    pub mode: DeliveryMode,
}

/// Grocery list email routes
pub struct EmailRoutes;

impl EmailRoutes {
    /// Create all email routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/email", post(Self::handle_email))
            .with_state(resources)
    }

    async fn handle_email(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ApiJson(request): ApiJson<EmailRequest>,
    ) -> Result<Json<EmailResponse>, AppError> {
        let request = GroceryListRequest {
            to: request.to.unwrap_or_default(),
            name: request.name,
            title: request.title,
            items: request.shopping_delta,
            total_estimated: request.total_estimated.unwrap_or_default(),
        };

        let receipt = resources
            .grocery_lists
            .send(&request)
            .await
            .map_err(|error| match header_request_id(&headers) {
                Some(id) => error.with_request_id(id),
                None => error,
            })?;

        Ok(Json(EmailResponse {
            success: true,
            message: user_messages::GROCERY_LIST_SENT.to_owned(),
            mode: receipt.mode,
        }))
    }
}
