// ABOUTME: Meal request route: accepts the form or a JSON body and runs the meal-plan handler
// ABOUTME: Maps each failed stage to its HTTP status and returns the delivered recipe on success
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Meal request routes
//!
//! `POST /api/meal-plan` (and its alias `POST /generate`) accept either
//! `application/json` or `application/x-www-form-urlencoded`. Form list
//! fields are comma-separated.

use std::sync::Arc;

use axum::extract::{FromRequest, Request, State};
use axum::http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{async_trait, Form, Json, Router};
use mealprep_core::{GeneratedRecipe, MealRequest, MealType};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{header_request_id, ListField};
use crate::constants::user_messages;
use crate::errors::{AppError, AppResult};
use crate::mail::{DeliveryMode, DeliveryReceipt};
use crate::resources::ServerResources;

/// Budget sent as a number (JSON) or as text (form field)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BudgetField {
    /// `7.5`
    Amount(f64),
    /// `"7.50"`, `"$7.50"` or `""`
    Text(String),
}

impl BudgetField {
    fn into_amount(self) -> AppResult<Option<f64>> {
        let amount = match self {
            Self::Amount(amount) => amount,
            Self::Text(text) => {
                let text = text.trim().trim_start_matches('$').trim();
                if text.is_empty() {
                    return Ok(None);
                }
                text.parse::<f64>()
                    .map_err(|_| AppError::invalid_input("budget must be a number"))?
            }
        };

        if !amount.is_finite() || amount < 0.0 {
            return Err(AppError::invalid_input("budget must be a positive amount"));
        }
        Ok(Some(amount))
    }
}

/// Raw meal request as submitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealPlanPayload {
    /// What the user wants to eat
    #[serde(default, alias = "prompt")]
    pub description: Option<String>,
    /// Ingredients on hand
    #[serde(default)]
    pub ingredients: ListField,
    /// Dietary goal
    #[serde(default)]
    pub goal: Option<String>,
    /// Excluded ingredients
    #[serde(default)]
    pub allergies: ListField,
    /// Per-serving budget in USD
    #[serde(default)]
    pub budget: Option<BudgetField>,
    /// Meal type
    #[serde(default, alias = "meal")]
    pub meal_type: Option<String>,
    /// Recipient address
    #[serde(default)]
    pub email: Option<String>,
    /// Greeting name
    #[serde(default)]
    pub name: Option<String>,
}

impl MealPlanPayload {
    /// Normalize into a `MealRequest`
    ///
    /// # Errors
    ///
    /// Returns 400 when the budget is not a non-negative number or the meal
    /// type is not one of breakfast, lunch, dinner or snack.
    pub fn into_meal_request(self) -> AppResult<MealRequest> {
        let budget = self.budget.map(BudgetField::into_amount).transpose()?.flatten();
        let meal_type = self
            .meal_type
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(str::parse::<MealType>)
            .transpose()
            .map_err(|error| AppError::invalid_input(error.to_string()))?;

        Ok(MealRequest::normalized(
            self.description.as_deref().unwrap_or_default(),
            self.ingredients.into_vec(),
            self.goal.as_deref(),
            self.allergies.into_vec(),
            budget,
            meal_type,
            self.email.as_deref().unwrap_or_default(),
            self.name.as_deref(),
        ))
    }
}

/// Extracts a `MealPlanPayload` from a form post or a JSON body
pub struct MealPlanInput(pub MealPlanPayload);

#[async_trait]
impl<S> FromRequest<S> for MealPlanInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        let payload = if is_form {
            Form::<MealPlanPayload>::from_request(req, state)
                .await
                .map(|Form(payload)| payload)
                .map_err(|rejection| AppError::invalid_input(rejection.body_text()))?
        } else {
            Json::<MealPlanPayload>::from_request(req, state)
                .await
                .map(|Json(payload)| payload)
                .map_err(|rejection| AppError::invalid_input(rejection.body_text()))?
        };

        Ok(Self(payload))
    }
}

/// Successful meal-plan response
#[derive(Debug, Serialize, Deserialize)]
pub struct MealPlanResponse {
    /// Always `true`
    pub success: bool,
    /// What happened to the email
    pub message: String,
    /// Recipe that was sent
    pub recipe: GeneratedRecipe,
    /// Transport acknowledgement
    pub delivery: DeliveryReceipt,
}

/// Meal request routes
pub struct MealPlanRoutes;

impl MealPlanRoutes {
    /// Create all meal request routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/meal-plan", post(Self::handle_meal_plan))
            .route("/generate", post(Self::handle_meal_plan))
            .with_state(resources)
    }

    async fn handle_meal_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        input: Result<MealPlanInput, AppError>,
    ) -> Result<Response, AppError> {
        let request_id = header_request_id(&headers);
        let attach = |error: AppError| match &request_id {
            Some(id) => error.with_request_id(id.clone()),
            None => error,
        };

        let MealPlanInput(payload) = input.map_err(attach)?;
        let request = payload.into_meal_request().map_err(attach)?;

        let report = resources
            .meal_plans
            .handle(request)
            .await
            .map_err(|failure| attach(AppError::from(failure)))?;

        let message = match report.receipt.mode {
            DeliveryMode::Smtp => user_messages::MEAL_PLAN_SENT,
            DeliveryMode::DryRun => user_messages::MEAL_PLAN_DRY_RUN,
        };
        info!(
            request_id = request_id.as_deref().unwrap_or_default(),
            delivery = report.receipt.mode.as_str(),
            "Meal plan delivered"
        );

        Ok((
            StatusCode::OK,
            Json(MealPlanResponse {
                success: true,
                message: message.to_owned(),
                recipe: report.recipe,
                delivery: report.receipt,
            }),
        )
            .into_response())
    }
}
