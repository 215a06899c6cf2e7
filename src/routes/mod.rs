// ABOUTME: Route module organization for MealPrepAI HTTP endpoints
// ABOUTME: Merges the per-domain routers and wraps them in the request ID, tracing, CORS, timeout, and body limit layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the `MealPrep` server
//!
//! Each domain module holds only route definitions and thin handlers that
//! delegate to the service layer.

/// Seed catalog suggestions and recipe details
pub mod catalog;
/// Cooking coach instructions and chat
pub mod coach;
/// Grocery list email
pub mod email;
/// Health check and readiness routes
pub mod health;
/// Meal request submission
pub mod meal_plan;

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, FromRequest, Request};
use axum::http::{HeaderMap, StatusCode};
use axum::{async_trait, Json, Router};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use catalog::CatalogRoutes;
pub use coach::CoachRoutes;
pub use email::EmailRoutes;
pub use health::HealthRoutes;
pub use meal_plan::MealPlanRoutes;

use crate::errors::AppError;
use crate::middleware::{
    create_request_span, request_id_header, setup_cors, MakeRequestUuid, REQUEST_ID_HEADER,
};
use crate::resources::ServerResources;

/// Build the complete application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    let config = Arc::clone(&resources.config);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(MealPlanRoutes::routes(Arc::clone(&resources)))
        .merge(CatalogRoutes::routes(Arc::clone(&resources)))
        .merge(EmailRoutes::routes(Arc::clone(&resources)))
        .merge(CoachRoutes::routes(resources))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(create_request_span))
                .layer(PropagateRequestIdLayer::new(request_id_header()))
                .layer(setup_cors(&config))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    config.request_timeout,
                )),
        )
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
}

/// Request ID set by the middleware stack, for error correlation
pub(crate) fn header_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// JSON body extractor whose rejections use the API's status envelope
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let request_id = header_request_id(req.headers());
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let error = AppError::invalid_input(rejection.body_text());
                Err(match request_id {
                    Some(id) => error.with_request_id(id),
                    None => error,
                })
            }
        }
    }
}

/// A list field sent either as a JSON array or as comma-separated text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListField {
    /// `["rice", "tuna"]`
    Items(Vec<String>),
    /// `"rice, tuna"`
    Text(String),
}

impl Default for ListField {
    fn default() -> Self {
        Self::Items(Vec::new())
    }
}

impl ListField {
    /// Entries in order, trimmed, blanks dropped
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        let items = match self {
            Self::Items(items) => items,
            Self::Text(text) => text.split(',').map(str::to_owned).collect(),
        };
        items
            .into_iter()
            .map(|item| item.trim().to_owned())
            .filter(|item| !item.is_empty())
            .collect()
    }
}
