// ABOUTME: Grocery list email service for catalog recipes
// ABOUTME: Composes the list, hands it to the configured mailer, and bounds the send
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Duration;

use mealprep_core::GroceryItem;
use tokio::time::timeout;
use tracing::{info, instrument};

use crate::constants::user_messages;
use crate::errors::{AppError, AppResult, ErrorCode, MealPlanError, PipelineStage};
use crate::mail::{compose_grocery_list_email, DeliveryMode, DeliveryReceipt, Mailer};

/// What to send and to whom
#[derive(Debug, Clone, Default)]
pub struct GroceryListRequest {
    /// Recipient address
    pub to: String,
    /// Greeting name
    pub name: Option<String>,
    /// Recipe title
    pub title: Option<String>,
    /// Items still to buy
    pub items: Vec<GroceryItem>,
    /// Estimated total in USD
    pub total_estimated: f64,
}

/// Sends grocery list emails
pub struct GroceryListService {
    mailer: Arc<dyn Mailer>,
    timeout: Duration,
}

impl GroceryListService {
    /// Create the service
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>, timeout: Duration) -> Self {
        Self { mailer, timeout }
    }

    /// Transport in use
    #[must_use]
    pub fn mode(&self) -> DeliveryMode {
        self.mailer.mode()
    }

    /// Compose and send one grocery list
    ///
    /// # Errors
    ///
    /// Returns 400 for a missing or invalid recipient, 502 or 504 when the
    /// transport fails or times out.
    #[instrument(skip_all, fields(items = request.items.len()))]
    pub async fn send(&self, request: &GroceryListRequest) -> AppResult<DeliveryReceipt> {
        if request.to.trim().is_empty() {
            return Err(AppError::missing_field("to"));
        }

        let message = compose_grocery_list_email(
            &request.to,
            request.name.as_deref(),
            request.title.as_deref(),
            &request.items,
            request.total_estimated,
        )?;

        let failure = match timeout(self.timeout, self.mailer.send(&message)).await {
            Ok(Ok(receipt)) => {
                info!(mail.mode = receipt.mode.as_str(), "Grocery list dispatched");
                return Ok(receipt);
            }
            Ok(Err(e)) => MealPlanError::from(e),
            Err(_) => MealPlanError::Timeout {
                stage: PipelineStage::Delivering,
                timeout: self.timeout,
            },
        };

        let mut error = AppError::from(failure);
        if error.code == ErrorCode::DeliveryFailed {
            error.message = user_messages::GROCERY_LIST_FAILED.to_owned();
        }
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::DryRunMailer;

    fn service() -> GroceryListService {
        GroceryListService::new(Arc::new(DryRunMailer::new()), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_send_with_dry_run_mailer() {
        let request = GroceryListRequest {
            to: "user@example.com".into(),
            title: Some("Tuna Bowl".into()),
            ..GroceryListRequest::default()
        };
        let receipt = service().send(&request).await.unwrap();
        assert_eq!(receipt.mode, DeliveryMode::DryRun);
    }

    #[tokio::test]
    async fn test_missing_recipient_is_bad_request() {
        let error = service()
            .send(&GroceryListRequest::default())
            .await
            .unwrap_err();
        assert_eq!(error.http_status(), 400);
    }
}
