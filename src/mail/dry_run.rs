// ABOUTME: Mailer that logs messages instead of sending them
// ABOUTME: Used when SMTP credentials are absent or a dry run is requested
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use mealprep_core::EmailMessage;
use tracing::info;

use super::{is_valid_email, DeliveryError, DeliveryMode, DeliveryReceipt, Mailer};

/// Acknowledges every well-addressed message without contacting a relay
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunMailer;

impl DryRunMailer {
    /// Create a dry-run mailer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for DryRunMailer {
    fn mode(&self) -> DeliveryMode {
        DeliveryMode::DryRun
    }

    async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
        if !is_valid_email(&message.to) {
            return Err(DeliveryError::InvalidRecipient(message.to.clone()));
        }

        info!(
            mail.mode = "dry_run",
            mail.to = %message.to,
            mail.subject = %message.subject,
            mail.body_bytes = message.body.len(),
            "Email not sent (dry run)"
        );
        Ok(DeliveryReceipt::now(DeliveryMode::DryRun, None))
    }
}
