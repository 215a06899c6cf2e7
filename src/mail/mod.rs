// ABOUTME: Mail dispatch abstraction with SMTP and dry-run implementations
// ABOUTME: Defines the Mailer trait, delivery receipts, and transport-level delivery errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Mail Dispatch
//!
//! The [`Mailer`] trait hands one [`EmailMessage`] to a transport and reports
//! acceptance with a [`DeliveryReceipt`]. Two implementations exist:
//!
//! - [`SmtpMailer`]: `lettre` async SMTP over tokio with rustls
//! - [`DryRunMailer`]: logs the message and acknowledges it without sending,
//!   used when no SMTP credentials are configured
//!
//! Acceptance by the transport is the end of our responsibility; bounces are
//! not tracked.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mealprep_core::EmailMessage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MailConfig;
use crate::errors::AppResult;

/// Message composition (recipe and grocery list emails)
pub mod composer;
mod dry_run;
mod smtp;

pub use composer::{compose_grocery_list_email, compose_recipe_email};
pub use dry_run::DryRunMailer;
pub use smtp::SmtpMailer;

/// How a message was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Accepted by an SMTP relay
    Smtp,
    /// Logged only, nothing was sent
    DryRun,
}

impl DeliveryMode {
    /// Wire name (`smtp` or `dry_run`)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Smtp => "smtp",
            Self::DryRun => "dry_run",
        }
    }
}

/// Acknowledgement that the transport accepted a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Transport that handled the message
    pub mode: DeliveryMode,
    /// When the transport accepted it
    pub accepted_at: DateTime<Utc>,
    /// Relay response text, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DeliveryReceipt {
    /// Receipt stamped with the current time
    #[must_use]
    pub fn now(mode: DeliveryMode, message: Option<String>) -> Self {
        Self {
            mode,
            accepted_at: Utc::now(),
            message,
        }
    }
}

/// Transport failures while handing off a message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Recipient address does not parse
    #[error("invalid recipient address: {0}")]
    InvalidRecipient(String),
    /// Relay rejected our credentials
    #[error("SMTP authentication failed: {0}")]
    Authentication(String),
    /// Relay refused the message permanently
    #[error("message rejected by relay with code {code}")]
    Rejected {
        /// SMTP reply code
        code: u16,
    },
    /// Connection, TLS, or transient relay failure
    #[error("mail transport error: {0}")]
    Transport(String),
    /// Transport did not answer within the bound
    #[error("mail transport timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    /// Message could not be assembled
    #[error("failed to build message: {0}")]
    Build(String),
}

impl DeliveryError {
    /// Whether sending the same message again could succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

/// Hands composed messages to a transport
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Transport this mailer uses
    fn mode(&self) -> DeliveryMode;

    /// Send one message
    async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Build the mailer the configuration asks for
///
/// Falls back to [`DryRunMailer`] when SMTP credentials are missing or a dry
/// run was forced.
///
/// # Errors
///
/// Returns a configuration error when the SMTP transport cannot be built.
pub fn mailer_from_config(config: &MailConfig) -> AppResult<Arc<dyn Mailer>> {
    if config.is_dry_run() {
        return Ok(Arc::new(DryRunMailer::new()));
    }
    Ok(Arc::new(SmtpMailer::new(config)?))
}

/// Basic recipient check: `local@domain.tld`, no whitespace
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() <= 5 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some(at_pos) = email.find('@') else {
        return false;
    };
    if at_pos == 0 || at_pos == email.len() - 1 {
        return false;
    }
    let domain_part = &email[at_pos + 1..];
    domain_part.contains('.')
        && !domain_part.contains('@')
        && !domain_part.starts_with('.')
        && !domain_part.ends_with('.')
}
