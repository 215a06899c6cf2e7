// ABOUTME: Unified error handling with error codes, pipeline failures, and HTTP status mapping
// ABOUTME: Converts stage errors into user-facing status objects without leaking transport detail
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Two layers:
//!
//! - [`MealPlanError`] is the pipeline taxonomy. Every stage of a meal-plan
//!   request fails with one of its variants, each carrying the stage-specific
//!   cause (`GenerationError`, `ParseError`, `DeliveryError`).
//! - [`AppError`] is what the HTTP layer returns. It pairs an [`ErrorCode`]
//!   with a message that is safe to show to the user; the underlying cause is
//!   kept as `source` for logging only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

use crate::constants::user_messages;
use crate::llm::GenerationError;
use crate::mail::DeliveryError;
use crate::recipes::ParseError;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation
    /// Request content is missing or malformed
    InvalidInput,
    /// A required field was not supplied
    MissingRequiredField,

    // Resources
    /// Requested resource does not exist
    ResourceNotFound,

    // External services
    /// Generation service failed or returned unusable content
    GenerationFailed,
    /// Mail transport rejected or failed to deliver the message
    DeliveryFailed,
    /// An outbound call exceeded its configured time bound
    ExternalTimeout,

    // Internal
    /// Configuration problem detected at runtime
    ConfigError,
    /// Anything else
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField => 400,
            Self::ResourceNotFound => 404,
            Self::GenerationFailed | Self::DeliveryFailed => 502,
            Self::ExternalTimeout => 504,
            Self::ConfigError | Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The request is invalid",
            Self::MissingRequiredField => "A required field is missing",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::GenerationFailed => user_messages::GENERATION_FAILED,
            Self::DeliveryFailed => user_messages::DELIVERY_FAILED,
            Self::ExternalTimeout => user_messages::TIMED_OUT,
            Self::ConfigError => "The service is misconfigured",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Pipeline stage of a meal-plan request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Input validation and prompt construction
    Received,
    /// Waiting on the generation service
    Generating,
    /// Extracting the recipe from raw text
    Parsing,
    /// Composing and dispatching the email
    Delivering,
}

impl PipelineStage {
    /// Lowercase stage name for logs and responses
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Generating => "generating",
            Self::Parsing => "parsing",
            Self::Delivering => "delivering",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of one meal-plan pipeline stage
#[derive(Debug, Error)]
pub enum MealPlanError {
    /// Client-correctable problem with the request
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Generation service failed
    #[error("generation failed: {0}")]
    Generation(#[source] GenerationError),
    /// Generation service returned content with no usable recipe
    #[error("generation output unusable: {0}")]
    Parse(#[from] ParseError),
    /// Mail transport failed
    #[error("delivery failed: {0}")]
    Delivery(#[source] DeliveryError),
    /// Outbound call exceeded its bound
    #[error("{stage} stage timed out after {}ms", .timeout.as_millis())]
    Timeout {
        /// Stage that timed out
        stage: PipelineStage,
        /// Configured bound
        timeout: Duration,
    },
}

impl MealPlanError {
    /// Shorthand for an input validation failure
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Error code for this failure
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::Generation(_) | Self::Parse(_) => ErrorCode::GenerationFailed,
            Self::Delivery(_) => ErrorCode::DeliveryFailed,
            Self::Timeout { .. } => ErrorCode::ExternalTimeout,
        }
    }

    /// Message shown to the end user
    ///
    /// Input errors echo the validation message; everything else uses a fixed
    /// sentence so upstream detail never reaches the client.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(message) => message.clone(),
            Self::Generation(_) | Self::Parse(_) => user_messages::GENERATION_FAILED.to_owned(),
            Self::Delivery(_) => user_messages::DELIVERY_FAILED.to_owned(),
            Self::Timeout {
                stage: PipelineStage::Delivering,
                ..
            } => user_messages::DELIVERY_TIMED_OUT.to_owned(),
            Self::Timeout { .. } => user_messages::GENERATION_TIMED_OUT.to_owned(),
        }
    }

    /// Whether trying the same request again could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidInput(_) => false,
            Self::Generation(e) => e.is_retryable(),
            Self::Parse(_) | Self::Timeout { .. } => true,
            Self::Delivery(e) => e.is_retryable(),
        }
    }
}

impl From<GenerationError> for MealPlanError {
    fn from(error: GenerationError) -> Self {
        match error {
            GenerationError::Timeout(timeout) => Self::Timeout {
                stage: PipelineStage::Generating,
                timeout,
            },
            other => Self::Generation(other),
        }
    }
}

impl From<DeliveryError> for MealPlanError {
    fn from(error: DeliveryError) -> Self {
        match error {
            DeliveryError::Timeout(timeout) => Self::Timeout {
                stage: PipelineStage::Delivering,
                timeout,
            },
            other => Self::Delivery(other),
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Request ID for tracing
    pub request_id: Option<String>,
    /// Pipeline stage that failed, when applicable
    pub stage: Option<PipelineStage>,
    /// Whether the client may retry
    pub retryable: Option<bool>,
}

/// Unified error type for the HTTP layer
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Message safe to show to the user
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for logging, never serialized
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a request ID to the error context
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.context.request_id = Some(request_id.into());
        self
    }

    /// Attach the failing pipeline stage
    #[must_use]
    pub fn with_stage(mut self, stage: PipelineStage) -> Self {
        self.context.stage = Some(stage);
        self
    }

    /// Attach the underlying cause (logged, not returned to clients)
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required field missing
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("missing {field}"),
        )
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<MealPlanError> for AppError {
    fn from(error: MealPlanError) -> Self {
        let mut app_error = Self::new(error.error_code(), error.user_message());
        app_error.context.retryable = Some(error.is_retryable());
        app_error.with_source(error)
    }
}

impl From<GenerationError> for AppError {
    fn from(error: GenerationError) -> Self {
        MealPlanError::from(error).into()
    }
}

impl From<DeliveryError> for AppError {
    fn from(error: DeliveryError) -> Self {
        MealPlanError::from(error).into()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Status object returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Whether the operation succeeded end to end
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Error code on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    /// Stage that failed, for meal-plan requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<PipelineStage>,
    /// Retry hint on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
    /// Request ID for support correlation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl From<&AppError> for StatusResponse {
    fn from(error: &AppError) -> Self {
        Self {
            success: false,
            message: error.message.clone(),
            code: Some(error.code),
            stage: error.context.stage,
            retryable: error.context.retryable,
            request_id: error.context.request_id.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let cause = self
            .source
            .as_ref()
            .map_or_else(String::new, ToString::to_string);
        if status.is_server_error() {
            error!(
                error.code = ?self.code,
                error.stage = ?self.context.stage,
                error.cause = %cause,
                http.status = status.as_u16(),
                "Request failed"
            );
        } else {
            warn!(
                error.code = ?self.code,
                error.message = %self.message,
                http.status = status.as_u16(),
                "Request rejected"
            );
        }

        (status, Json(StatusResponse::from(&self))).into_response()
    }
}
