// ABOUTME: OpenAI-compatible chat completions client used for recipe generation
// ABOUTME: Maps transport, HTTP status, and payload problems onto distinct GenerationError variants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! Speaks `POST {base_url}/chat/completions`. Works against the hosted `OpenAI`
//! API as well as local servers exposing the same surface (Ollama, vLLM).
//!
//! One call per `complete`; there is no retry loop here.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, GenerationError, LlmProvider, TokenUsage};
use crate::config::GenerationConfig;
use crate::errors::AppError;

/// Connection establishment bound, independent of the overall timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Longest slice of an error body carried into logs
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for OpenAiMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <https://api.openai.com/v1>)
    pub base_url: String,
    /// Bearer token, optional for local servers
    pub api_key: Option<String>,
    /// Model used when the request does not name one
    pub default_model: String,
    /// Bound on one whole request, connect through last body byte
    pub request_timeout: Duration,
}

impl OpenAiCompatibleConfig {
    /// Build from the server's generation settings
    #[must_use]
    pub fn from_generation(config: &GenerationConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            default_model: config.model.clone(),
            request_timeout: config.timeout,
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(config.request_timeout))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Add authorization header if API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key.as_deref() {
            Some(api_key) if !api_key.is_empty() => request.bearer_auth(api_key),
            _ => request,
        }
    }

    /// Classify a reqwest failure
    fn map_transport_error(&self, error: &reqwest::Error) -> GenerationError {
        if error.is_timeout() {
            GenerationError::Timeout(self.config.request_timeout)
        } else if error.is_connect() {
            GenerationError::Network(format!(
                "cannot connect to {}: {error}",
                self.config.base_url
            ))
        } else {
            GenerationError::Network(error.to_string())
        }
    }

    /// Parse a non-success response into the matching error
    fn parse_error_response(status: StatusCode, body: &str) -> GenerationError {
        let detail = serde_json::from_str::<OpenAiErrorResponse>(body).map_or_else(
            |_| body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect::<String>(),
            |parsed| {
                let error_type = parsed.error.error_type.unwrap_or_else(|| "unknown".to_owned());
                format!("{error_type} - {}", parsed.error.message)
            },
        );

        match status.as_u16() {
            401 | 403 => GenerationError::Authentication(detail),
            429 => GenerationError::RateLimited {
                retry_after_secs: extract_retry_after_secs(&detail),
            },
            code => GenerationError::Upstream {
                status: code,
                message: detail,
            },
        }
    }

    /// Turn a success body into a response, rejecting unusable payloads
    fn parse_success_body(body: &str, requested_model: &str) -> Result<ChatResponse, GenerationError> {
        let parsed: OpenAiResponse = serde_json::from_str(body).map_err(|e| {
            error!(
                "Failed to parse completion body: {} - body: {}",
                e,
                body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect::<String>()
            );
            GenerationError::MalformedResponse(e.to_string())
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::MalformedResponse("no choices in response".to_owned()))?;

        let content = choice
            .message
            .content
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(ChatResponse {
            content,
            model: parsed.model.unwrap_or_else(|| requested_model.to_owned()),
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}

/// Pull the wait from messages like "Please try again in 20s" or "try again in 1.5 seconds"
fn extract_retry_after_secs(message: &str) -> Option<u64> {
    let lower = message.to_lowercase();
    let start = lower.find("try again in ")? + "try again in ".len();
    let after_prefix = &lower[start..];
    let end = after_prefix
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(after_prefix.len());
    let seconds = after_prefix[..end].parse::<f64>().ok()?;
    if after_prefix[end..].starts_with("ms") {
        return Some(1);
    }
    Some(seconds.ceil().max(1.0) as u64)
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        if self.config.base_url.contains("api.openai.com") {
            "openai"
        } else {
            "openai-compatible"
        }
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, GenerationError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let openai_request = OpenAiRequest {
            model,
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(
            messages = openai_request.messages.len(),
            "Sending chat completion request"
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send completion request: {}", e);
                self.map_transport_error(&e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read completion response: {}", e);
            self.map_transport_error(&e)
        })?;

        if !status.is_success() {
            let error = Self::parse_error_response(status, &body);
            warn!(http.status = status.as_u16(), "Generation service returned an error: {}", error);
            return Err(error);
        }

        let response = Self::parse_success_body(&body, model)?;
        debug!(
            content_len = response.content.len(),
            finish_reason = ?response.finish_reason,
            "Received chat completion"
        );
        Ok(response)
    }
}
