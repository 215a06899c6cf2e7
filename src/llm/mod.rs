// ABOUTME: LLM provider abstraction for recipe generation and cooking coach replies
// ABOUTME: Defines chat message types, the provider contract, and the generation error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Service Provider Interface
//!
//! The generation service is a black box: a list of chat messages goes in,
//! raw text comes out. Everything that talks to it implements [`LlmProvider`],
//! so tests can swap the HTTP client for a stub.
//!
//! ## Example: Using a Provider
//!
//! ```rust,no_run
//! use mealprep_server::llm::{ChatMessage, ChatRequest, LlmProvider};
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let request = ChatRequest::new(vec![
//!         ChatMessage::system("You are a meal planning assistant."),
//!         ChatMessage::user("High protein dinner with rice and tuna"),
//!     ])
//!     .with_temperature(0.7);
//!     let response = provider.complete(&request).await;
//! }
//! ```

mod openai_compatible;
pub mod prompts;

pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

impl MessageRole {
    /// Convert to string representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Configuration for a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Model identifier (provider-specific)
    pub model: Option<String>,
    /// Temperature for response randomness (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a new chat request with messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Content of the last user message, if any
    #[must_use]
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }
}

/// Response from a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated message content, never blank
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason (stop, length, etc.)
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

// ============================================================================
// Errors
// ============================================================================

/// Failure talking to the generation service
///
/// Each variant is distinct so callers can decide whether a retry prompt
/// makes sense. Messages may carry upstream detail and are for logs only.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Connection could not be established or was dropped
    #[error("generation service unreachable: {0}")]
    Network(String),
    /// Credentials were rejected (HTTP 401/403)
    #[error("generation service rejected credentials: {0}")]
    Authentication(String),
    /// Request was throttled (HTTP 429)
    #[error("generation service rate limited the request{}", retry_hint(.retry_after_secs.as_ref()))]
    RateLimited {
        /// Seconds the service asked us to wait, when it said so
        retry_after_secs: Option<u64>,
    },
    /// Any other non-success HTTP status
    #[error("generation service returned HTTP {status}: {message}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Error detail from the response body
        message: String,
    },
    /// Response body was not the expected completion shape
    #[error("generation service returned a malformed response: {0}")]
    MalformedResponse(String),
    /// Completion contained no text
    #[error("generation service returned an empty response")]
    EmptyResponse,
    /// No response within the configured bound
    #[error("generation service did not respond within {}ms", .0.as_millis())]
    Timeout(Duration),
}

fn retry_hint(retry_after_secs: Option<&u64>) -> String {
    retry_after_secs.map_or_else(String::new, |secs| format!(", retry in {secs}s"))
}

impl GenerationError {
    /// Whether the same request may succeed if sent again later
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited { .. } | Self::Timeout(_) => true,
            Self::Upstream { status, .. } => *status >= 500,
            Self::Authentication(_) | Self::MalformedResponse(_) | Self::EmptyResponse => false,
        }
    }
}

// ============================================================================
// Provider Trait
// ============================================================================

/// LLM provider trait for chat completion
///
/// Implementations perform exactly one outbound call per `complete` and never
/// retry on their own.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "openai", "ollama")
    fn name(&self) -> &'static str;

    /// Default model to use if not specified in request
    fn default_model(&self) -> &str;

    /// Perform a chat completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, GenerationError>;
}
