// ABOUTME: Main library entry point for the MealPrepAI recipe delivery server
// ABOUTME: Turns a meal request into an LLM-generated recipe and emails it to the user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # `MealPrep` Server
//!
//! One HTTP request in, one email out. A meal request is validated, turned
//! into a generation prompt, sent to an OpenAI-compatible chat completion
//! service, parsed tolerantly into a structured recipe, and delivered as a
//! plain-text email.
//!
//! ## Architecture
//!
//! - **Config**: environment-driven, read once at startup
//! - **Recipes**: prompt builder, tolerant response parser, seed catalog
//! - **LLM**: provider trait and the OpenAI-compatible HTTP client
//! - **Mail**: email composition plus SMTP and dry-run transports
//! - **Services**: the meal-plan state machine, the cooking coach, grocery lists
//! - **Routes**: thin axum handlers over the services
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use mealprep_server::config::ServerConfig;
//! use mealprep_server::resources::ServerResources;
//! use mealprep_server::routes;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(ServerConfig::from_env()?);
//!     let resources = Arc::new(ServerResources::from_config(Arc::clone(&config))?);
//!     let app = routes::router(resources);
//!
//!     let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Application constants and user-facing messages
pub mod constants;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// LLM provider abstraction and the OpenAI-compatible client
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Email composition and delivery
pub mod mail;

/// HTTP middleware (request IDs, tracing spans, CORS)
pub mod middleware;

/// Prompt construction, response parsing, and the seed catalog
pub mod recipes;

/// Shared server state
pub mod resources;

/// HTTP routes
pub mod routes;

/// Domain services behind the routes
pub mod services;

pub use mealprep_core as core;
