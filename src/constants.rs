// ABOUTME: System-wide constants for the MealPrepAI service
// ABOUTME: Environment variable names, configuration defaults, and fixed user-facing messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Environment variable names, defaults, and the user-facing sentences the
//! HTTP layer is allowed to return.

/// Service identity used in logs and outgoing mail
pub mod service_names {
    /// Service name for structured logging
    pub const MEALPREP_SERVER: &str = "mealprep-server";

    /// Brand used in email subjects and signatures
    pub const BRAND: &str = "MealPrepAI";

    /// Server version from Cargo.toml
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Environment variable names read at startup
pub mod env_vars {
    /// Bind address
    pub const HOST: &str = "HOST";
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Whole-request timeout
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
    /// Maximum accepted request body size
    pub const MAX_BODY_BYTES: &str = "MAX_BODY_BYTES";
    /// Comma-separated CORS origins or `*`
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";

    /// Generation service API key
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// Generation service base URL
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    /// Model identifier
    pub const MODEL: &str = "MEALPREP_MODEL";
    /// Sampling temperature
    pub const TEMPERATURE: &str = "MEALPREP_TEMPERATURE";
    /// Maximum completion tokens
    pub const MAX_TOKENS: &str = "MEALPREP_MAX_TOKENS";
    /// Bound on one generation call
    pub const GENERATION_TIMEOUT_SECS: &str = "GENERATION_TIMEOUT_SECS";

    /// SMTP relay host
    pub const SMTP_HOST: &str = "SMTP_HOST";
    /// SMTP relay port
    pub const SMTP_PORT: &str = "SMTP_PORT";
    /// SMTP username
    pub const SMTP_USER: &str = "SMTP_USER";
    /// SMTP password
    pub const SMTP_PASS: &str = "SMTP_PASS";
    /// Sender address
    pub const SMTP_FROM: &str = "SMTP_FROM";
    /// `tls`, `starttls` or `none`
    pub const SMTP_TLS: &str = "SMTP_TLS";
    /// Bound on one delivery
    pub const MAIL_TIMEOUT_SECS: &str = "MAIL_TIMEOUT_SECS";

    /// Minimum recognized sections before a response counts as a recipe
    pub const PARSER_MIN_SECTIONS: &str = "PARSER_MIN_SECTIONS";

    /// Path of the seed recipe catalog
    pub const RECIPE_CATALOG_PATH: &str = "RECIPE_CATALOG_PATH";
}

/// Default configuration values
pub mod defaults {
    /// Default bind address
    pub const HOST: &str = "127.0.0.1";
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8080;
    /// Default whole-request timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;
    /// Default body size limit (64 KiB)
    pub const MAX_BODY_BYTES: usize = 64 * 1024;

    /// `OpenAI` API base URL
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    /// Default model
    pub const MODEL: &str = "gpt-4.1-mini";
    /// Default temperature
    pub const TEMPERATURE: f32 = 0.7;
    /// Default completion budget
    pub const MAX_TOKENS: u32 = 1200;
    /// Default generation bound
    pub const GENERATION_TIMEOUT_SECS: u64 = 60;

    /// Default SMTP relay
    pub const SMTP_HOST: &str = "smtp.gmail.com";
    /// Implicit TLS port
    pub const SMTP_PORT: u16 = 465;
    /// Sender used when neither `SMTP_FROM` nor `SMTP_USER` is set
    pub const SMTP_FROM: &str = "no-reply@mealprep.ai";
    /// Default delivery bound
    pub const MAIL_TIMEOUT_SECS: u64 = 30;

    /// Default structure threshold for the response parser
    pub const PARSER_MIN_SECTIONS: usize = 2;

    /// Default seed catalog location
    pub const RECIPE_CATALOG_PATH: &str = "data/recipes.json";

    /// Default number of catalog suggestions
    pub const SUGGESTION_LIMIT: usize = 6;
}

/// Sentences returned to end users
pub mod user_messages {
    /// Generation or parse failure
    pub const GENERATION_FAILED: &str = "couldn't generate your recipe, try again";
    /// Mail transport failure after a successful generation
    pub const DELIVERY_FAILED: &str = "recipe generated but email failed to send";
    /// Generic timeout
    pub const TIMED_OUT: &str = "the request timed out, try again";
    /// Generation service did not answer in time
    pub const GENERATION_TIMED_OUT: &str = "the recipe service took too long to respond, try again";
    /// Mail transport did not answer in time
    pub const DELIVERY_TIMED_OUT: &str = "recipe generated but the email service timed out";
    /// Chat or instructions failure
    pub const COACH_UNAVAILABLE: &str = "the cooking coach is unavailable right now, try again";
    /// Grocery list accepted by the transport
    pub const GROCERY_LIST_SENT: &str = "grocery list sent";
    /// Grocery list transport failure
    pub const GROCERY_LIST_FAILED: &str = "grocery list email failed to send";
    /// Recipe delivered to the user
    pub const MEAL_PLAN_SENT: &str = "recipe sent to your inbox";
    /// Recipe handled without sending (no SMTP credentials)
    pub const MEAL_PLAN_DRY_RUN: &str = "recipe generated (email delivery is in dry-run mode)";
}

/// Request validation limits
pub mod limits {
    /// Longest accepted free-text description
    pub const MAX_DESCRIPTION_CHARS: usize = 2_000;
    /// Most list entries accepted per field
    pub const MAX_LIST_ENTRIES: usize = 50;
    /// Longest accepted chat message
    pub const MAX_CHAT_MESSAGE_CHARS: usize = 1_000;
    /// Largest accepted suggestion limit
    pub const MAX_SUGGESTION_LIMIT: usize = 50;
}
