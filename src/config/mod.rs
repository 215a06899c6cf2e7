// ABOUTME: Configuration module for the MealPrepAI server
// ABOUTME: Re-exports the environment-driven server, generation, and mail settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration for the `MealPrepAI` server
//!
//! All settings are read once from the environment at startup into an
//! immutable [`ServerConfig`] that is shared by reference afterwards.

/// Environment and server configuration
pub mod environment;

pub use environment::{GenerationConfig, MailConfig, ServerConfig, TlsMode};
