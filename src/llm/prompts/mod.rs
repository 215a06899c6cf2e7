// ABOUTME: System prompts for LLM interactions loaded at compile time
// ABOUTME: Provides the recipe generator persona and the Emil-ia cooking coach persona
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # System Prompts
//!
//! Prompts live in markdown files next to this module and are embedded at
//! compile time.

/// Persona and output rules for recipe generation
pub const RECIPE_SYSTEM_PROMPT: &str = include_str!("recipe_system.md");

/// Persona for the Emil-ia cooking coach (`/ai/instructions`, `/ai/chat`)
pub const COACH_SYSTEM_PROMPT: &str = include_str!("coach_system.md");

/// Get the system prompt for recipe generation
#[must_use]
pub const fn get_recipe_system_prompt() -> &'static str {
    RECIPE_SYSTEM_PROMPT
}

/// Get the system prompt for the cooking coach
#[must_use]
pub const fn get_coach_system_prompt() -> &'static str {
    COACH_SYSTEM_PROMPT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_are_embedded() {
        assert!(get_recipe_system_prompt().contains("MealPrepAI"));
        assert!(get_coach_system_prompt().contains("Emil-ia"));
    }
}
