// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses HTTP, generation service, mail transport, and parser settings with validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use crate::constants::{defaults, env_vars};
use crate::recipes::ParserConfig;
use anyhow::{bail, Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// TLS from the first byte (port 465)
    #[default]
    Tls,
    /// Plain connection upgraded with STARTTLS (port 587)
    StartTls,
    /// No encryption, local relays and test servers only
    None,
}

impl TlsMode {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "starttls" | "start_tls" => Self::StartTls,
            "none" | "plain" | "off" => Self::None,
            _ => Self::Tls,
        }
    }
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tls => write!(f, "tls"),
            Self::StartTls => write!(f, "starttls"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Generation service settings
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Bearer token for the generation API
    pub api_key: Option<String>,
    /// Base URL of the `OpenAI`-compatible API
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,
    /// Maximum completion tokens
    pub max_tokens: u32,
    /// Bound on one generation call
    pub timeout: Duration,
}

impl GenerationConfig {
    /// Whether the base URL points at this machine
    #[must_use]
    pub fn is_local(&self) -> bool {
        let url = self.base_url.to_lowercase();
        ["://localhost", "://127.0.0.1", "://[::1]", "://0.0.0.0"]
            .iter()
            .any(|host| url.contains(host))
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: defaults::OPENAI_BASE_URL.to_owned(),
            model: defaults::MODEL.to_owned(),
            temperature: defaults::TEMPERATURE,
            max_tokens: defaults::MAX_TOKENS,
            timeout: Duration::from_secs(defaults::GENERATION_TIMEOUT_SECS),
        }
    }
}

/// Mail transport settings
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP relay host
    pub host: String,
    /// SMTP relay port
    pub port: u16,
    /// SMTP username
    pub username: Option<String>,
    /// SMTP password
    pub password: Option<String>,
    /// Sender address
    pub from: String,
    /// Connection security
    pub tls: TlsMode,
    /// Bound on one delivery
    pub timeout: Duration,
    /// Skip SMTP even when credentials are present
    pub force_dry_run: bool,
}

impl MailConfig {
    /// Username and password, when both are set
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    /// Whether delivery is simulated instead of sent
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.force_dry_run || self.credentials().is_none()
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: defaults::SMTP_HOST.to_owned(),
            port: defaults::SMTP_PORT,
            username: None,
            password: None,
            from: defaults::SMTP_FROM.to_owned(),
            tls: TlsMode::Tls,
            timeout: Duration::from_secs(defaults::MAIL_TIMEOUT_SECS),
            force_dry_run: false,
        }
    }
}

/// Complete server configuration, built once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// Whole-request bound enforced by the HTTP layer
    pub request_timeout: Duration,
    /// Largest accepted request body
    pub max_body_bytes: usize,
    /// Allowed CORS origins, `*` for any
    pub cors_origins: Vec<String>,
    /// Generation service
    pub generation: GenerationConfig,
    /// Mail transport
    pub mail: MailConfig,
    /// Response parser tolerance
    pub parser: ParserConfig,
    /// Seed recipe catalog
    pub catalog_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_owned(),
            http_port: defaults::HTTP_PORT,
            request_timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
            max_body_bytes: defaults::MAX_BODY_BYTES,
            cors_origins: vec!["*".to_owned()],
            generation: GenerationConfig::default(),
            mail: MailConfig::default(),
            parser: ParserConfig::default(),
            catalog_path: PathBuf::from(defaults::RECIPE_CATALOG_PATH),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the result fails validation
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed or the result fails validation
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let username = var(env_vars::SMTP_USER);
        let from = var(env_vars::SMTP_FROM)
            .or_else(|| username.clone())
            .unwrap_or_else(|| defaults::SMTP_FROM.to_owned());

        let config = Self {
            host: var(env_vars::HOST).unwrap_or_else(|| defaults::HOST.to_owned()),
            http_port: parse_or(&var, env_vars::HTTP_PORT, defaults::HTTP_PORT)?,
            request_timeout: Duration::from_secs(parse_or(
                &var,
                env_vars::REQUEST_TIMEOUT_SECS,
                defaults::REQUEST_TIMEOUT_SECS,
            )?),
            max_body_bytes: parse_or(&var, env_vars::MAX_BODY_BYTES, defaults::MAX_BODY_BYTES)?,
            cors_origins: parse_origins(
                &var(env_vars::CORS_ALLOWED_ORIGINS).unwrap_or_else(|| "*".to_owned()),
            ),
            generation: GenerationConfig {
                api_key: var(env_vars::OPENAI_API_KEY),
                base_url: var(env_vars::OPENAI_BASE_URL)
                    .unwrap_or_else(|| defaults::OPENAI_BASE_URL.to_owned()),
                model: var(env_vars::MODEL).unwrap_or_else(|| defaults::MODEL.to_owned()),
                temperature: parse_or(&var, env_vars::TEMPERATURE, defaults::TEMPERATURE)?,
                max_tokens: parse_or(&var, env_vars::MAX_TOKENS, defaults::MAX_TOKENS)?,
                timeout: Duration::from_secs(parse_or(
                    &var,
                    env_vars::GENERATION_TIMEOUT_SECS,
                    defaults::GENERATION_TIMEOUT_SECS,
                )?),
            },
            mail: MailConfig {
                host: var(env_vars::SMTP_HOST).unwrap_or_else(|| defaults::SMTP_HOST.to_owned()),
                port: parse_or(&var, env_vars::SMTP_PORT, defaults::SMTP_PORT)?,
                username,
                password: var(env_vars::SMTP_PASS),
                from,
                tls: var(env_vars::SMTP_TLS)
                    .map_or(TlsMode::Tls, |raw| TlsMode::from_str_or_default(&raw)),
                timeout: Duration::from_secs(parse_or(
                    &var,
                    env_vars::MAIL_TIMEOUT_SECS,
                    defaults::MAIL_TIMEOUT_SECS,
                )?),
                force_dry_run: false,
            },
            parser: ParserConfig {
                min_recognized_sections: parse_or(
                    &var,
                    env_vars::PARSER_MIN_SECTIONS,
                    defaults::PARSER_MIN_SECTIONS,
                )?,
            },
            catalog_path: PathBuf::from(
                var(env_vars::RECIPE_CATALOG_PATH)
                    .unwrap_or_else(|| defaults::RECIPE_CATALOG_PATH.to_owned()),
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_zero() {
            bail!("{} must be greater than zero", env_vars::REQUEST_TIMEOUT_SECS);
        }
        if self.max_body_bytes == 0 {
            bail!("{} must be greater than zero", env_vars::MAX_BODY_BYTES);
        }

        let generation = &self.generation;
        if !(0.0..=2.0).contains(&generation.temperature) {
            bail!(
                "{} must be between 0.0 and 2.0, got {}",
                env_vars::TEMPERATURE,
                generation.temperature
            );
        }
        if generation.max_tokens == 0 {
            bail!("{} must be greater than zero", env_vars::MAX_TOKENS);
        }
        if generation.timeout.is_zero() {
            bail!("{} must be greater than zero", env_vars::GENERATION_TIMEOUT_SECS);
        }
        reqwest::Url::parse(&generation.base_url)
            .with_context(|| format!("Invalid {}: {}", env_vars::OPENAI_BASE_URL, generation.base_url))?;
        if generation.api_key.is_none() && !generation.is_local() {
            bail!(
                "{} is required unless {} points at a local server",
                env_vars::OPENAI_API_KEY,
                env_vars::OPENAI_BASE_URL
            );
        }

        let mail = &self.mail;
        if mail.timeout.is_zero() {
            bail!("{} must be greater than zero", env_vars::MAIL_TIMEOUT_SECS);
        }
        if mail.username.is_some() != mail.password.is_some() {
            warn!(
                "Only one of {} and {} is set; mail will be sent in dry-run mode",
                env_vars::SMTP_USER,
                env_vars::SMTP_PASS
            );
        }

        if !(1..=ParserConfig::MAX_SECTIONS).contains(&self.parser.min_recognized_sections) {
            bail!(
                "{} must be between 1 and {}, got {}",
                env_vars::PARSER_MIN_SECTIONS,
                ParserConfig::MAX_SECTIONS,
                self.parser.min_recognized_sections
            );
        }

        Ok(())
    }

    /// Socket address string to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "MealPrepAI Server Configuration:\n\
             - Bind: {}\n\
             - Request Timeout: {}s\n\
             - CORS Origins: {}\n\
             - Generation: {} via {} (api key {}, timeout {}s)\n\
             - Mail: {} ({}:{} {}, from {}, timeout {}s)\n\
             - Parser Min Sections: {}\n\
             - Catalog: {}",
            self.bind_address(),
            self.request_timeout.as_secs(),
            self.cors_origins.join(","),
            self.generation.model,
            self.generation.base_url,
            if self.generation.api_key.is_some() {
                "set"
            } else {
                "not set"
            },
            self.generation.timeout.as_secs(),
            if self.mail.is_dry_run() {
                "dry-run"
            } else {
                "smtp"
            },
            self.mail.host,
            self.mail.port,
            self.mail.tls,
            self.mail.from,
            self.mail.timeout.as_secs(),
            self.parser.min_recognized_sections,
            self.catalog_path.display(),
        )
    }
}

/// Parse a variable or fall back to the default
fn parse_or<T, V>(var: &V, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    V: Fn(&str) -> Option<String>,
{
    var(key).map_or(Ok(default), |raw| {
        raw.parse::<T>()
            .with_context(|| format!("Invalid {key} value: {raw}"))
    })
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
