//! Environment-driven application configuration.

use std::{str::FromStr, time::Duration};

use crate::server::{
    error::config::ConfigError, generation::GenerationConfig,
    service::orchestrator::poll::PollSettings,
};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
const DEFAULT_POLL_ATTEMPTS: u32 = 12;
/// Matches the session inactivity expiry
const DEFAULT_WORKSPACE_IDLE_TIMEOUT_SECS: u64 = 7 * 24 * 60 * 60;

/// Server configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Database connection string (`DATABASE_URL`)
    pub database_url: String,
    /// Socket address the HTTP server binds to (`BIND_ADDRESS`)
    pub bind_address: String,
    /// Base URL under which stored images are publicly reachable (`PUBLIC_BASE_URL`)
    pub public_base_url: String,
    /// Base URL of the generation service (`GENERATION_API_URL`)
    pub generation_api_url: String,
    /// Bearer token for the generation service; generation is disabled when absent
    pub generation_api_key: Option<String>,
    /// Model used for narrative jobs (`GENERATION_TEXT_MODEL`)
    pub text_model: String,
    /// Model used for illustration jobs (`GENERATION_IMAGE_MODEL`)
    pub image_model: String,
    /// Delay between job status checks (`GENERATION_POLL_INTERVAL_MS`)
    pub poll_interval_ms: u64,
    /// Maximum number of job status checks (`GENERATION_POLL_ATTEMPTS`)
    pub poll_attempts: u32,
    /// Idle time after which a session's workspace is dropped (`WORKSPACE_IDLE_TIMEOUT_SECS`)
    pub workspace_idle_timeout_secs: u64,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and valid
    /// - `Err(ConfigError::MissingEnvVar)` - A required variable is unset
    /// - `Err(ConfigError::InvalidEnvValue)` - A numeric variable failed to parse or is zero
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |var: &str| {
            optional(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
        };

        let poll_attempts = parse_or(
            "GENERATION_POLL_ATTEMPTS",
            optional("GENERATION_POLL_ATTEMPTS"),
            DEFAULT_POLL_ATTEMPTS,
        )?;
        if poll_attempts == 0 {
            return Err(ConfigError::InvalidEnvValue {
                var: "GENERATION_POLL_ATTEMPTS".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let workspace_idle_timeout_secs = parse_or(
            "WORKSPACE_IDLE_TIMEOUT_SECS",
            optional("WORKSPACE_IDLE_TIMEOUT_SECS"),
            DEFAULT_WORKSPACE_IDLE_TIMEOUT_SECS,
        )?;
        if workspace_idle_timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvValue {
                var: "WORKSPACE_IDLE_TIMEOUT_SECS".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_address: optional("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            public_base_url: optional("PUBLIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string()),
            generation_api_url: required("GENERATION_API_URL")?,
            generation_api_key: optional("GENERATION_API_KEY"),
            text_model: optional("GENERATION_TEXT_MODEL")
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: optional("GENERATION_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            poll_interval_ms: parse_or(
                "GENERATION_POLL_INTERVAL_MS",
                optional("GENERATION_POLL_INTERVAL_MS"),
                DEFAULT_POLL_INTERVAL_MS,
            )?,
            poll_attempts,
            workspace_idle_timeout_secs,
        })
    }

    /// Settings for the generation service client.
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            api_url: self.generation_api_url.clone(),
            api_key: self.generation_api_key.clone(),
            text_model: self.text_model.clone(),
            image_model: self.image_model.clone(),
        }
    }

    /// Polling budget for generation jobs.
    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.poll_attempts,
        }
    }

    pub fn workspace_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.workspace_idle_timeout_secs)
    }
}

fn parse_or<T>(var: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|e| ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: e.to_string(),
        }),
    }
}
