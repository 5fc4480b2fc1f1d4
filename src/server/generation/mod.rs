//! Client for the external generative-AI job service.
//!
//! Summaries and illustrations are produced asynchronously: a job is submitted, then its
//! status is polled until it reaches a terminal state. This module only speaks the wire
//! protocol; retry budgets and cancellation live in the orchestrator.

pub mod client;
pub mod guard;
pub mod model;

use std::fmt;

pub use client::GenerationClient;

/// Connection settings for the generation service.
#[derive(Clone)]
pub struct GenerationConfig {
    /// Base URL, without the `/v1` suffix
    pub api_url: String,
    /// Bearer token; the client is "not configured" without one
    pub api_key: Option<String>,
    pub text_model: String,
    pub image_model: String,
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish()
    }
}
