//! Completion-call configuration with the tutor's defaults.
//!
//! [`GatewayConfig`] is built once at startup and shared read-only by every
//! request. It converts into an [`OpenAiGateway`](crate::api::gateway::OpenAiGateway)
//! via [`build_gateway`](GatewayConfig::build_gateway).

use std::time::Duration;

use crate::api::gateway::OpenAiGateway;
use crate::error::ConfigError;
use crate::{DEFAULT_API_URL, DEFAULT_MODEL};

/// Substring that marks an API key copied verbatim from a sample `.env`.
pub const PLACEHOLDER_KEY_MARKER: &str = "your-api-key";

/// Settings for calls to the completion API.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bearer credential. `None` means every call fails with a configuration
    /// error and the tutor answers from its fallback pool.
    pub api_key: Option<String>,
    /// Full chat-completions endpoint URL.
    pub api_url: String,
    /// Model identifier. Default: `"gpt-4o-mini"`.
    pub model: String,
    /// Sampling temperature. Default: `0.7`.
    pub temperature: f32,
    /// Maximum tokens per reply. Default: `1000`.
    pub max_tokens: u32,
    /// Hard bound on a single call. Default: 15 seconds.
    pub timeout: Duration,
    /// System message sent ahead of the assembled prompt.
    pub system_message: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout: Duration::from_secs(15),
            system_message: "You are a helpful AI tutor.".to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The credential, if present and not a placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.contains(PLACEHOLDER_KEY_MARKER))
    }

    /// Check the values that would otherwise only fail on the first request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        let parsed = reqwest::Url::parse(&self.api_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.api_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: self.api_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(())
    }

    /// Validate and build the HTTP gateway.
    pub fn build_gateway(&self) -> Result<OpenAiGateway, ConfigError> {
        self.validate()?;
        OpenAiGateway::new(self.clone())
    }
}
