//! Error types for the tutor core.

use std::time::Duration;
use thiserror::Error;

/// Why a completion call produced no reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No usable credential is configured.
    #[error("gateway not configured: {0}")]
    Configuration(String),
    /// The call did not finish within the bound.
    #[error("completion request timed out after {0:?}")]
    Timeout(Duration),
    /// The remote service answered with a non-success status.
    #[error("completion API HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    /// Success status, but the body lacks the reply field.
    #[error("unexpected response format: {0}")]
    Format(String),
    /// The request failed before any status was received.
    #[error("request failed: {0}")]
    Transport(String),
}

impl GatewayError {
    /// Whether retrying the same request could succeed.
    ///
    /// Timeouts, connection failures, 429 and 5xx are transient. Missing
    /// credentials, other 4xx and malformed bodies are not.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Timeout(_) | GatewayError::Transport(_) => true,
            GatewayError::Upstream { status, .. } => *status == 429 || *status >= 500,
            GatewayError::Configuration(_) | GatewayError::Format(_) => false,
        }
    }
}

/// Invalid startup configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
