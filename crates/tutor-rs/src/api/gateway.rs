//! Outbound boundary to the chat-completions service.
//!
//! [`Gateway`] is the seam the [`Tutor`](crate::tutor::Tutor) talks to.
//! [`OpenAiGateway`] is the HTTP implementation: one request per call, a hard
//! timeout around the whole exchange, and a typed [`GatewayError`] instead of
//! retries. Wrap it in [`RetryingGateway`](super::retry::RetryingGateway) if
//! retries are wanted.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::config::GatewayConfig;
use crate::error::{ConfigError, GatewayError};
use crate::{ChatRequest, Message};

/// Boxed future returned by [`Gateway::complete`].
pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>>;

/// Something that turns an assembled prompt into a reply.
///
/// Uses a boxed future so the trait stays dyn-compatible and can be shared
/// as `Arc<dyn Gateway>`.
pub trait Gateway: Send + Sync {
    fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a>;
}

impl<G: Gateway + ?Sized> Gateway for Arc<G> {
    fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a> {
        (**self).complete(prompt)
    }
}

// ── Response types ─────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: Option<RawResponseMessage>,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
}

/// Pull `choices[0].message.content` out of a response body.
fn extract_reply(text: &str) -> Result<String, GatewayError> {
    let parsed: RawChatResponse = serde_json::from_str(text)
        .map_err(|e| GatewayError::Format(format!("failed to parse response: {e}")))?;

    parsed
        .choices
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or_else(|| GatewayError::Format("response has no choices[0].message.content".into()))
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP gateway for OpenAI-compatible chat-completions endpoints.
pub struct OpenAiGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl OpenAiGateway {
    /// Build a gateway. The HTTP client is reused across calls.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tutor-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Whether a usable credential is configured.
    pub fn is_configured(&self) -> bool {
        self.config.usable_api_key().is_some()
    }

    fn request_body(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message::system(&self.config.system_message),
                Message::user(prompt),
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    /// Send one completion request, bounded by the configured timeout.
    pub async fn complete_prompt(&self, prompt: &str) -> Result<String, GatewayError> {
        let api_key = self
            .config
            .usable_api_key()
            .ok_or_else(|| GatewayError::Configuration("no API key configured".into()))?;

        // Dropping the timeout future drops its timer, on success, failure
        // and expiry alike.
        match tokio::time::timeout(self.config.timeout, self.send(api_key, prompt)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Completion request timed out after {:?}", self.config.timeout);
                Err(GatewayError::Timeout(self.config.timeout))
            }
        }
    }

    async fn send(&self, api_key: &str, prompt: &str) -> Result<String, GatewayError> {
        let body = self.request_body(prompt);
        debug!(
            "LLM request: model={}, prompt_chars={}, max_tokens={}, temp={}",
            body.model,
            prompt.len(),
            body.max_tokens,
            body.temperature,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(&body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| GatewayError::Transport(format!("failed to read response: {e}")))?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        extract_reply(&text)
    }
}

impl Gateway for OpenAiGateway {
    fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a> {
        Box::pin(self.complete_prompt(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_choice_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hello"}},{"message":{"content":"ignored"}}]}"#;
        assert_eq!(extract_reply(body).unwrap(), "Hello");
    }

    #[test]
    fn empty_choices_is_format_error() {
        assert!(matches!(
            extract_reply(r#"{"choices":[]}"#),
            Err(GatewayError::Format(_))
        ));
        assert!(matches!(
            extract_reply(r#"{"id":"x"}"#),
            Err(GatewayError::Format(_))
        ));
        assert!(matches!(
            extract_reply(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(GatewayError::Format(_))
        ));
    }

    #[test]
    fn non_json_is_format_error() {
        assert!(matches!(extract_reply("<html>"), Err(GatewayError::Format(_))));
    }

    #[test]
    fn request_body_has_system_then_user() {
        let gateway = OpenAiGateway::new(GatewayConfig::default()).unwrap();
        let body = serde_json::to_value(gateway.request_body("PROMPT")).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are a helpful AI tutor.");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "PROMPT");
    }

    #[tokio::test]
    async fn missing_key_is_configuration_error() {
        let gateway = OpenAiGateway::new(GatewayConfig::default()).unwrap();
        assert!(!gateway.is_configured());
        let err = gateway.complete("hi").await.unwrap_err();
        assert!(matches!(err, GatewayError::Configuration(_)));
    }
}
