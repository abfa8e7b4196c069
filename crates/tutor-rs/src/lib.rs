//! Study-notes tutor core.
//!
//! `tutor-rs` turns a student message plus a learning [`Mode`](mode::Mode)
//! into a prompt grounded in fixed study notes, sends it to an
//! OpenAI-compatible chat-completions endpoint, and falls back to canned
//! demo replies when that call cannot be made or fails. The core type is
//! [`Tutor`](tutor::Tutor): it always produces a reply for a well-formed
//! request.
//!
//! # Getting started
//!
//! ```ignore
//! use std::sync::Arc;
//! use tutor_rs::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), String> {
//!     let config = GatewayConfig::default()
//!         .with_api_key(std::env::var("OPENAI_API_KEY").ok());
//!     let gateway = config.build_gateway().map_err(|e| e.to_string())?;
//!     let tutor = Tutor::new(Arc::new(gateway));
//!
//!     let reply = tutor
//!         .reply(&TutorRequest::new("new quiz", Mode::Quiz))
//!         .await;
//!     println!("{}", reply.text);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`knowledge`] | Built-in study notes |
//! | [`mode`] | Mode catalog and per-mode instructions |
//! | [`conversation`] | Caller-supplied history turns |
//! | [`prompt`] | Prompt assembly in a fixed section order |
//! | [`api`] | [`Gateway`](api::Gateway) seam, HTTP gateway, retry decorator |
//! | [`fallback`] | Demo replies and the stateless quiz script |
//! | [`tutor`] | Build, call, fall back |
//! | [`config`] | [`GatewayConfig`](config::GatewayConfig) defaults |

pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod fallback;
pub mod knowledge;
pub mod mode;
pub mod prelude;
pub mod prompt;
pub mod tutor;

use serde::{Deserialize, Serialize};

// ── Constants ──────────────────────────────────────────────────────

/// Default chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model for completion calls.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

// ── Request types ──────────────────────────────────────────────────

/// Chat completion request body.
#[derive(Serialize, Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

// ── Message types ──────────────────────────────────────────────────

/// Role of a message sent to the completion API.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
        }
    }
}

/// A message sent to the completion API.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}
