//! Request-level control flow: build the prompt, call the gateway, fall back.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::gateway::Gateway;
use crate::conversation::ChatTurn;
use crate::fallback::FallbackResponder;
use crate::mode::Mode;
use crate::prompt::{PromptInput, build_prompt};

/// One validated chat request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorRequest {
    pub message: String,
    pub mode: Mode,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl TutorRequest {
    pub fn new(message: impl Into<String>, mode: Mode) -> Self {
        Self {
            message: message.into(),
            mode,
            ..Default::default()
        }
    }

    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_topic(mut self, topic: Option<String>) -> Self {
        self.topic = topic;
        self
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }
}

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorReply {
    pub text: String,
    pub source: ReplySource,
}

/// Answers tutoring requests. Cheap to share behind an `Arc`; holds no
/// per-request state.
pub struct Tutor {
    gateway: Arc<dyn Gateway>,
    fallback: FallbackResponder,
    max_history_turns: Option<usize>,
}

impl Tutor {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            fallback: FallbackResponder::new(),
            max_history_turns: None,
        }
    }

    /// Keep only the most recent `max` history turns in each prompt.
    pub fn with_max_history_turns(mut self, max: Option<usize>) -> Self {
        self.max_history_turns = max;
        self
    }

    /// Assemble the prompt the gateway would receive for `request`.
    pub fn prompt_for(&self, request: &TutorRequest) -> String {
        let input = PromptInput::new(&request.message, request.mode)
            .with_history(&request.history)
            .with_topic(request.topic.as_deref())
            .with_language(request.language.as_deref())
            .with_max_history_turns(self.max_history_turns);
        build_prompt(&input)
    }

    /// Produce a reply. Gateway failures are logged and replaced by a demo
    /// reply, so this never fails.
    pub async fn reply(&self, request: &TutorRequest) -> TutorReply {
        info!(
            "Chat request - mode: {}, history turns: {}",
            request.mode,
            request.history.len()
        );
        let prompt = self.prompt_for(request);
        debug!("Assembled prompt: {} chars", prompt.len());

        match self.gateway.complete(&prompt).await {
            Ok(text) => TutorReply {
                text,
                source: ReplySource::Model,
            },
            Err(e) => {
                warn!("Using demo fallback: {e}");
                TutorReply {
                    text: self.fallback.respond(request.mode, &request.message),
                    source: ReplySource::Fallback,
                }
            }
        }
    }
}
