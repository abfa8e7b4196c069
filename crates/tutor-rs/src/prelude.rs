//! Convenience re-exports for common `tutor-rs` types.
//!
//! ```ignore
//! use tutor_rs::prelude::*;
//! ```
//!
//! Pulls in what a front end needs to answer requests: [`Tutor`] and its
//! request/reply types, [`Mode`], history turns, and gateway configuration.
//! Prompt internals and fallback pools stay in their modules.

pub use crate::api::{Gateway, OpenAiGateway, RetryConfig, RetryingGateway};
pub use crate::config::GatewayConfig;
pub use crate::conversation::{ChatRole, ChatTurn};
pub use crate::error::{ConfigError, GatewayError};
pub use crate::fallback::FallbackResponder;
pub use crate::mode::Mode;
pub use crate::tutor::{ReplySource, Tutor, TutorReply, TutorRequest};
