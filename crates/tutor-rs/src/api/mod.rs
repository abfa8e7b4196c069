//! Completion API layer: the gateway seam and its retry decorator.
//!
//! - [`gateway`]: the [`Gateway`] trait and [`OpenAiGateway`], a single-attempt
//!   HTTP client with a hard timeout and typed failures.
//! - [`retry`]: [`RetryingGateway`], exponential backoff for transient
//!   failures layered around any gateway. Never retries configuration, 4xx
//!   (other than 429) or malformed-response errors.

pub mod gateway;
pub mod retry;

pub use gateway::{CompletionFuture, Gateway, OpenAiGateway};
pub use retry::{RetryConfig, RetryingGateway};
