//! Optional retry with exponential backoff around any [`Gateway`].
//!
//! Gateways make a single attempt. [`RetryingGateway`] layers retries on top
//! for transient failures only (timeouts, connection errors, 429, 5xx). With
//! the default [`RetryConfig`] it makes exactly one attempt.

use std::time::Duration;

use tracing::{debug, warn};

use super::gateway::{CompletionFuture, Gateway};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries (0 = no retries, just fail immediately).
    pub max_retries: u32,
    /// Initial delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier (typically 2.0 for exponential backoff).
    pub multiplier: f64,
    /// Whether to shorten delays by a jitter factor.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create a config with the given number of retries.
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_retries: retries,
            ..Default::default()
        }
    }

    /// Calculate the delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_secs_f64());

        if self.jitter {
            // Deterministic per-attempt factor; concurrent requests already
            // start at different times.
            let jitter_factor = match attempt % 4 {
                0 => 0.75,
                1 => 0.90,
                2 => 0.60,
                _ => 0.85,
            };
            Duration::from_secs_f64(capped * jitter_factor)
        } else {
            Duration::from_secs_f64(capped)
        }
    }
}

/// Retries transient failures of the wrapped gateway.
pub struct RetryingGateway<G> {
    inner: G,
    config: RetryConfig,
}

impl<G: Gateway> RetryingGateway<G> {
    pub fn new(inner: G, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: Gateway> Gateway for RetryingGateway<G> {
    fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a> {
        Box::pin(async move {
            let mut attempt = 0;
            loop {
                match self.inner.complete(prompt).await {
                    Ok(reply) => return Ok(reply),
                    Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                        let delay = self.config.delay_for_attempt(attempt);
                        attempt += 1;
                        warn!(
                            "Completion attempt {attempt} failed ({e}), retrying in {:.2}s",
                            delay.as_secs_f64()
                        );
                        tokio::time::sleep(delay).await;
                    }
                    Err(e) => {
                        debug!("Completion failed after {} attempt(s): {e}", attempt + 1);
                        return Err(e);
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Plays back a fixed sequence of results, then keeps returning the last.
    struct ScriptedGateway {
        script: Mutex<Vec<Result<String, GatewayError>>>,
        calls: AtomicU32,
    }

    impl ScriptedGateway {
        fn new(mut script: Vec<Result<String, GatewayError>>) -> Self {
            script.reverse();
            Self {
                script: Mutex::new(script),
                calls: AtomicU32::new(0),
            }
        }
    }

    impl Gateway for ScriptedGateway {
        fn complete<'a>(&'a self, _prompt: &'a str) -> CompletionFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = {
                let mut script = self.script.lock().unwrap();
                if script.len() > 1 {
                    script.pop().unwrap()
                } else {
                    script.last().cloned().unwrap()
                }
            };
            Box::pin(async move { result })
        }
    }

    fn fast(retries: u32) -> RetryConfig {
        RetryConfig {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            ..RetryConfig::with_retries(retries)
        }
    }

    fn unavailable() -> GatewayError {
        GatewayError::Upstream {
            status: 503,
            body: "busy".into(),
        }
    }

    #[test]
    fn default_config_no_retries() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn delay_increases_exponentially() {
        let config = RetryConfig {
            jitter: false,
            ..RetryConfig::with_retries(5)
        };
        let d0 = config.delay_for_attempt(0);
        let d1 = config.delay_for_attempt(1);
        let d2 = config.delay_for_attempt(2);

        assert!(d1 > d0, "d1={d1:?} should be > d0={d0:?}");
        assert!(d2 > d1, "d2={d2:?} should be > d1={d1:?}");
    }

    #[test]
    fn delay_capped_at_max() {
        let config = RetryConfig {
            jitter: false,
            max_delay: Duration::from_secs(2),
            ..RetryConfig::with_retries(10)
        };
        assert!(config.delay_for_attempt(10) <= Duration::from_secs(2));
    }

    #[test]
    fn jitter_reduces_delay() {
        let jittered = RetryConfig::with_retries(3);
        let plain = RetryConfig {
            jitter: false,
            ..RetryConfig::with_retries(3)
        };
        assert!(jittered.delay_for_attempt(2) <= plain.delay_for_attempt(2));
    }

    #[tokio::test]
    async fn default_makes_single_attempt() {
        let gateway = RetryingGateway::new(
            ScriptedGateway::new(vec![Err(unavailable()), Ok("late".into())]),
            RetryConfig::default(),
        );
        assert_eq!(gateway.complete("p").await, Err(unavailable()));
        assert_eq!(gateway.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transient_errors_are_retried() {
        let gateway = RetryingGateway::new(
            ScriptedGateway::new(vec![
                Err(GatewayError::Timeout(Duration::from_secs(15))),
                Err(unavailable()),
                Ok("reply".into()),
            ]),
            fast(3),
        );
        assert_eq!(gateway.complete("p").await.unwrap(), "reply");
        assert_eq!(gateway.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_stop_at_limit() {
        let gateway = RetryingGateway::new(ScriptedGateway::new(vec![Err(unavailable())]), fast(2));
        assert_eq!(gateway.complete("p").await, Err(unavailable()));
        assert_eq!(gateway.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let gateway = RetryingGateway::new(
            ScriptedGateway::new(vec![
                Err(GatewayError::Configuration("no key".into())),
                Ok("never".into()),
            ]),
            fast(5),
        );
        assert!(matches!(
            gateway.complete("p").await,
            Err(GatewayError::Configuration(_))
        ));
        assert_eq!(gateway.inner().calls.load(Ordering::SeqCst), 1);
    }
}
