//! Policy-based retries with exponential delay and jitter.

use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::LlmError;

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub use_jitter: bool,
    /// Maximum jitter as a fraction of the delay (0.0 to 1.0)
    pub jitter_factor: f64,
    /// Overrides [`LlmError::is_retryable`] when set
    pub retry_condition: Option<fn(&LlmError) -> bool>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            use_jitter: true,
            jitter_factor: 0.1,
            retry_condition: None,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total attempts for the handshake; values below 1 still make one call.
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Wait before the first retry. Later waits grow by `backoff_multiplier`
    /// up to `max_delay`.
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub const fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Turn jitter off for deterministic waits.
    pub const fn with_jitter(mut self, use_jitter: bool) -> Self {
        self.use_jitter = use_jitter;
        self
    }

    /// Only retry rate-limit errors, the way the host extension's decorator does.
    pub fn rate_limit_only(self) -> Self {
        self.with_retry_condition(|e| matches!(e, LlmError::RateLimitError(_)))
    }

    pub fn with_retry_condition(mut self, condition: fn(&LlmError) -> bool) -> Self {
        self.retry_condition = Some(condition);
        self
    }

    pub fn should_retry(&self, error: &LlmError) -> bool {
        if let Some(condition) = self.retry_condition {
            condition(error)
        } else {
            error.is_retryable()
        }
    }

    /// Delay before retry number `attempt` (0-based), capped at `max_delay`.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        // float-to-int casts saturate, so huge or NaN growth cannot panic here
        let grown = self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        let scheduled = Duration::from_millis(grown as u64).min(self.max_delay);
        if !self.use_jitter {
            return scheduled;
        }

        let millis = scheduled.as_millis() as f64;
        let spread = millis * self.jitter_factor.clamp(0.0, 1.0);
        let offset = rand::thread_rng().gen_range(-spread..=spread);
        Duration::from_millis((millis + offset) as u64)
    }
}

/// Runs an operation under a [`RetryPolicy`].
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub const fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, LlmError>>,
    {
        let attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    if !self.policy.should_retry(&error) || attempt + 1 == attempts {
                        return Err(error);
                    }

                    let delay = self.policy.calculate_delay(attempt);
                    tracing::debug!(attempt, ?delay, %error, "retrying MakeHub request");
                    last_error = Some(error);
                    sleep(delay).await;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            LlmError::InternalError("Retry executor failed without error".to_string())
        }))
    }
}
