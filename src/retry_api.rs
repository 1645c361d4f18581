//! Public Retry API Facade
//!
//! Higher-order retry functions over the two executors in [`crate::retry`].
//! Nothing in the client retries unless a caller opts in with
//! [`crate::MakehubBuilder::with_retry`] or wraps an operation here.
//!
//! ```rust,no_run
//! use makehub_gateway::retry_api::{retry, retry_with, RetryOptions};
//!
//! # async fn do_work() -> Result<String, makehub_gateway::LlmError> { Ok("ok".into()) }
//! # async fn example() -> Result<(), makehub_gateway::LlmError> {
//! let _ = retry(|| do_work()).await?;
//!
//! let options = RetryOptions::policy_default().with_max_attempts(5);
//! let _ = retry_with(|| do_work(), options).await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use crate::error::LlmError;

pub use crate::retry::{BackoffRetryExecutor, RetryExecutor, RetryPolicy};

/// Retry backend selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetryBackend {
    /// `backoff` crate executor
    #[default]
    Backoff,
    /// [`RetryPolicy`] executor with jitter
    Policy,
}

/// Unified retry options
#[derive(Debug, Clone, Default)]
pub struct RetryOptions {
    pub backend: RetryBackend,
    pub policy: Option<RetryPolicy>,
    pub backoff: Option<BackoffRetryExecutor>,
}

impl RetryOptions {
    pub fn backoff() -> Self {
        Self {
            backend: RetryBackend::Backoff,
            backoff: Some(BackoffRetryExecutor::default()),
            ..Default::default()
        }
    }

    pub fn policy_default() -> Self {
        Self {
            backend: RetryBackend::Policy,
            policy: Some(RetryPolicy::default()),
            ..Default::default()
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.backend = RetryBackend::Policy;
        self.policy = Some(policy);
        self
    }

    pub fn with_backoff(mut self, executor: BackoffRetryExecutor) -> Self {
        self.backend = RetryBackend::Backoff;
        self.backoff = Some(executor);
        self
    }

    /// Caps attempts on whichever backend is selected.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        match self.backend {
            RetryBackend::Policy => {
                let policy = self.policy.take().unwrap_or_default();
                self.policy = Some(policy.with_max_attempts(attempts));
            }
            RetryBackend::Backoff => {
                let executor = self.backoff.take().unwrap_or_default();
                self.backoff = Some(executor.with_max_attempts(attempts));
            }
        }
        self
    }
}

/// Retry with the default backoff executor.
pub async fn retry<F, Fut, T>(operation: F) -> Result<T, LlmError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    retry_with(operation, RetryOptions::backoff()).await
}

/// Retry with explicit options.
pub async fn retry_with<F, Fut, T>(operation: F, options: RetryOptions) -> Result<T, LlmError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    match options.backend {
        RetryBackend::Backoff => {
            options
                .backoff
                .unwrap_or_default()
                .execute(operation)
                .await
        }
        RetryBackend::Policy => {
            RetryExecutor::new(options.policy.unwrap_or_default())
                .execute(operation)
                .await
        }
    }
}

/// Run once when `options` is `None`, otherwise retry.
pub async fn maybe_retry<F, Fut, T>(operation: F, options: Option<RetryOptions>) -> Result<T, LlmError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    match options {
        Some(options) => retry_with(operation, options).await,
        None => operation().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn maybe_retry_without_options_runs_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<(), LlmError> = maybe_retry(
            || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(LlmError::RateLimitError("busy".into()))
                }
            },
            None,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn policy_backend_honours_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let options = RetryOptions::default()
            .with_policy(
                RetryPolicy::new()
                    .with_initial_delay(Duration::from_millis(1))
                    .with_jitter(false),
            )
            .with_max_attempts(4);
        let result: Result<(), LlmError> = retry_with(
            || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(LlmError::TimeoutError("slow".into()))
                }
            },
            options,
        )
        .await;
        assert!(matches!(result, Err(LlmError::TimeoutError(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn max_attempts_follows_selected_backend() {
        let options = RetryOptions::backoff().with_max_attempts(7);
        assert_eq!(options.backoff.unwrap().max_attempts, 7);
        assert!(options.policy.is_none());
    }
}
