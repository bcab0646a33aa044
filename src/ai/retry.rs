//! Retry Wrapper
//!
//! Bounded exponential-backoff retry around provider calls. Only errors
//! classified as transient (network, timeout, rate limit, 5xx) are retried;
//! validation failures of an already-returned response are deterministic and
//! retrying them would waste a call.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tracing::warn;

use crate::constants::retry as retry_constants;
use crate::types::{Result, SiteError};

/// Retry policy: attempt count and backoff base.
///
/// The delay before attempt k (k >= 2) is `base_delay * 2^(k-2)`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first call
    pub max_attempts: usize,
    /// Delay before the first retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry_constants::DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(retry_constants::BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_factor(retry_constants::BACKOFF_FACTOR)
            .with_max_times(self.max_attempts.saturating_sub(1))
    }
}

/// Run `op` with bounded exponential-backoff retry for transient failures.
/// Re-surfaces the last error once attempts are exhausted.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    op.retry(policy.backoff())
        .when(SiteError::is_transient)
        .notify(|err: &SiteError, delay: Duration| {
            warn!(
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Transient provider error, retrying"
            );
        })
        .await
}

// =============================================================================
// Tests
// =============================================================================
