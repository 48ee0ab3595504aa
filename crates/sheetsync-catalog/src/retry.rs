//! Retry with linear back-off for a single fetch strategy.
//!
//! Failed attempt `n` waits `base_delay * n` before attempt `n + 1`. No wait
//! follows the final attempt: the caller moves on to the next strategy
//! immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Result of running one strategy to completion.
#[derive(Debug)]
pub(crate) struct RetryOutcome<T> {
    pub result: Result<T, FetchError>,
    pub attempts: u32,
    /// Every back-off sleep taken, in order.
    pub delays: Vec<Duration>,
}

/// Runs `operation` up to `max_attempts` times.
///
/// `operation` receives the 1-based attempt number. Non-retriable errors
/// (see [`FetchError::is_retriable`]) end the loop without sleeping.
///
/// | Attempt fails | Sleep before next attempt |
/// |---------------|---------------------------|
/// | 1             | `base_delay × 1`          |
/// | 2             | `base_delay × 2`          |
/// | last          | none                      |
pub(crate) async fn retry_with_linear_backoff<T, F, Fut>(
    max_attempts: u32,
    base_delay: Duration,
    strategy: &str,
    mut operation: F,
) -> RetryOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut delays = Vec::new();
    let mut attempt = 1u32;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                return RetryOutcome {
                    result: Ok(value),
                    attempts: attempt,
                    delays,
                }
            }
            Err(err) => {
                if !err.is_retriable() || attempt >= max_attempts {
                    tracing::debug!(strategy, attempt, error = %err, "strategy exhausted");
                    return RetryOutcome {
                        result: Err(err),
                        attempts: attempt,
                        delays,
                    };
                }

                let delay = base_delay.saturating_mul(attempt);
                #[allow(clippy::cast_possible_truncation)]
                let delay_ms = delay.as_millis() as u64;
                tracing::warn!(
                    strategy,
                    attempt,
                    max_attempts,
                    delay_ms,
                    error = %err,
                    "fetch attempt failed, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
                delays.push(delay);
                attempt += 1;
            }
        }
    }
}
