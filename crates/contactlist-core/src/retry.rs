//! Exponential-backoff retry for fallible async operations.

use std::future::Future;
use std::time::Duration;

/// Run `operation` up to `max_attempts` times, sleeping
/// `base_delay * 2^(attempt - 1)` between attempts.
///
/// Attempts are strictly sequential. The first success is returned
/// immediately; if every attempt fails, the final attempt's error is
/// returned untouched so callers can inspect the underlying cause.
///
/// Every error is retried — there is no predicate and no delay cap or
/// jitter. Callers that need selective retry wrap `operation` in a check
/// of their own; callers that need an overall deadline wrap the whole
/// call in a timeout.
pub async fn run_with_retry<T, E, F, Fut>(
    mut operation: F,
    max_attempts: u32,
    base_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    debug_assert!(max_attempts >= 1);
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= max_attempts => return Err(err),
            Err(err) => {
                let delay = base_delay * 2u32.pow(attempt - 1);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
