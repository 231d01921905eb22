//! Backoff policy for collector service round-trips.
//!
//! A 429 carries the service's `Retry-After` hint inside
//! [`CollectorError::RateLimited`]; the wait before the next attempt honors
//! that hint whenever it is longer than the exponential schedule. Plain
//! transport failures use the schedule alone. Everything else (404, bad
//! body, bad endpoint config) is terminal and surfaces immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::CollectorError;

fn scheduled_delay_secs(backoff_base_secs: u64, attempt: u32) -> u64 {
    // Shift capped to keep the doubling from overflowing.
    backoff_base_secs.saturating_mul(1u64 << attempt.min(62))
}

/// Seconds to wait before retrying after `err`, or `None` when the error is
/// not transient.
fn backoff_for(err: &CollectorError, backoff_base_secs: u64, attempt: u32) -> Option<u64> {
    let scheduled = scheduled_delay_secs(backoff_base_secs, attempt);
    match err {
        CollectorError::RateLimited {
            retry_after_secs, ..
        } => Some(scheduled.max(*retry_after_secs)),
        CollectorError::Http(_) => Some(scheduled),
        _ => None,
    }
}

/// Runs `operation`, retrying transient failures up to `max_retries`
/// additional attempts.
///
/// The wait between attempts is `backoff_base_secs * 2^attempt`, stretched
/// to the throttled service's `Retry-After` hint when one was sent and it
/// is longer. Terminal errors and the last transient error after the
/// budget is spent are returned to the caller.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, CollectorError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CollectorError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let Some(delay_secs) = backoff_for(&err, backoff_base_secs, attempt) else {
            return Err(err);
        };
        if attempt >= max_retries {
            return Err(err);
        }

        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient collector error, waiting before retry"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio::time::Instant;

    use crate::raw::CollectorOutput;

    fn throttled(hint_secs: u64) -> CollectorError {
        CollectorError::RateLimited {
            domain: "http://collector.internal:8010".to_string(),
            retry_after_secs: hint_secs,
        }
    }

    fn bad_body() -> CollectorError {
        CollectorError::Deserialize {
            context: "web collector response".to_string(),
            source: serde_json::from_str::<CollectorOutput>("[").unwrap_err(),
        }
    }

    #[tokio::test]
    async fn first_success_needs_no_retry() {
        let attempts = Cell::new(0u32);
        let result = retry_with_backoff(5, 1, || {
            attempts.set(attempts.get() + 1);
            async { Ok::<&str, CollectorError>("batch") }
        })
        .await;

        assert_eq!(result.unwrap(), "batch");
        assert_eq!(attempts.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_after_hint_stretches_the_wait() {
        let started = Instant::now();
        let attempts = Cell::new(0u32);
        let result = retry_with_backoff(1, 1, || {
            let n = attempts.get();
            attempts.set(n + 1);
            async move {
                if n == 0 {
                    Err(throttled(30))
                } else {
                    Ok::<u32, CollectorError>(n)
                }
            }
        })
        .await;

        // Schedule alone would wait 1s; the 30s hint wins.
        assert_eq!(result.unwrap(), 1);
        assert!(started.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_hint_falls_back_to_the_exponential_schedule() {
        let started = Instant::now();
        let attempts = Cell::new(0u32);
        let result = retry_with_backoff(2, 2, || {
            let n = attempts.get();
            attempts.set(n + 1);
            async move {
                if n < 2 {
                    Err(throttled(0))
                } else {
                    Ok::<u32, CollectorError>(n)
                }
            }
        })
        .await;

        // 2s after the first failure, 4s after the second.
        assert_eq!(result.unwrap(), 2);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(6));
        assert!(waited < Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn spent_budget_surfaces_the_throttle() {
        let attempts = Cell::new(0u32);
        let result = retry_with_backoff(2, 0, || {
            attempts.set(attempts.get() + 1);
            async { Err::<(), CollectorError>(throttled(0)) }
        })
        .await;

        // Budget of 2 retries means 3 attempts in total.
        assert_eq!(attempts.get(), 3);
        assert!(matches!(result, Err(CollectorError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn malformed_body_is_terminal() {
        let attempts = Cell::new(0u32);
        let result = retry_with_backoff(5, 0, || {
            attempts.set(attempts.get() + 1);
            async { Err::<(), CollectorError>(bad_body()) }
        })
        .await;

        assert_eq!(attempts.get(), 1);
        assert!(matches!(result, Err(CollectorError::Deserialize { .. })));
    }
}
