use crate::config::RetryPolicy;
use std::fmt;
use std::future::Future;

/// Run `attempt_fn` until it succeeds or `policy.max_attempts` attempts have
/// been made, sleeping `policy.delay` between attempts. Every failure is
/// logged as a warning. Returns `None` once the budget is spent.
pub async fn with_retry<T, E, F, Fut>(
    policy: RetryPolicy,
    operation: &str,
    mut attempt_fn: F,
) -> Option<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        match attempt_fn(attempt).await {
            Ok(value) => return Some(value),
            Err(e) if attempt < max_attempts => {
                tracing::warn!(
                    operation,
                    attempt,
                    max_attempts,
                    error = %e,
                    "Attempt failed, trying again in {}s",
                    policy.delay.as_secs()
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => {
                tracing::warn!(operation, attempt, max_attempts, error = %e, "Attempt failed");
            }
        }
    }

    None
}
