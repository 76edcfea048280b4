use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::DatabaseError;

/// Runs `operation` until it succeeds, doubling the delay after each failure.
/// Gives up with [`DatabaseError::RetryExhausted`] after `max_retries` retries.
pub async fn retry_with_backoff<F, Fut, T, E>(
    what: &str,
    mut operation: F,
    max_retries: usize,
    initial_delay: Duration,
) -> Result<T, DatabaseError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delay = initial_delay;
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_retries => {
                attempt += 1;
                tracing::warn!(
                    "{} failed on attempt {}: {}. Retrying in {:?}...",
                    what,
                    attempt,
                    e,
                    delay
                );
                sleep(delay).await;
                delay *= 2;
            }
            Err(e) => {
                return Err(DatabaseError::RetryExhausted(format!(
                    "{what} failed after {} attempts: {e}",
                    attempt + 1
                )))
            }
        }
    }
}
