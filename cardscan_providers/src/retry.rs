use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Backoff schedule: one attempt per base delay, then `final_retries` more
/// attempts spaced by `final_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delays: Vec<Duration>,
    pub final_retries: usize,
    pub final_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_secs(&[2, 4], 1, 10)
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_secs(base_delays: &[u64], final_retries: usize, final_delay: u64) -> Self {
        Self {
            base_delays: base_delays.iter().copied().map(Duration::from_secs).collect(),
            final_retries,
            final_delay: Duration::from_secs(final_delay),
        }
    }

    /// A single attempt with no retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            base_delays: Vec::new(),
            final_retries: 0,
            final_delay: Duration::ZERO,
        }
    }

    /// Total number of attempts, never less than one.
    #[must_use]
    pub fn max_attempts(&self) -> usize {
        (self.base_delays.len() + self.final_retries).max(1)
    }

    /// Delay to wait after the given 1-based failed attempt.
    fn delay_after(&self, attempt: usize) -> Duration {
        self.base_delays
            .get(attempt - 1)
            .copied()
            .unwrap_or(self.final_delay)
    }
}

/// Retry an async operation according to `policy`.
///
/// Returns the first success, or the error of the last attempt.
pub async fn retry_with_backoff<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "Request failed (attempt {attempt}/{max_attempts}): {e}. Retrying after {}ms...",
                    delay.as_millis()
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
