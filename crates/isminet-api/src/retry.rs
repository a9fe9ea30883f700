// Bounded retry with exponential backoff for transient transport failures.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::Error;

/// How many times to retry, and how long to wait between attempts.
///
/// The delay before retry `n` (zero-based) is `base_delay * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(retry))
    }

    /// Run `op` until it succeeds, fails permanently, or the retry budget
    /// is spent.
    ///
    /// Only errors for which [`Error::is_transient`] holds are retried.
    /// Exhaustion wraps the last error in [`Error::RetriesExhausted`].
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let mut retry = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() => {
                    if retry >= self.max_retries {
                        return Err(Error::RetriesExhausted {
                            attempts: retry + 1,
                            source: Box::new(err),
                        });
                    }
                    let delay = self.delay_for(retry);
                    warn!(
                        attempt = retry + 1,
                        max_retries = self.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
