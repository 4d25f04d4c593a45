use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::error::Error;

const DEFAULT_NUM_RETRIES: usize = 0;
const DEFAULT_MAX_DELAY_SECS: u64 = 2;
const MIN_DELAY_MS: u64 = 100;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub num_retries: usize,
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            num_retries: DEFAULT_NUM_RETRIES,
            max_delay_secs: DEFAULT_MAX_DELAY_SECS,
        }
    }
}

impl RetryConfig {
    pub fn with_retries(num_retries: usize) -> Self {
        Self {
            num_retries,
            ..Self::default()
        }
    }
}

/// Runs `op`, retrying transport failures with exponential backoff.
/// Server rejections, malformed responses and cancellations are returned as is.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, op: F) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let backoff = ExponentialBuilder::default()
        .with_jitter()
        .with_min_delay(Duration::from_millis(MIN_DELAY_MS))
        .with_max_delay(Duration::from_secs(config.max_delay_secs))
        .with_max_times(config.num_retries);

    op.retry(backoff)
        .notify(|err: &Error, dur: Duration| {
            tracing::warn!(
                error = %err,
                retry_delay_ms = dur.as_millis() as u64,
                "retrying_request"
            );
        })
        .when(Error::is_retryable)
        .await
}
