use moodscope_core::{CoreError, ScrapeApiError};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Base delay for exponential backoff (in milliseconds)
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds)
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    /// Retry config tuned for the hosted scraping actor, whose runs are
    /// slow and whose rate limits are coarse.
    pub fn apify() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 2000,
            max_delay_ms: 60000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }
}

/// Retry strategy based on error type
#[derive(Debug, Clone, PartialEq)]
pub enum RetryStrategy {
    /// Retry with exponential backoff
    Retry,
    /// Retry after a server-specified delay
    RetryWithDelay(Duration),
    /// Don't retry (for permanent failures)
    NoRetry,
}

pub fn get_retry_strategy(error: &CoreError) -> RetryStrategy {
    match error {
        CoreError::ScrapeApi(scrape_error) => match scrape_error {
            ScrapeApiError::RateLimitExceeded { retry_after } => {
                RetryStrategy::RetryWithDelay(Duration::from_secs(*retry_after))
            }
            ScrapeApiError::ServerError { .. } => RetryStrategy::Retry,
            ScrapeApiError::RequestTimeout => RetryStrategy::Retry,
            ScrapeApiError::InvalidResponse { .. } => RetryStrategy::Retry,
            // Auth failures and missing actors are permanent
            ScrapeApiError::InvalidToken => RetryStrategy::NoRetry,
            ScrapeApiError::ActorNotFound { .. } => RetryStrategy::NoRetry,
            // A finished run stays finished; retrying re-runs the whole actor
            ScrapeApiError::RunFailed { .. } => RetryStrategy::NoRetry,
            ScrapeApiError::RunTimedOut { .. } => RetryStrategy::NoRetry,
        },
        CoreError::Network(reqwest_error) => {
            if reqwest_error.is_timeout() || reqwest_error.is_connect() {
                RetryStrategy::Retry
            } else {
                RetryStrategy::NoRetry
            }
        }
        _ => RetryStrategy::NoRetry,
    }
}

/// Calculate delay with exponential backoff and jitter
pub fn calculate_delay(attempt: u32, config: &RetryConfig) -> Duration {
    let exponential_delay = if attempt == 0 {
        Duration::from_millis(config.base_delay_ms)
    } else {
        let multiplier = config.backoff_multiplier.powi(attempt as i32);
        let delay_ms = (config.base_delay_ms as f64 * multiplier) as u64;
        Duration::from_millis(delay_ms.min(config.max_delay_ms))
    };

    // Jitter prevents synchronized retries against the same endpoint
    let jitter_range = (exponential_delay.as_millis() as f64 * config.jitter_factor) as u64;
    let jitter = fastrand::u64(0..=jitter_range);
    let final_delay = exponential_delay + Duration::from_millis(jitter);

    final_delay.min(Duration::from_millis(config.max_delay_ms))
}

/// Run an operation, retrying transient failures per [`get_retry_strategy`].
/// The last error is returned unchanged when attempts are exhausted.
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    config: &RetryConfig,
    operation: F,
) -> Result<T, CoreError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, CoreError>>,
{
    let mut attempt = 0;
    loop {
        if attempt > 0 {
            debug!("Retry attempt {} for {}", attempt, operation_name);
        }

        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    info!(
                        "Operation {} succeeded after {} retries",
                        operation_name, attempt
                    );
                }
                return Ok(result);
            }
            Err(error) => {
                let last_attempt = attempt + 1 >= config.max_attempts;
                let delay = match get_retry_strategy(&error) {
                    RetryStrategy::Retry if !last_attempt => calculate_delay(attempt, config),
                    RetryStrategy::RetryWithDelay(delay) if !last_attempt => delay,
                    _ => {
                        warn!(
                            "Not retrying {} after attempt {}: {}",
                            operation_name,
                            attempt + 1,
                            error
                        );
                        return Err(error);
                    }
                };

                info!("Retrying {} in {:?} due to: {}", operation_name, delay, error);
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
