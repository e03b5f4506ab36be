use crate::error::SyncError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Status codes treated as transient for idempotent GET requests.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Retry behavior for HTTP GETs, kept apart from the client so it can be
/// tested without a network.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first one)
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff (e.g., 2.0 doubles the delay each time)
    pub backoff_multiplier: f64,
    /// HTTP statuses worth another attempt
    pub retryable_statuses: Vec<u16>,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            retryable_statuses: RETRYABLE_STATUSES.to_vec(),
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Preset: reference-data GETs (3 attempts)
    /// Delays: 1s, 2s = 3s total wait time
    pub fn http_get() -> Self {
        Self::new(3, Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(8))
            .with_backoff_multiplier(2.0)
    }

    /// Preset: no waiting between attempts, for tests and local mirrors
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO).with_max_delay(Duration::ZERO)
    }

    /// Calculate the delay for a given attempt number (0-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi((attempt - 1) as i32);

        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }

    /// Whether a failed GET is worth another attempt.
    ///
    /// Transport failures without a status (connect errors, timeouts) are
    /// transient; responses are retried only for the configured statuses.
    /// Content and validation failures are never retried.
    pub fn should_retry(&self, error: &SyncError) -> bool {
        match error {
            SyncError::Transport { .. } => error
                .status()
                .map_or(true, |status| self.retryable_statuses.contains(&status)),
            _ => false,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::http_get()
    }
}

/// Execute an async operation with retries, using a predicate to determine if retry is appropriate
///
/// Returns the first success, the first non-retryable error, or the last
/// error once `policy.max_attempts` attempts have been made.
pub async fn with_retry_if<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        // Wait before retry (except for first attempt)
        let delay = policy.delay_for_attempt(attempt);
        if !delay.is_zero() {
            debug!(
                "{}: Retry attempt {}/{} after {:?}",
                operation_name,
                attempt + 1,
                max_attempts,
                delay
            );
            sleep(delay).await;
        }

        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(
                        "{}: Succeeded on attempt {}/{}",
                        operation_name,
                        attempt + 1,
                        max_attempts
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                if !should_retry(&e) {
                    debug!(
                        "{}: Error is not retryable, failing immediately: {}",
                        operation_name, e
                    );
                    return Err(e);
                }

                let remaining = max_attempts - attempt - 1;
                if remaining == 0 {
                    warn!(
                        "{}: All {} attempts failed. Last error: {}",
                        operation_name, max_attempts, e
                    );
                    return Err(e);
                }

                warn!(
                    "{}: Attempt {}/{} failed ({}), {} retries remaining",
                    operation_name,
                    attempt + 1,
                    max_attempts,
                    e,
                    remaining
                );
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    // ==================== Policy Tests ====================

    #[test]
    fn test_http_get_preset() {
        let policy = RetryPolicy::http_get();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay, Duration::from_secs(1));
        assert_eq!(policy.retryable_statuses, vec![429, 500, 502, 503, 504]);
    }

    #[test]
    fn test_zero_attempts_is_raised_to_one() {
        let policy = RetryPolicy::new(0, Duration::from_millis(5));
        assert_eq!(policy.max_attempts, 1);
    }

    #[test]
    fn test_delay_calculation() {
        let policy = RetryPolicy::new(4, Duration::from_secs(1)).with_backoff_multiplier(2.0);

        assert_eq!(policy.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(4));
    }

    #[test]
    fn test_delay_respects_max() {
        let policy = RetryPolicy::new(10, Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(3))
            .with_backoff_multiplier(2.0);

        // Attempt 4 would be 8 seconds, but max is 3
        assert_eq!(policy.delay_for_attempt(4), Duration::from_secs(3));
    }

    #[test]
    fn test_immediate_has_no_delay() {
        let policy = RetryPolicy::immediate(3);
        assert_eq!(policy.delay_for_attempt(1), Duration::ZERO);
        assert_eq!(policy.delay_for_attempt(2), Duration::ZERO);
    }

    // ==================== Classification Tests ====================

    #[test]
    fn test_should_retry_transient_statuses() {
        let policy = RetryPolicy::http_get();
        for status in [429, 500, 502, 503, 504] {
            let err = SyncError::transport("https://a", Some(status), "transient");
            assert!(policy.should_retry(&err), "status {} should retry", status);
        }
    }

    #[test]
    fn test_should_not_retry_client_errors() {
        let policy = RetryPolicy::http_get();
        for status in [400, 401, 403, 404, 501] {
            let err = SyncError::transport("https://a", Some(status), "client");
            assert!(!policy.should_retry(&err), "status {} should not retry", status);
        }
    }

    #[test]
    fn test_should_retry_connection_errors() {
        let policy = RetryPolicy::http_get();
        let err = SyncError::transport("https://a", None, "connection refused");
        assert!(policy.should_retry(&err));
    }

    #[test]
    fn test_should_not_retry_content_or_validation() {
        let policy = RetryPolicy::http_get();
        assert!(!policy.should_retry(&SyncError::content("https://a", "bad json")));
        assert!(!policy.should_retry(&SyncError::Validation("http://".to_string())));
    }

    #[test]
    fn test_custom_retryable_statuses() {
        let policy = RetryPolicy {
            retryable_statuses: vec![503],
            ..RetryPolicy::http_get()
        };
        assert!(policy.should_retry(&SyncError::transport("https://a", Some(503), "x")));
        assert!(!policy.should_retry(&SyncError::transport("https://a", Some(500), "x")));
    }

    // ==================== with_retry_if Tests ====================

    #[tokio::test]
    async fn test_succeeds_first_attempt() {
        let policy = RetryPolicy::new(3, Duration::from_millis(10));
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<u32, &str> = with_retry_if(
            &policy,
            "test",
            || {
                let c = counter_clone.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                }
            },
            |_| true,
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let policy = RetryPolicy::new(3, Duration::from_millis(10));
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<u32, &str> = with_retry_if(
            &policy,
            "test",
            || {
                let c = counter_clone.clone();
                async move {
                    let attempt = c.fetch_add(1, Ordering::SeqCst);
                    if attempt < 2 {
                        Err("temporary failure")
                    } else {
                        Ok(42)
                    }
                }
            },
            |_| true,
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_all_attempts_fail_returns_last_error() {
        let policy = RetryPolicy::new(3, Duration::from_millis(5));
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<(), String> = with_retry_if(
            &policy,
            "error_test",
            || {
                let c = counter_clone.clone();
                async move {
                    let attempt = c.fetch_add(1, Ordering::SeqCst);
                    Err(format!("error on attempt {}", attempt + 1))
                }
            },
            |_| true,
        )
        .await;

        assert_eq!(result.unwrap_err(), "error on attempt 3");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_immediately() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100));
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<(), SyncError> = with_retry_if(
            &policy,
            "non_retryable",
            || {
                let c = counter_clone.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err(SyncError::transport("https://a", Some(404), "not found"))
                }
            },
            |e| policy.should_retry(e),
        )
        .await;

        assert_eq!(result.unwrap_err().status(), Some(404));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retryable_then_non_retryable() {
        let policy = RetryPolicy::new(5, Duration::from_millis(10));
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<(), SyncError> = with_retry_if(
            &policy,
            "mixed",
            || {
                let c = counter_clone.clone();
                async move {
                    match c.fetch_add(1, Ordering::SeqCst) {
                        0 => Err(SyncError::transport("https://a", Some(503), "unavailable")),
                        _ => Err(SyncError::content("https://a", "truncated body")),
                    }
                }
            },
            |e| policy.should_retry(e),
        )
        .await;

        assert!(matches!(result, Err(SyncError::Content { .. })));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exponential_backoff_timing() {
        let policy = RetryPolicy::new(3, Duration::from_millis(50)).with_backoff_multiplier(2.0);

        let start = std::time::Instant::now();

        let _result: Result<(), &str> =
            with_retry_if(&policy, "timing_test", || async { Err("always fails") }, |_| true)
                .await;

        let elapsed = start.elapsed();

        // Should have waited: 0ms + 50ms + 100ms = 150ms minimum
        assert!(
            elapsed >= Duration::from_millis(100),
            "Expected at least 100ms delay, got {:?}",
            elapsed
        );
        assert!(
            elapsed < Duration::from_millis(1000),
            "Expected less than 1s total, got {:?}",
            elapsed
        );
    }
}
