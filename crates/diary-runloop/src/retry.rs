//! Retry and backoff for transient UI errors.

use std::future::Future;
use std::time::Duration;

use diary_core::{DiaryError, DiaryResult};
use rand::Rng;
use tokio::time::sleep;
use tracing::warn;

/// Backoff policy applied at the session boundary.
///
/// Only errors for which [`DiaryError::is_transient`] holds are retried;
/// anything else is returned on the spot.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub base_delay: Duration,
    /// Upper bound for any delay.
    pub max_delay: Duration,
    /// Exponential backoff multiplier.
    pub backoff_multiplier: f64,
    /// Spread delays by up to 10%.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Same attempt count, no waiting.
    pub fn immediate() -> Self {
        Self {
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: false,
            ..Self::default()
        }
    }

    /// Delay after the failed attempt number `attempt` (zero based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self.base_delay.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        let delay = delay.min(self.max_delay.as_millis() as f64);

        let spread = delay * 0.1;
        let delay_ms = if self.jitter && spread >= 1.0 {
            delay + rand::rng().random_range(-spread..=spread)
        } else {
            delay
        };

        Duration::from_millis(delay_ms.max(0.0) as u64)
    }

    /// Run `operation` until it succeeds, fails permanently or runs out of
    /// attempts.
    pub async fn run<F, Fut, T>(&self, label: &str, mut operation: F) -> DiaryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DiaryResult<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    if !e.is_transient() || attempt >= attempts {
                        return Err(e);
                    }

                    let delay = self.delay_for_attempt(attempt - 1);
                    warn!(
                        "{} failed (attempt {}/{}): {}, retrying in {:?}",
                        label, attempt, attempts, e, delay
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diary_core::UiError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_delay_calculation() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(100),
            jitter: false,
            ..Default::default()
        };

        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_capped() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            jitter: false,
            ..Default::default()
        };
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(500));
    }

    #[test]
    fn test_delay_with_jitter() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(100),
            backoff_multiplier: 1.0,
            jitter: true,
            ..Default::default()
        };
        for _ in 0..20 {
            let ms = policy.delay_for_attempt(0).as_millis();
            assert!((90..=110).contains(&ms), "{}", ms);
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = RetryPolicy::immediate()
            .run("click save", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(UiError::StaleElement("#upsert_diary".into()).into())
                } else {
                    Ok("saved")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "saved");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: DiaryResult<()> = RetryPolicy::immediate()
            .run("select crop", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(UiError::Timeout("#selectCrops".into()).into())
            })
            .await;

        let err = result.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: DiaryResult<()> = RetryPolicy::immediate()
            .run("navigate", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(UiError::Navigation("net::ERR_NAME_NOT_RESOLVED".into()).into())
            })
            .await;

        assert!(matches!(result, Err(DiaryError::Ui(UiError::Navigation(_)))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_between_attempts() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(100),
            jitter: false,
            ..Default::default()
        };
        let start = tokio::time::Instant::now();
        let _: DiaryResult<()> = policy
            .run("wait", || async { Err(UiError::Timeout("#memo".into()).into()) })
            .await;
        // 100ms after the first failure, 200ms after the second.
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }
}
