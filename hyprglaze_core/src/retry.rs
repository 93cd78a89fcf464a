//! Retry envelope with optional exponential backoff

use log::warn;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub backoff: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            backoff: true,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if !self.backoff {
            return self.initial_delay;
        }
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_delay.saturating_mul(1u32 << exponent)
    }
}

/// Run `op` until it succeeds or runs out of attempts.
///
/// Only the error of the final attempt is returned; earlier failures are
/// logged and followed by a `tokio::time::sleep` of [`RetryPolicy::delay_after`].
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "Attempt {}/{} failed: {}, retrying in {:?}",
                    attempt, max_attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    #[test]
    fn backoff_doubles_from_initial_delay() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(4));
    }

    #[test]
    fn fixed_delay_without_backoff() {
        let policy = RetryPolicy {
            backoff: false,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_after(3), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_after_two_delays() {
        let start = Instant::now();
        let attempts: Arc<Mutex<Vec<Duration>>> = Arc::default();

        let seen = attempts.clone();
        let result: Result<&str, String> = with_retry(&RetryPolicy::default(), || {
            let seen = seen.clone();
            async move {
                let mut seen = seen.lock().unwrap();
                seen.push(start.elapsed());
                if seen.len() < 3 {
                    Err(format!("failure {}", seen.len()))
                } else {
                    Ok("sunny")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "sunny");
        let attempts = attempts.lock().unwrap();
        assert_eq!(attempts.len(), 3);
        assert_eq!(attempts[1] - attempts[0], Duration::from_secs(1));
        assert_eq!(attempts[2] - attempts[1], Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn surfaces_only_the_last_error() {
        let mut calls = 0;
        let result: Result<(), String> = with_retry(&RetryPolicy::default(), || {
            calls += 1;
            let n = calls;
            async move { Err(format!("failure {}", n)) }
        })
        .await;

        assert_eq!(result.unwrap_err(), "failure 3");
        assert_eq!(calls, 3);
    }
}
