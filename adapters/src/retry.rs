//! Bounded exponential backoff around the outbound call

use crate::config::GatewayConfig;
use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Retry policy for one processor, sourced from its [`GatewayConfig`].
///
/// Per call the state machine is `Attempting(n)` → success, or transient
/// failure and `n < max_attempts` → sleep `backoff_delay(n)` →
/// `Attempting(n+1)`, or failure at `n == max_attempts` → done. Nothing is
/// shared across calls; every call starts a fresh attempt counter.
///
/// Only transport-level failures are retried. A definitive rejection from
/// the processor is final — retrying a declined charge as if it were a
/// transient fault is a correctness bug, not persistence.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, first attempt included
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub base_delay: Duration,
    /// Backoff ceiling
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Build from a processor config with the crate-default delay curve
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(crate::BASE_BACKOFF_MS),
            max_delay: Duration::from_millis(crate::MAX_BACKOFF_MS),
        }
    }

    /// Delay inserted after failed attempt `attempt` (1-indexed):
    /// `min(base * 2^(attempt-1), max)`
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        let base_ms = self.base_delay.as_millis() as u64;
        let delay_ms = base_ms.saturating_mul(1u64 << exp);
        Duration::from_millis(delay_ms.min(self.max_delay.as_millis() as u64))
    }

    /// Drive `op` through the attempt loop.
    ///
    /// The last attempt's error is propagated unchanged (attempt count
    /// recorded on `Unavailable`), so callers can still distinguish a
    /// terminal network error from a terminal rejection. The cancellation
    /// token aborts a pending backoff sleep as well as in-flight attempts.
    pub async fn run<T, F, Fut>(&self, cancel: &CancellationToken, op: F) -> Result<T>
    where
        F: Fn(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: u32 = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) if attempt >= self.max_attempts => return Err(e.with_attempts(attempt)),
                Err(e) => {
                    let delay = self.backoff_delay(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient gateway failure, backing off"
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(Error::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payments_core::NormalizedStatus;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_millis(30_000),
        }
    }

    fn transient() -> Error {
        Error::Unavailable {
            attempts: 1,
            reason: "connection reset".to_string(),
        }
    }

    #[test]
    fn test_backoff_schedule() {
        let p = policy(10);
        let expected = [1_000u64, 2_000, 4_000, 8_000, 16_000, 30_000, 30_000, 30_000];
        for (i, ms) in expected.iter().enumerate() {
            let attempt = (i + 1) as u32;
            assert_eq!(
                p.backoff_delay(attempt),
                Duration::from_millis(*ms),
                "attempt {}",
                attempt
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_k_failures() {
        let p = policy(5);
        let cancel = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));

        let result = p
            .run(&cancel, |_| {
                let calls = calls.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(transient())
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_surfaces_last_error_with_attempt_count() {
        let p = policy(3);
        let cancel = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();

        let result: Result<()> = p
            .run(&cancel, |_| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(transient())
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result {
            Err(Error::Unavailable { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected Unavailable, got {:?}", other),
        }
        // 1s + 2s of backoff, attempts themselves are instant under the
        // paused clock
        assert_eq!(started.elapsed(), Duration::from_millis(3_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_is_never_retried() {
        let p = policy(5);
        let cancel = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<()> = p
            .run(&cancel, |_| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(Error::Rejected {
                        status_code: 402,
                        body: "declined".to_string(),
                        status: NormalizedStatus::Failed,
                    })
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(Error::Rejected { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_error_kind_survives_exhaustion() {
        let p = policy(2);
        let cancel = CancellationToken::new();

        let result: Result<()> = p
            .run(&cancel, |_| async { Err(Error::Timeout { elapsed_ms: 100 }) })
            .await;

        assert!(matches!(result, Err(Error::Timeout { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_aborts_backoff_sleep() {
        let p = policy(5);
        let cancel = CancellationToken::new();

        let canceller = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                cancel.cancel();
            })
        };

        let result: Result<()> = p.run(&cancel, |_| async { Err(transient()) }).await;

        assert!(matches!(result, Err(Error::Cancelled)));
        canceller.await.unwrap();
    }
}
