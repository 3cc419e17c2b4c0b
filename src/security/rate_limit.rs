//! Per-client sliding-window rate limiting.
//!
//! Each client identifier owns the timestamps of its admitted requests.
//! Stale timestamps are purged lazily when the same client is seen again;
//! a background sweep drops clients that have gone quiet entirely.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::observability::metrics;
use crate::security::clock::{Clock, SystemClock};

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Request admitted; `remaining` more fit in the current window.
    Admitted { remaining: u32 },
    /// Over the limit; the oldest admitted request expires in `retry_after_secs`.
    Rejected { retry_after_secs: u64 },
}

impl Decision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Decision::Admitted { .. })
    }
}

/// Admission control keyed by client identifier.
///
/// Implementations must make the check-and-record step atomic per key.
pub trait Admission: Send + Sync {
    fn admit(&self, client_id: &str, window_ms: u64, max_requests: u32) -> Decision;
}

/// In-memory sliding-window limiter.
pub struct SlidingWindowLimiter {
    windows: DashMap<String, Vec<u64>>,
    clock: Arc<dyn Clock>,
}

impl SlidingWindowLimiter {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            clock,
        }
    }

    /// Number of client identifiers currently held in memory.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Drop clients whose every timestamp is outside the window.
    ///
    /// Returns how many clients were removed.
    pub fn sweep(&self, window_ms: u64) -> usize {
        let window_start = self.clock.now_ms().saturating_sub(window_ms);
        let before = self.windows.len();
        self.windows
            .retain(|_, timestamps| timestamps.last().is_some_and(|&t| t > window_start));
        before.saturating_sub(self.windows.len())
    }
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl Admission for SlidingWindowLimiter {
    fn admit(&self, client_id: &str, window_ms: u64, max_requests: u32) -> Decision {
        let now = self.clock.now_ms();
        let window_start = now.saturating_sub(window_ms);

        // The entry guard holds the shard write lock for the whole
        // filter-check-append sequence.
        let mut entry = self.windows.entry(client_id.to_string()).or_default();
        let timestamps = entry.value_mut();
        timestamps.retain(|&t| t > window_start);

        if timestamps.len() >= max_requests as usize {
            let oldest = timestamps.first().copied().unwrap_or(now);
            let wait_ms = (oldest + window_ms).saturating_sub(now);
            return Decision::Rejected {
                retry_after_secs: wait_ms.div_ceil(1000),
            };
        }

        timestamps.push(now);
        Decision::Admitted {
            remaining: max_requests.saturating_sub(timestamps.len() as u32),
        }
    }
}

/// Periodically evict idle clients until shutdown fires.
pub fn spawn_sweeper(
    limiter: Arc<SlidingWindowLimiter>,
    window_ms: u64,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = limiter.sweep(window_ms);
                    let tracked = limiter.tracked_clients();
                    metrics::record_tracked_clients(tracked);
                    if removed > 0 {
                        tracing::debug!(removed, tracked, "Evicted idle rate limit entries");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Rate limit sweeper stopping");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::clock::MockClock;

    const WINDOW: u64 = 60_000;
    const START: u64 = 1_700_000_000_000;

    fn limiter() -> (SlidingWindowLimiter, MockClock) {
        let clock = MockClock::new(START);
        (SlidingWindowLimiter::with_clock(Arc::new(clock.clone())), clock)
    }

    #[test]
    fn test_admits_up_to_limit() {
        let (limiter, _clock) = limiter();

        for expected_remaining in (0..5).rev() {
            assert_eq!(
                limiter.admit("10.0.0.1", WINDOW, 5),
                Decision::Admitted { remaining: expected_remaining }
            );
        }
        assert!(!limiter.admit("10.0.0.1", WINDOW, 5).is_admitted());
    }

    #[test]
    fn test_rejects_every_request_beyond_limit() {
        let (limiter, clock) = limiter();
        for _ in 0..5 {
            limiter.admit("client", WINDOW, 5);
        }

        for _ in 0..10 {
            clock.advance(Duration::from_millis(100));
            assert!(!limiter.admit("client", WINDOW, 5).is_admitted());
        }
    }

    #[test]
    fn test_retry_after_counts_down() {
        let (limiter, clock) = limiter();
        for _ in 0..5 {
            limiter.admit("client", WINDOW, 5);
        }

        let mut previous = u64::MAX;
        for step in 0..6 {
            let Decision::Rejected { retry_after_secs } = limiter.admit("client", WINDOW, 5) else {
                panic!("expected rejection at step {}", step);
            };
            assert!(retry_after_secs > 0);
            assert!(retry_after_secs < previous);
            previous = retry_after_secs;
            clock.advance(Duration::from_secs(10));
        }
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let (limiter, clock) = limiter();
        limiter.admit("client", WINDOW, 1);

        clock.advance(Duration::from_millis(59_001));
        assert_eq!(
            limiter.admit("client", WINDOW, 1),
            Decision::Rejected { retry_after_secs: 1 }
        );

        clock.set(START);
        assert_eq!(
            limiter.admit("client", WINDOW, 1),
            Decision::Rejected { retry_after_secs: 60 }
        );
    }

    #[test]
    fn test_oldest_request_governs_retry() {
        let (limiter, clock) = limiter();
        limiter.admit("client", WINDOW, 2);
        clock.advance(Duration::from_secs(30));
        limiter.admit("client", WINDOW, 2);
        clock.advance(Duration::from_secs(5));

        // First request expires 25s from now, second 55s.
        assert_eq!(
            limiter.admit("client", WINDOW, 2),
            Decision::Rejected { retry_after_secs: 25 }
        );
    }

    #[test]
    fn test_window_slides() {
        let (limiter, clock) = limiter();
        for _ in 0..5 {
            limiter.admit("client", WINDOW, 5);
        }
        assert!(!limiter.admit("client", WINDOW, 5).is_admitted());

        // A timestamp exactly at the window start is already expired.
        clock.advance(Duration::from_millis(WINDOW));
        assert_eq!(
            limiter.admit("client", WINDOW, 5),
            Decision::Admitted { remaining: 4 }
        );
    }

    #[test]
    fn test_partial_expiry_frees_single_slot() {
        let (limiter, clock) = limiter();
        limiter.admit("client", WINDOW, 2);
        clock.advance(Duration::from_secs(40));
        limiter.admit("client", WINDOW, 2);

        clock.advance(Duration::from_secs(21));
        assert_eq!(limiter.admit("client", WINDOW, 2), Decision::Admitted { remaining: 0 });
        assert!(!limiter.admit("client", WINDOW, 2).is_admitted());
    }

    #[test]
    fn test_clients_are_independent() {
        let (limiter, _clock) = limiter();
        for _ in 0..5 {
            limiter.admit("a", WINDOW, 5);
        }
        assert!(!limiter.admit("a", WINDOW, 5).is_admitted());
        assert!(limiter.admit("b", WINDOW, 5).is_admitted());
    }

    #[test]
    fn test_sweep_drops_only_idle_clients() {
        let (limiter, clock) = limiter();
        limiter.admit("idle", WINDOW, 5);
        clock.advance(Duration::from_secs(50));
        limiter.admit("active", WINDOW, 5);
        clock.advance(Duration::from_secs(15));

        assert_eq!(limiter.sweep(WINDOW), 1);
        assert_eq!(limiter.tracked_clients(), 1);
        assert_eq!(limiter.admit("active", WINDOW, 5), Decision::Admitted { remaining: 3 });
    }

    #[test]
    fn test_concurrent_admission_never_exceeds_limit() {
        let limiter = Arc::new(SlidingWindowLimiter::with_clock(Arc::new(MockClock::new(START))));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || {
                    (0..10)
                        .filter(|_| limiter.admit("shared", WINDOW, 5).is_admitted())
                        .count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 5);
    }

    #[tokio::test]
    async fn test_sweeper_stops_on_shutdown() {
        let limiter = Arc::new(SlidingWindowLimiter::new());
        let (tx, rx) = broadcast::channel(1);
        let handle = spawn_sweeper(limiter, WINDOW, Duration::from_millis(10), rx);

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}
