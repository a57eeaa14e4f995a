use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::{task::JoinHandle, time::interval};

const EVICTION_INTERVAL: Duration = Duration::from_secs(30);

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { limit: u64, remaining: u64 },
    Limited { retry_after_secs: u64 },
}

/// Sliding window counter: the previous window's count is weighted by how
/// much of it still overlaps the trailing `window_size`.
#[derive(Debug)]
pub struct SlidingWindow {
    window_size: Duration,
    limit: u64,
    current_window_start: Instant,
    current_count: u64,
    prev_count: u64,
    last_seen: Instant,
}

impl SlidingWindow {
    pub fn new(window_size: Duration, limit: u64, now: Instant) -> Self {
        Self {
            window_size,
            limit,
            current_window_start: now,
            current_count: 0,
            prev_count: 0,
            last_seen: now,
        }
    }

    pub fn allow_at(&mut self, now: Instant) -> RateDecision {
        self.last_seen = now;

        let mut elapsed = now.saturating_duration_since(self.current_window_start);
        if elapsed >= self.window_size {
            // Two full windows of silence leave nothing to carry over
            self.prev_count = if elapsed >= self.window_size * 2 { 0 } else { self.current_count };
            self.current_count = 0;
            self.current_window_start = now;
            elapsed = Duration::ZERO;
        }

        let weight = elapsed.as_secs_f64() / self.window_size.as_secs_f64();
        let effective = (self.prev_count as f64) * (1.0 - weight) + (self.current_count as f64);

        if effective < self.limit as f64 {
            self.current_count += 1;
            let remaining = (self.limit as f64 - effective - 1.0).max(0.0).floor() as u64;
            RateDecision::Allowed { limit: self.limit, remaining }
        } else {
            let retry_after_secs = (self.window_size - elapsed).as_secs_f64().ceil() as u64;
            RateDecision::Limited { retry_after_secs: retry_after_secs.max(1) }
        }
    }

    fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_seen)
    }
}

/// Per-client windows keyed by address.
#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<String, Arc<Mutex<SlidingWindow>>>>,
    limit: u64,
    window_size: Duration,
}

impl RateLimiterStore {
    pub fn new(limit: u64, window_size: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            limit,
            window_size,
        }
    }

    fn get_window(&self, key: &str, now: Instant) -> Arc<Mutex<SlidingWindow>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }

        self.map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SlidingWindow::new(self.window_size, self.limit, now))))
            .clone()
    }

    pub fn check(&self, key: &str) -> RateDecision {
        let now = Instant::now();
        let window = self.get_window(key, now);
        let mut guard = window.lock();
        guard.allow_at(now)
    }

    /// Drops windows that have not seen traffic for `ttl`.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let before = self.map.len();
        self.map.retain(|_, window| window.lock().idle_for(now) < ttl);
        before.saturating_sub(self.map.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.map.len()
    }

    /// Runs [`evict_idle`](Self::evict_idle) periodically until the handle is aborted.
    pub fn spawn_eviction(&self, ttl: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval(EVICTION_INTERVAL);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(ttl);
                if evicted > 0 {
                    tracing::debug!(evicted, "Evicted idle rate-limit windows");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_once_the_limit_is_reached() {
        let start = Instant::now();
        let mut window = SlidingWindow::new(Duration::from_secs(60), 3, start);

        for expected_remaining in [2, 1, 0] {
            assert_eq!(
                window.allow_at(start),
                RateDecision::Allowed { limit: 3, remaining: expected_remaining }
            );
        }

        assert_eq!(
            window.allow_at(start + Duration::from_secs(10)),
            RateDecision::Limited { retry_after_secs: 50 }
        );
    }

    #[test]
    fn previous_window_still_counts_right_after_rollover() {
        let start = Instant::now();
        let mut window = SlidingWindow::new(Duration::from_secs(60), 2, start);
        window.allow_at(start);
        window.allow_at(start);

        assert!(matches!(
            window.allow_at(start + Duration::from_secs(60)),
            RateDecision::Limited { .. }
        ));
    }

    #[test]
    fn quiet_clients_get_a_fresh_budget() {
        let start = Instant::now();
        let mut window = SlidingWindow::new(Duration::from_secs(60), 1, start);
        window.allow_at(start);

        assert!(matches!(
            window.allow_at(start + Duration::from_secs(121)),
            RateDecision::Allowed { .. }
        ));
    }

    #[test]
    fn clients_are_tracked_independently() {
        let store = RateLimiterStore::new(1, Duration::from_secs(60));

        assert!(matches!(store.check("203.0.113.1"), RateDecision::Allowed { .. }));
        assert!(matches!(store.check("203.0.113.1"), RateDecision::Limited { .. }));
        assert!(matches!(store.check("203.0.113.2"), RateDecision::Allowed { .. }));
        assert_eq!(store.tracked_clients(), 2);
    }

    #[test]
    fn idle_windows_are_evicted() {
        let store = RateLimiterStore::new(10, Duration::from_secs(60));
        store.check("203.0.113.1");

        assert_eq!(store.evict_idle(Duration::from_secs(3600)), 0);
        assert_eq!(store.evict_idle(Duration::ZERO), 1);
        assert_eq!(store.tracked_clients(), 0);
    }
}
