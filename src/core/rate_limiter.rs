//! Rate limiting module to prevent credential guessing

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Counts password attempts per key (normalized email) in a sliding window.
///
/// An attempt is recorded before the password is checked, so concurrent
/// requests cannot all slip past the limit. A successful login clears the
/// key.
pub struct LoginRateLimiter {
    attempts: RwLock<HashMap<String, Vec<Instant>>>,
    max_attempts: u32,
    window_duration: Duration,
    /// Maximum number of keys to track to prevent memory exhaustion
    max_tracked_keys: usize,
}

impl LoginRateLimiter {
    pub fn new(max_attempts: u32, window_duration: Duration) -> Self {
        Self {
            attempts: RwLock::new(HashMap::new()),
            max_attempts,
            window_duration,
            max_tracked_keys: 10000,
        }
    }

    /// Record an attempt for `key` if it is still under the limit.
    /// Returns false when the attempt must be refused.
    pub async fn try_begin(&self, key: &str) -> bool {
        let now = Instant::now();
        let window = self.window_duration;
        let limit = self.max_attempts as usize;
        let mut attempts = self.attempts.write().await;

        if let Some(times) = attempts.get_mut(key) {
            times.retain(|&time| now.duration_since(time) < window);
            if times.len() >= limit {
                return false;
            }
            times.push(now);
            return true;
        }

        if attempts.len() >= self.max_tracked_keys {
            attempts.retain(|_, times| {
                times.retain(|&time| now.duration_since(time) < window);
                !times.is_empty()
            });
        }

        if attempts.len() >= self.max_tracked_keys {
            // Locked keys are never evicted to make room
            let evictable = attempts
                .iter()
                .filter(|(_, times)| times.len() < limit)
                .min_by_key(|(_, times)| times.last().copied().unwrap_or(now))
                .map(|(key, _)| key.clone());

            match evictable {
                Some(oldest) => {
                    attempts.remove(&oldest);
                    log::debug!("Removed oldest key from login limiter to prevent memory exhaustion");
                }
                None => {
                    log::warn!("Login limiter full of locked keys, refusing new key");
                    return false;
                }
            }
        }

        if limit == 0 {
            return false;
        }
        attempts.insert(key.to_string(), vec![now]);
        true
    }

    /// Forget attempts after a successful login
    pub async fn reset(&self, key: &str) {
        self.attempts.write().await.remove(key);
    }

    /// Clean up old entries to prevent memory leaks
    pub async fn cleanup_old_entries(&self) {
        let now = Instant::now();
        let mut attempts = self.attempts.write().await;
        attempts.retain(|_, times| {
            times.retain(|&time| now.duration_since(time) < self.window_duration);
            !times.is_empty()
        });
    }

    /// Start periodic cleanup task
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                self.cleanup_old_entries().await;
            }
        });
    }
}
