//! Sliding-window rate limiting per caller identity
//!
//! Admission control for request handlers: each identity may be
//! admitted at most `max_requests` times within any trailing
//! `window`. Rejected attempts are not recorded, so they never count
//! against future windows.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-identity sliding-window rate limiter
///
/// One lock guards the whole identity map, so pruning and the admit
/// decision are atomic per call. Identities are never purged once
/// seen; the map grows with the number of distinct callers.
pub struct RateLimiter {
    requests: Mutex<HashMap<String, Vec<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    /// Create a limiter admitting `max_requests` per identity within
    /// any trailing `window`
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    /// Decide whether a request from `identity` is admitted now
    ///
    /// Prunes the identity's history to admissions strictly younger
    /// than `window` (an admission exactly `window` old no longer
    /// counts), then admits and records iff the pruned count is under
    /// the limit. Total: always returns a boolean. The caller turns
    /// `false` into a 429 with retry guidance.
    pub fn is_allowed(&self, identity: &str) -> bool {
        let now = Instant::now();
        let mut requests = self.requests.lock();

        let timestamps = requests.entry(identity.to_string()).or_default();
        timestamps.retain(|t| now.duration_since(*t) < self.window);

        if timestamps.len() < self.max_requests {
            timestamps.push(now);
            true
        } else {
            false
        }
    }

    /// Admissions currently on record for `identity`, without pruning
    pub fn recorded(&self, identity: &str) -> usize {
        self.requests
            .lock()
            .get(identity)
            .map_or(0, |timestamps| timestamps.len())
    }

    /// Number of distinct identities seen so far
    pub fn identity_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Maximum admissions per identity per window
    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Window duration
    pub fn window(&self) -> Duration {
        self.window
    }
}
