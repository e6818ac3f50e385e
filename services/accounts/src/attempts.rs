//! In-memory failed-login tracking.
//!
//! Counters live in a sharded map keyed by normalized email. Expiry is
//! write-based: every write refreshes the entry's clock, reads never do.
//! The cap and TTL line up with the durable lock so a capped counter and a
//! locked record describe the same state.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::domain::types::{ATTEMPT_TTL, MAX_LOGIN_ATTEMPTS};

/// Time source for the tracker. A seam so tests can drive expiry without
/// sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy)]
struct AttemptEntry {
    count: u32,
    written_at: Instant,
}

const SHARD_COUNT: usize = 16;

/// Failed-login counter per account key.
pub struct LoginAttemptTracker {
    shards: Vec<Mutex<HashMap<String, AttemptEntry>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl LoginAttemptTracker {
    pub fn new() -> Self {
        Self::with_clock(ATTEMPT_TTL, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            shards: (0..SHARD_COUNT).map(|_| Mutex::new(HashMap::new())).collect(),
            ttl,
            clock,
        }
    }

    /// Record one failure: a fresh key starts at 1, an existing one
    /// increments up to the cap, and either way the TTL restarts.
    pub fn record_failure(&self, key: &str) -> u32 {
        let now = self.clock.now();
        let mut shard = self.shard(key).lock().unwrap_or_else(PoisonError::into_inner);
        let count = match shard.get(key) {
            Some(entry) if !self.expired(entry, now) => {
                (entry.count + 1).min(MAX_LOGIN_ATTEMPTS)
            }
            _ => 1,
        };
        shard.insert(key.to_owned(), AttemptEntry { count, written_at: now });
        tracing::debug!(attempts = count, "recorded failed login attempt");
        count
    }

    /// Current count. Read-only: an expired entry reads as 0 and the TTL is
    /// never extended.
    pub fn count(&self, key: &str) -> u32 {
        let now = self.clock.now();
        let shard = self.shard(key).lock().unwrap_or_else(PoisonError::into_inner);
        match shard.get(key) {
            Some(entry) if !self.expired(entry, now) => entry.count,
            _ => 0,
        }
    }

    pub fn has_exceeded_max(&self, key: &str) -> bool {
        self.count(key) >= MAX_LOGIN_ATTEMPTS
    }

    /// Zero the counter, keeping the key live with a fresh TTL.
    pub fn reset(&self, key: &str) {
        let now = self.clock.now();
        let mut shard = self.shard(key).lock().unwrap_or_else(PoisonError::into_inner);
        shard.insert(key.to_owned(), AttemptEntry { count: 0, written_at: now });
    }

    /// Drop the key entirely.
    pub fn evict(&self, key: &str) {
        let mut shard = self.shard(key).lock().unwrap_or_else(PoisonError::into_inner);
        shard.remove(key);
    }

    fn shard(&self, key: &str) -> &Mutex<HashMap<String, AttemptEntry>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[hasher.finish() as usize % SHARD_COUNT]
    }

    fn expired(&self, entry: &AttemptEntry, now: Instant) -> bool {
        now.duration_since(entry.written_at) > self.ttl
    }
}

impl Default for LoginAttemptTracker {
    fn default() -> Self {
        Self::new()
    }
}
