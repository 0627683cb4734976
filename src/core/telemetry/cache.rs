//! Time-bounded single-value cache shared by the collectors.
//!
//! Each collector owns one `SamplerCache` and hands it the measurement to
//! run on a miss. Only successful measurements are stored, so a failing
//! probe is retried on the next call instead of pinning the error.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::Result;

/// Monotonic time source. Swapped for a manual clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    captured_at: Instant,
}

pub struct SamplerCache<T> {
    entry: RwLock<Option<CacheEntry<T>>>,
    ttl: RwLock<Duration>,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> SamplerCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl: RwLock::new(ttl),
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        *self.ttl.read()
    }

    /// Change the freshness window. Applies to every check made after the
    /// call, including against the value already stored.
    pub fn set_ttl(&self, ttl: Duration) {
        let mut current = self.ttl.write();
        if *current != ttl {
            log::debug!("Cache TTL changed from {:?} to {:?}", *current, ttl);
            *current = ttl;
        }
    }

    /// The stored value if it is still fresh.
    pub fn peek(&self) -> Option<T> {
        let now = self.clock.now();
        let ttl = self.ttl();
        self.entry
            .read()
            .as_ref()
            .filter(|entry| now.saturating_duration_since(entry.captured_at) < ttl)
            .map(|entry| entry.value.clone())
    }

    /// Return the fresh value, or run `measure` and store its result.
    ///
    /// The boolean is `true` when the value came from the cache. Errors
    /// from `measure` propagate and leave the previous entry untouched.
    /// Concurrent misses may both measure; the later store wins.
    pub fn get<F>(&self, measure: F) -> Result<(T, bool)>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.peek() {
            return Ok((value, true));
        }

        let value = measure()?;
        *self.entry.write() = Some(CacheEntry {
            value: value.clone(),
            captured_at: self.clock.now(),
        });
        Ok((value, false))
    }

    pub fn invalidate(&self) {
        *self.entry.write() = None;
    }
}
