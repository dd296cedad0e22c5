//! Time provider abstraction
//!
//! This module provides a [`Clock`] trait that abstracts over time sources,
//! so token issuance and expiry checks use real system time in production while
//! tests can move time forward explicitly.
//!
//! # Example
//!
//! ```
//! use warden::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let secs = clock.now_secs();
//! let rfc3339 = clock.now_rfc3339();
//! ```

use std::fmt::Debug;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// A time provider for getting current timestamps.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current time as milliseconds since Unix epoch.
    fn now_millis(&self) -> u64;

    /// Returns the current time as an RFC3339-formatted string.
    fn now_rfc3339(&self) -> String;

    /// Get current time as seconds since Unix epoch.
    ///
    /// Convenience method that converts milliseconds to seconds.
    fn now_secs(&self) -> i64 {
        (self.now_millis() / 1000) as i64
    }
}

/// Production clock using real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn now_rfc3339(&self) -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

/// Manually driven clock.
///
/// Unlike the system clock, time only moves when the owner calls [`FixedClock::advance`]
/// or [`FixedClock::set`]. Used to issue a token and then step past its expiry.
///
/// # Example
///
/// ```
/// use warden::{Clock, FixedClock};
///
/// let clock = FixedClock::new(1_000);
/// assert_eq!(clock.now_millis(), 1_000);
/// clock.advance(500);
/// assert_eq!(clock.now_millis(), 1_500);
/// ```
pub struct FixedClock {
    millis: Mutex<u64>,
}

impl FixedClock {
    /// Create a new fixed clock with the given initial time in milliseconds.
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Mutex::new(millis),
        }
    }

    /// Advance the clock by the given number of milliseconds.
    pub fn advance(&self, ms: u64) {
        *self.lock() += ms;
    }

    /// Advance the clock by whole seconds.
    pub fn advance_secs(&self, secs: u64) {
        self.advance(secs * 1000);
    }

    /// Set the clock to a specific time in milliseconds.
    pub fn set(&self, ms: u64) {
        *self.lock() = ms;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, u64> {
        self.millis.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        *self.lock()
    }

    fn now_rfc3339(&self) -> String {
        let millis = self.now_millis();
        chrono::DateTime::from_timestamp_millis(millis as i64)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| "1970-01-01T00:00:00+00:00".to_string())
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        // 2024-01-01 00:00:00 UTC
        Self::new(1704067200000)
    }
}

impl Debug for FixedClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedClock")
            .field("millis", &self.now_millis())
            .finish()
    }
}
