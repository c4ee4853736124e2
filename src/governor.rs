// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F.

//! `CallGovernor` — Admission control for calls into a rate-limited service.
//!
//! Bounds how often a downstream call (typically a scoring request to an
//! external model endpoint) may start. The policy is a sliding-window log:
//! the governor keeps the instant of every admission younger than `window`
//! and admits a new call only while that log holds fewer than `capacity`
//! entries. A caller that finds the window full sleeps until the oldest
//! admission ages out, then re-checks.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sentinel::governor::CallGovernor;
//!
//! let governor = Arc::new(CallGovernor::new(50, Duration::from_secs(60)).unwrap());
//! let score = governor.wrap(|prompt: &str| prompt.len());
//! assert_eq!(score("how biased is this?"), 19);
//! ```
//!
//! # Concurrency
//!
//! The check-and-record step runs under a mutex. The mutex is released
//! before sleeping, so a throttled caller never blocks other callers from
//! being admitted or computing their own wait. No FIFO order is promised
//! among waiters; the capacity bound holds at every observation regardless.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::common::clock::{Clock, MonotonicClock};
use crate::error::ConfigError;

/// Default number of admissions per window.
pub const DEFAULT_CAPACITY: usize = 50;

/// Default window length in milliseconds (one minute).
pub const DEFAULT_WINDOW_MS: u64 = 60_000;

/// Serializable governor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    /// Maximum admissions within any trailing window.
    pub capacity: usize,
    /// Window length in milliseconds.
    pub window_ms: u64,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            window_ms: DEFAULT_WINDOW_MS,
        }
    }
}

impl GovernorConfig {
    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// ```
    /// use sentinel::governor::GovernorConfig;
    ///
    /// let config = GovernorConfig::from_toml_str("capacity = 5").unwrap();
    /// assert_eq!(config.capacity, 5);
    /// assert_eq!(config.window_ms, 60_000);
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects a zero capacity or a zero-length window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::NonPositiveCapacity {
                capacity: self.capacity,
            });
        }
        if self.window_ms == 0 {
            return Err(ConfigError::NonPositiveWindow);
        }
        Ok(())
    }

    /// Window as a [`Duration`].
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Sliding-window log limiter gating calls to a downstream service.
///
/// Generic over its [`Clock`] so tests can substitute virtual time; the
/// default is the process monotonic clock.
#[derive(Debug)]
pub struct CallGovernor<C: Clock = MonotonicClock> {
    capacity: usize,
    window: Duration,
    /// Admission instants younger than `window`, oldest first.
    admissions: Mutex<VecDeque<Instant>>,
    clock: C,
}

impl CallGovernor {
    /// Creates a governor on the monotonic clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero or `window` is zero.
    pub fn new(capacity: usize, window: Duration) -> Result<Self, ConfigError> {
        Self::with_clock(capacity, window, MonotonicClock)
    }

    /// Creates a governor from a validated [`GovernorConfig`].
    pub fn from_config(config: &GovernorConfig) -> Result<Self, ConfigError> {
        Self::new(config.capacity, config.window())
    }
}

impl Default for CallGovernor {
    /// 50 admissions per 60 seconds.
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            window: Duration::from_millis(DEFAULT_WINDOW_MS),
            admissions: Mutex::new(VecDeque::new()),
            clock: MonotonicClock,
        }
    }
}

impl<C: Clock> CallGovernor<C> {
    /// Creates a governor driven by the given clock.
    pub fn with_clock(capacity: usize, window: Duration, clock: C) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::NonPositiveCapacity { capacity });
        }
        if window.is_zero() {
            return Err(ConfigError::NonPositiveWindow);
        }
        Ok(Self {
            capacity,
            window,
            admissions: Mutex::new(VecDeque::new()),
            clock,
        })
    }

    /// Maximum admissions per trailing window.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Length of the trailing window.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Blocks until the call may proceed, then records the admission.
    ///
    /// Returns immediately while fewer than `capacity` admissions fall in
    /// the trailing window. Otherwise sleeps for
    /// `window - (now - oldest_admission)` with the lock released and
    /// retries. Each retry follows exactly one computed wait; there is no
    /// spinning.
    pub fn acquire(&self) {
        loop {
            let wait = match self.admit_or_wait() {
                None => return,
                Some(wait) => wait,
            };
            tracing::info!(
                wait_ms = wait.as_millis() as u64,
                capacity = self.capacity,
                window_ms = self.window.as_millis() as u64,
                "call window full, sleeping"
            );
            self.clock.sleep(wait);
        }
    }

    /// Admits the call only if the window has room. Never blocks on time.
    pub fn try_acquire(&self) -> bool {
        self.admit_or_wait().is_none()
    }

    /// Number of admissions currently inside the trailing window.
    #[must_use]
    pub fn in_window(&self) -> usize {
        let mut log = self.lock_admissions();
        let now = self.clock.now();
        self.prune(&mut log, now);
        log.len()
    }

    /// Runs `f` once admission is granted and returns its result untouched.
    pub fn call<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.acquire();
        f()
    }

    /// Wraps a callable so every invocation first passes through
    /// [`acquire`](Self::acquire).
    ///
    /// The returned callable takes the same argument and returns the same
    /// value as `f`, including any `Err`, which is passed through unchanged.
    /// Multi-argument callables take their arguments as a tuple.
    pub fn wrap<F, A, R>(self: &Arc<Self>, f: F) -> impl Fn(A) -> R + Send + Sync
    where
        C: 'static,
        F: Fn(A) -> R + Send + Sync,
    {
        let governor = Arc::clone(self);
        move |args: A| {
            governor.acquire();
            f(args)
        }
    }

    /// The critical section: prune, then either record `now` (returns
    /// `None`) or return the time until the oldest admission expires.
    fn admit_or_wait(&self) -> Option<Duration> {
        let mut log = self.lock_admissions();
        let now = self.clock.now();
        self.prune(&mut log, now);

        if log.len() < self.capacity {
            log.push_back(now);
            tracing::trace!(in_window = log.len(), "call admitted");
            return None;
        }

        // capacity > 0, so a full log has a front entry.
        let oldest = log.front().copied().unwrap_or(now);
        Some(
            self.window
                .saturating_sub(now.saturating_duration_since(oldest)),
        )
    }

    /// Drops admissions at least `window` old.
    fn prune(&self, log: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = log.front() {
            if now.saturating_duration_since(oldest) < self.window {
                break;
            }
            log.pop_front();
        }
    }

    /// A panic elsewhere cannot leave the log inconsistent (every mutation
    /// is a single push or pop), so a poisoned lock is recovered.
    fn lock_admissions(&self) -> MutexGuard<'_, VecDeque<Instant>> {
        self.admissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::common::clock::ManualClock;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn window_never_exceeds_capacity(
            capacity in 1..=8usize,
            window_secs in 1..=30u64,
            gaps in proptest::collection::vec(0..=10u64, 1..40),
        ) {
            let clock = Arc::new(ManualClock::new());
            let governor = CallGovernor::with_clock(
                capacity,
                Duration::from_secs(window_secs),
                Arc::clone(&clock),
            ).unwrap();

            let mut admitted: Vec<Instant> = Vec::new();
            for gap in gaps {
                clock.advance(Duration::from_secs(gap));
                governor.acquire();
                let now = clock.now();
                admitted.push(now);
                let recent = admitted
                    .iter()
                    .filter(|t| now.duration_since(**t) < Duration::from_secs(window_secs))
                    .count();
                prop_assert!(recent <= capacity);
            }
        }

        #[test]
        fn every_sleep_is_within_window(
            capacity in 1..=5usize,
            calls in 1..=30usize,
        ) {
            let clock = Arc::new(ManualClock::new());
            let window = Duration::from_secs(10);
            let governor = CallGovernor::with_clock(capacity, window, Arc::clone(&clock)).unwrap();
            for _ in 0..calls {
                governor.acquire();
            }
            for slept in clock.sleeps() {
                prop_assert!(slept <= window);
            }
            prop_assert_eq!(clock.sleeps().len(), (calls - 1) / capacity);
        }
    }
}
