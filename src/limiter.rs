// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter for contact submissions.
//!
//! Each client key gets a counter that lives for one window. The first
//! attempt opens the window, later attempts increment the counter until the
//! limit is reached, and the first attempt after the window ends opens a
//! fresh one.
//!
//! A fixed window admits up to twice the limit across a window edge
//! (e.g. five attempts just before the reset and five just after).

use crate::config::RateLimitConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Attempt is admitted and counted
    Allowed {
        /// Attempts left in the current window
        remaining: u32,
        /// Time until the current window ends
        reset_in: Duration,
    },
    /// Attempt is rejected
    Denied {
        /// Whole seconds until the window ends, at least 1
        retry_after_secs: u64,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Keyed attempt store with check-and-consume semantics.
///
/// Implementations must make the check and the increment for one key a
/// single atomic step.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count an attempt for `client_key` at `now` and decide whether it passes.
    async fn check_and_consume(&self, client_key: &str, now: Instant) -> RateLimitResult;

    /// Drop entries whose window ended before `now`. Returns how many were removed.
    async fn sweep(&self, now: Instant) -> usize;

    /// Number of client keys currently tracked.
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Per-client counter for the current window.
#[derive(Debug, Clone, Copy)]
struct RateLimitEntry {
    count: u32,
    window_reset_at: Instant,
}

/// In-memory fixed-window limiter.
pub struct FixedWindowLimiter {
    max_attempts: u32,
    window: Duration,
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl FixedWindowLimiter {
    /// Create a limiter admitting `max_attempts` per `window` per key.
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Create a limiter from configuration.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_attempts, config.window_duration())
    }

    fn open_window(&self, now: Instant) -> RateLimitEntry {
        RateLimitEntry {
            count: 1,
            window_reset_at: now + self.window,
        }
    }
}

#[async_trait]
impl RateLimitStore for FixedWindowLimiter {
    async fn check_and_consume(&self, client_key: &str, now: Instant) -> RateLimitResult {
        let mut entries = self.entries.lock().await;

        match entries.get_mut(client_key) {
            Some(entry) if now <= entry.window_reset_at => {
                if entry.count < self.max_attempts {
                    entry.count += 1;
                    RateLimitResult::Allowed {
                        remaining: self.max_attempts - entry.count,
                        reset_in: entry.window_reset_at.saturating_duration_since(now),
                    }
                } else {
                    let wait = entry.window_reset_at.saturating_duration_since(now);
                    let retry_after_secs = ceil_secs(wait).max(1);
                    debug!(client = %client_key, retry_after_secs, "Attempt limit reached");
                    RateLimitResult::Denied { retry_after_secs }
                }
            }
            Some(entry) => {
                debug!(client = %client_key, "Window expired, opening a new one");
                *entry = self.open_window(now);
                RateLimitResult::Allowed {
                    remaining: self.max_attempts.saturating_sub(1),
                    reset_in: self.window,
                }
            }
            None => {
                entries.insert(client_key.to_string(), self.open_window(now));
                RateLimitResult::Allowed {
                    remaining: self.max_attempts.saturating_sub(1),
                    reset_in: self.window,
                }
            }
        }
    }

    async fn sweep(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| now <= entry.window_reset_at);
        before - entries.len()
    }

    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

/// Round a duration up to whole seconds.
fn ceil_secs(d: Duration) -> u64 {
    let millis = d.as_millis();
    u64::try_from(millis.div_ceil(1000)).unwrap_or(u64::MAX)
}
