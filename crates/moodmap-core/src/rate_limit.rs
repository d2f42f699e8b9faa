//! Fixed-window rate limiting keyed by client identity.
//!
//! The limiter is an explicit value passed to whoever needs it; there is no
//! global state. All state lives in process memory and is lost on restart.

use std::{
  collections::HashMap,
  hash::Hash,
  sync::{Mutex, PoisonError},
  time::{Duration, Instant},
};

/// How many submissions an identity may make per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
  pub window:         Duration,
  pub max_per_window: u32,
}

impl Default for RateLimitConfig {
  fn default() -> Self {
    Self {
      window:         Duration::from_secs(60),
      max_per_window: 1,
    }
  }
}

/// Outcome of [`RateLimiter::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  /// The request was counted. `remaining` more fit in the current window.
  Allowed { remaining: u32 },
  /// The window is full; it resets after `retry_after`.
  Limited { retry_after: Duration },
}

impl Decision {
  pub fn is_allowed(&self) -> bool { matches!(self, Self::Allowed { .. }) }
}

#[derive(Debug, Clone, Copy)]
struct Window {
  started: Instant,
  count:   u32,
}

/// Keyed store of per-identity windows.
#[derive(Debug)]
pub struct RateLimiter<K = String> {
  config:  RateLimitConfig,
  windows: Mutex<HashMap<K, Window>>,
}

impl<K: Eq + Hash + Clone> RateLimiter<K> {
  pub fn new(config: RateLimitConfig) -> Self {
    Self {
      config,
      windows: Mutex::new(HashMap::new()),
    }
  }

  pub fn config(&self) -> RateLimitConfig { self.config }

  /// Count a request from `key` against its current window.
  pub fn check(&self, key: &K) -> Decision { self.check_at(key, Instant::now()) }

  /// As [`check`](Self::check), with an explicit clock reading.
  pub fn check_at(&self, key: &K, now: Instant) -> Decision {
    let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
    let window = windows.entry(key.clone()).or_insert(Window { started: now, count: 0 });

    let elapsed = now.saturating_duration_since(window.started);
    if elapsed >= self.config.window {
      *window = Window { started: now, count: 0 };
    }

    if window.count < self.config.max_per_window {
      window.count += 1;
      Decision::Allowed {
        remaining: self.config.max_per_window - window.count,
      }
    } else {
      let elapsed = now.saturating_duration_since(window.started);
      Decision::Limited {
        retry_after: self.config.window.saturating_sub(elapsed),
      }
    }
  }

  /// Drop every window that has fully elapsed at `now`. Returns how many were
  /// removed.
  pub fn purge_expired(&self, now: Instant) -> usize {
    let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
    let before = windows.len();
    let window = self.config.window;
    windows.retain(|_, w| now.saturating_duration_since(w.started) < window);
    before - windows.len()
  }

  /// Number of identities currently tracked.
  pub fn tracked(&self) -> usize {
    self.windows.lock().unwrap_or_else(PoisonError::into_inner).len()
  }
}
