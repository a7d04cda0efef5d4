//! Wall-clock abstraction used for token expiry checks.

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
  /// Pin the clock to `secs` seconds after the Unix epoch.
  pub fn at_timestamp(secs: i64) -> Self {
    Self(DateTime::from_timestamp(secs, 0).unwrap_or_default())
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> { self.0 }
}
