//! Transient level-up notice.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// A message that disappears on its own after `ttl`.
///
/// The notice never blocks the feed: expiry is checked lazily against the
/// caller's clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUpNotice {
    /// Text to show.
    pub message: String,
    /// When the notice was raised.
    pub raised_at: DateTime<Utc>,
    /// How long it stays visible.
    pub ttl: Duration,
}

impl LevelUpNotice {
    /// Raises a notice now.
    #[must_use]
    pub fn new(message: impl Into<String>, ttl: Duration) -> Self {
        Self::raised_at(message, Utc::now(), ttl)
    }

    /// Raises a notice at a fixed instant.
    #[must_use]
    pub fn raised_at(message: impl Into<String>, raised_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            raised_at,
            ttl,
        }
    }

    /// Returns `true` once `ttl` has passed since the notice was raised.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.raised_at)
            .to_std()
            .is_ok_and(|elapsed| elapsed >= self.ttl)
    }
}
