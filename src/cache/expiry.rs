use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-entry expiry rules, in the JCache style.
///
/// Each field is a time-to-live in milliseconds applied when the matching event
/// happens to an entry. `on_creation: None` means the entry never expires;
/// `on_access` / `on_update` set to `None` leave the current expiry untouched.
/// A zero duration expires the entry immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpiryPolicy {
    pub on_creation: Option<u64>,
    pub on_access: Option<u64>,
    pub on_update: Option<u64>,
}

impl ExpiryPolicy {
    pub fn eternal() -> Self {
        Self::default()
    }

    /// Expire a fixed time after creation; later reads and writes keep the deadline.
    pub fn created(ttl: Duration) -> Self {
        Self {
            on_creation: Some(ttl.as_millis() as u64),
            ..Self::default()
        }
    }

    /// Expire a fixed time after the last write.
    pub fn modified(ttl: Duration) -> Self {
        let ttl = ttl.as_millis() as u64;
        Self {
            on_creation: Some(ttl),
            on_update: Some(ttl),
            ..Self::default()
        }
    }

    /// Expire a fixed time after the last read or write.
    pub fn touched(ttl: Duration) -> Self {
        let ttl = ttl.as_millis() as u64;
        Self {
            on_creation: Some(ttl),
            on_access: Some(ttl),
            on_update: Some(ttl),
        }
    }

    pub(crate) fn expiry_for_creation(&self, now: u64) -> Option<u64> {
        self.on_creation.map(|ttl| now.saturating_add(ttl))
    }

    pub(crate) fn expiry_for_update(&self, now: u64, current: Option<u64>) -> Option<u64> {
        match self.on_update {
            Some(ttl) => Some(now.saturating_add(ttl)),
            None => current,
        }
    }

    pub(crate) fn expiry_for_access(&self, now: u64, current: Option<u64>) -> Option<u64> {
        match self.on_access {
            Some(ttl) => Some(now.saturating_add(ttl)),
            None => current,
        }
    }
}
