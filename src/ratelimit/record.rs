//! Per-key rate record and evaluation outcome.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The persisted admission state for one namespaced key.
///
/// Records are owned by the storage adapter; the limiter only borrows one
/// for the duration of a single evaluation. A record is created on first
/// contact and updated on every call after that, never deleted by the
/// limiter itself (retention is a store concern).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    /// The original caller key, before namespacing
    pub key: String,
    /// Total requests ever seen for this key
    pub count: u64,
    /// Admissions left in the current window
    pub remain: u32,
    /// When the current window's quota resets
    pub next_count_restart: DateTime<Utc>,
    /// Time of the last admitted request
    pub last_valid_request: DateTime<Utc>,
    /// Index into the delay schedule, advances on each new ban
    pub delay: usize,
    /// Cumulative number of bans issued
    pub banned_times: u32,
    /// Time of the most recent ban
    pub last_ban: Option<DateTime<Utc>>,
    /// End of the current ban; `None` means the key is not banned
    pub banned_until: Option<DateTime<Utc>>,
}

impl RateRecord {
    /// Create the record for a key's first contact: one request seen,
    /// a fresh window, no ban history.
    pub fn first_contact(key: &str, tries: u32, window: Duration, now: DateTime<Utc>) -> Self {
        Self {
            key: key.to_string(),
            count: 1,
            remain: tries.saturating_sub(1),
            next_count_restart: now + window,
            last_valid_request: now,
            delay: 0,
            banned_times: 0,
            last_ban: None,
            banned_until: None,
        }
    }

    /// Create the marker record for a key forced back to its unseen
    /// state: nothing counted, full quota, no ban history. The next
    /// evaluation consumes it as the first admission, so a reset key
    /// behaves exactly like one never seen before.
    pub fn unseen(key: &str, tries: u32, window: Duration, now: DateTime<Utc>) -> Self {
        Self {
            key: key.to_string(),
            count: 0,
            remain: tries,
            next_count_restart: now + window,
            last_valid_request: now,
            delay: 0,
            banned_times: 0,
            last_ban: None,
            banned_until: None,
        }
    }

    /// Whether the key is serving a ban at the given instant.
    pub fn is_banned_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.banned_until, Some(until) if until > now)
    }
}

/// Result of one admission evaluation.
///
/// A denial is an expected outcome and carries the full record (including
/// ban metadata), so it lives here rather than in the error channel.
/// [`crate::error::LimiterError`] is reserved for real failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The request is admitted; the record reflects the consumed quota.
    Admitted(RateRecord),
    /// The request is denied; the record carries the current ban.
    Denied(RateRecord),
}

impl Outcome {
    /// Borrow the record regardless of the decision.
    pub fn record(&self) -> &RateRecord {
        match self {
            Outcome::Admitted(record) | Outcome::Denied(record) => record,
        }
    }

    /// Consume the outcome, keeping the record.
    pub fn into_record(self) -> RateRecord {
        match self {
            Outcome::Admitted(record) | Outcome::Denied(record) => record,
        }
    }

    /// Whether the request was admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Outcome::Admitted(_))
    }
}
