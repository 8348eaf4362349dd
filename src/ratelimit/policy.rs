//! Ban reset policy.

use chrono::{DateTime, Duration, Utc};

use super::record::RateRecord;

/// Policy deciding whether a key's ban history is forgiven once its
/// current ban expires.
///
/// Evaluated at the ban-expiry transition. Returning `true` resets
/// `banned_times` and the delay index to zero; returning `false` keeps
/// both, so the next ban escalates further up the schedule.
pub trait ResetStrategy: Send + Sync {
    /// Decide whether the offender is considered reformed.
    ///
    /// `time_banned` is the schedule delay that was applied for the ban
    /// that just expired.
    fn should_reset(&self, record: &RateRecord, time_banned: Duration, now: DateTime<Utc>) -> bool;
}

/// Default reset policy: the ban history is forgiven once a cooldown of
/// `banned_times * time_banned` has passed beyond the ban's end.
///
/// A key banned many times therefore needs a proportionally longer quiet
/// period before its escalation state clears.
#[derive(Debug, Clone, Copy, Default)]
pub struct CooldownReset;

impl ResetStrategy for CooldownReset {
    fn should_reset(&self, record: &RateRecord, time_banned: Duration, now: DateTime<Utc>) -> bool {
        match record.banned_until {
            Some(until) => until + time_banned * (record.banned_times as i32) < now,
            None => true,
        }
    }
}
