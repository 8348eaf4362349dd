//! Admission state machine.
//!
//! Pure decision logic: given the stored record for a key (or its absence)
//! and the current time, produce the next record and an admit/deny outcome.
//! The state machine owns no I/O; loading and persisting records is the
//! facade's job, which keeps every transition testable without a store.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::policy::ResetStrategy;
use super::record::{Outcome, RateRecord};
use super::schedule::DelaySchedule;

/// Evaluate one request against the key's stored state.
///
/// Transitions, in precedence order:
/// 1. no record: first contact, admitted with a fresh window;
/// 2. an unexpired ban: denied, only the total count advances;
/// 3. an expired ban: admitted, ban cleared, escalation state kept or
///    forgiven per the reset policy;
/// 4. no ban: admitted while quota or a window restart allows it,
///    otherwise banned with the next scheduled delay.
///
/// The request that brings `remain` to zero is still admitted; only the
/// request after that triggers the ban, so `tries` admissions fit in a
/// window before the first denial.
pub fn decide(
    existing: Option<RateRecord>,
    key: &str,
    now: DateTime<Utc>,
    tries: u32,
    window: Duration,
    schedule: &DelaySchedule,
    reset_strategy: &dyn ResetStrategy,
) -> Outcome {
    let Some(mut record) = existing else {
        return Outcome::Admitted(RateRecord::first_contact(key, tries, window, now));
    };

    record.count += 1;

    match record.banned_until {
        // Still serving a ban.
        Some(until) if until > now => Outcome::Denied(record),

        // Ban expired; readmit, and maybe forgive the escalation state.
        Some(_) => {
            let time_banned = schedule.get(record.delay);
            if reset_strategy.should_reset(&record, time_banned, now) {
                debug!(key = %record.key, "ban history reset");
                record.banned_times = 0;
                record.delay = 0;
            }
            record.banned_until = None;
            record.remain = tries.saturating_sub(1);
            record.last_valid_request = now;
            record.next_count_restart = now + window;
            Outcome::Admitted(record)
        }

        // Not banned.
        None => {
            if record.remain == 0 && now < record.next_count_restart {
                // Quota exhausted inside a live window: ban.
                record.last_ban = Some(now);
                record.banned_times += 1;
                record.banned_until = Some(now + schedule.get(record.delay));
                record.delay += 1;
                debug!(
                    key = %record.key,
                    banned_times = record.banned_times,
                    banned_until = %record.banned_until.unwrap_or(now),
                    "key banned"
                );
                Outcome::Denied(record)
            } else if now > record.next_count_restart {
                // Window expired; the quota resets naturally.
                record.remain = tries.saturating_sub(1);
                record.next_count_restart = now + window;
                record.last_valid_request = now;
                Outcome::Admitted(record)
            } else {
                record.remain = record.remain.saturating_sub(1);
                record.last_valid_request = now;
                Outcome::Admitted(record)
            }
        }
    }
}
