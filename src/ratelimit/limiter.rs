//! Limiter facade.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::{LimiterError, Result};
use crate::store::Store;

use super::key::NamespacedKey;
use super::machine;
use super::policy::{CooldownReset, ResetStrategy};
use super::record::{Outcome, RateRecord};
use super::schedule::{DelaySchedule, DelayStrategy, FibonacciDelay};

/// Default shortest ban: 200 milliseconds.
const DEFAULT_MIN_WAIT_MS: i64 = 200;
/// Default longest ban: 24 hours.
const DEFAULT_MAX_WAIT_MS: i64 = 1000 * 60 * 60 * 24;

/// Tunables for a [`Limiter`], beyond the quota and window.
///
/// `min_wait`/`max_wait` bound the ban delay schedule; the strategies
/// plug in the schedule growth and the ban-forgiveness policy.
pub struct LimiterOptions {
    /// Shortest ban duration, seed of the delay schedule
    pub min_wait: Duration,
    /// Longest ban duration; the schedule never exceeds it
    pub max_wait: Duration,
    /// How the schedule grows from `min_wait` towards `max_wait`
    pub delay_strategy: Box<dyn DelayStrategy>,
    /// When an expired ban forgives the escalation state
    pub reset_strategy: Box<dyn ResetStrategy>,
}

impl Default for LimiterOptions {
    fn default() -> Self {
        Self {
            min_wait: Duration::milliseconds(DEFAULT_MIN_WAIT_MS),
            max_wait: Duration::milliseconds(DEFAULT_MAX_WAIT_MS),
            delay_strategy: Box::new(FibonacciDelay),
            reset_strategy: Box::new(CooldownReset),
        }
    }
}

/// Per-key admission controller with progressive banning.
///
/// Each instance owns an immutable ban delay schedule and a random
/// instance id used to namespace its keys, so several limiters can share
/// one physical store without record collisions.
pub struct Limiter {
    /// Admissions allowed per window
    tries: u32,
    /// Length of the counting window
    window: Duration,
    /// The storage adapter holding the rate records
    store: Arc<dyn Store>,
    /// Precomputed ban durations, indexed by a record's `delay`
    delays: DelaySchedule,
    /// Ban-forgiveness policy
    reset_strategy: Box<dyn ResetStrategy>,
    /// Namespace id for this instance's records
    instance: Uuid,
}

impl Limiter {
    /// Create a limiter allowing `tries` admissions per `window`.
    ///
    /// The delay schedule is built once here and shared read-only by all
    /// evaluations. Fails with [`LimiterError::Config`] on a zero quota,
    /// a non-positive window or inverted wait bounds.
    pub fn new(
        tries: u32,
        window: Duration,
        store: Arc<dyn Store>,
        options: LimiterOptions,
    ) -> Result<Self> {
        if tries == 0 {
            return Err(LimiterError::Config(
                "tries must be at least 1".to_string(),
            ));
        }
        if window <= Duration::zero() {
            return Err(LimiterError::Config(
                "window must be a positive duration".to_string(),
            ));
        }
        if options.min_wait > options.max_wait {
            return Err(LimiterError::Config(format!(
                "min_wait ({}) exceeds max_wait ({})",
                options.min_wait, options.max_wait
            )));
        }

        let delays = DelaySchedule::build(
            options.min_wait,
            options.max_wait,
            options.delay_strategy.as_ref(),
        );
        let instance = Uuid::new_v4();
        debug!(
            %instance,
            tries,
            window_ms = window.num_milliseconds(),
            schedule_len = delays.len(),
            "limiter created"
        );

        Ok(Self {
            tries,
            window,
            store,
            delays,
            reset_strategy: options.reset_strategy,
            instance,
        })
    }

    /// Create a limiter from deserialized settings, with the default
    /// strategies.
    pub fn from_settings(
        settings: &crate::config::LimiterSettings,
        store: Arc<dyn Store>,
    ) -> Result<Self> {
        Self::new(
            settings.tries,
            duration_from_ms(settings.window_ms, "window_ms")?,
            store,
            LimiterOptions {
                min_wait: duration_from_ms(settings.min_wait_ms, "min_wait_ms")?,
                max_wait: duration_from_ms(settings.max_wait_ms, "max_wait_ms")?,
                ..LimiterOptions::default()
            },
        )
    }

    /// Admissions allowed per window.
    pub fn tries(&self) -> u32 {
        self.tries
    }

    /// Length of the counting window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// The ban delay schedule built at construction.
    pub fn delays(&self) -> &DelaySchedule {
        &self.delays
    }

    /// Evaluate one request for `key` at the current time.
    ///
    /// Loads the key's record, runs the admission state machine, persists
    /// the updated record, and only then reports the outcome. A denial is
    /// a regular [`Outcome::Denied`]; errors are reserved for store
    /// failures, which abort the decision.
    ///
    /// There is no mutual exclusion between the read and the write:
    /// concurrent evaluations for the same key can both observe the same
    /// stored record and over-admit. Adapters that need strictness under
    /// concurrency must provide their own atomic read-modify-write.
    pub async fn evaluate(&self, key: &str) -> Result<Outcome> {
        self.evaluate_at(key, Utc::now()).await
    }

    /// Evaluate one request for `key` at an explicit instant.
    ///
    /// Same path as [`Limiter::evaluate`] with the clock supplied by the
    /// caller; useful for deterministic tests and for hosts that already
    /// hold a request timestamp.
    pub async fn evaluate_at(&self, key: &str, now: DateTime<Utc>) -> Result<Outcome> {
        let namespaced = NamespacedKey::new(self.instance, key).to_string_key();

        trace!(key = %namespaced, "evaluating admission");
        let existing = self.store.get(&namespaced).await?;

        let outcome = machine::decide(
            existing,
            key,
            now,
            self.tries,
            self.window,
            &self.delays,
            self.reset_strategy.as_ref(),
        );

        self.store.set(&namespaced, outcome.record()).await?;

        if !outcome.is_admitted() {
            debug!(
                key = %namespaced,
                banned_times = outcome.record().banned_times,
                "request denied"
            );
        }

        Ok(outcome)
    }

    /// Force `key` back to its unseen state, discarding any existing
    /// record and ban. The next evaluation for the key performs the
    /// first-contact admission. Used for manual unbanning and tests.
    pub async fn reset(&self, key: &str) -> Result<RateRecord> {
        let namespaced = NamespacedKey::new(self.instance, key).to_string_key();
        let record = RateRecord::unseen(key, self.tries, self.window, Utc::now());

        self.store.set(&namespaced, &record).await?;
        debug!(key = %namespaced, "record reset");
        Ok(record)
    }
}

/// Convert a millisecond settings field to a duration, rejecting values
/// that do not fit a signed duration instead of wrapping.
fn duration_from_ms(ms: u64, field: &str) -> Result<Duration> {
    let ms: i64 = ms
        .try_into()
        .map_err(|_| LimiterError::Config(format!("{} out of range: {}", field, ms)))?;
    Ok(Duration::milliseconds(ms))
}
