//! Ban delay schedule construction.

use chrono::Duration;

/// Hard cap on schedule length, so a non-converging strategy still
/// terminates the build loop.
const MAX_SCHEDULE_LEN: usize = 100;

/// Strategy for growing the ban delay schedule.
///
/// Given the delays produced so far, the current iteration index and the
/// configured bounds, produce the next ban duration. Returning `None`
/// stops the build.
pub trait DelayStrategy: Send + Sync {
    /// Compute the next delay, or `None` to end the schedule.
    fn next_delay(
        &self,
        so_far: &[Duration],
        index: usize,
        min: Duration,
        max: Duration,
    ) -> Option<Duration>;
}

/// Default growth strategy: each delay is the sum of the previous two
/// (the second-to-last counting as zero while the schedule is short).
///
/// With `min = 1s` and `max = 8s` this yields
/// `[1s, 1s, 2s, 3s, 5s, 8s]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FibonacciDelay;

impl DelayStrategy for FibonacciDelay {
    fn next_delay(
        &self,
        so_far: &[Duration],
        _index: usize,
        _min: Duration,
        _max: Duration,
    ) -> Option<Duration> {
        let last = *so_far.last()?;
        let second_to_last = if so_far.len() > 1 {
            so_far[so_far.len() - 2]
        } else {
            Duration::zero()
        };
        Some(last + second_to_last)
    }
}

/// An ordered, immutable sequence of ban durations.
///
/// Built once at limiter construction and shared read-only by all
/// evaluations on that instance. Index `n` is the penalty applied for a
/// key's `(n+1)`th ban; indices past the end clamp to the last entry
/// ("max penalty reached").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelaySchedule {
    delays: Vec<Duration>,
}

impl DelaySchedule {
    /// Build a schedule from the given bounds and growth strategy.
    ///
    /// The schedule is seeded with `min`; the strategy is then invoked
    /// repeatedly, stopping when it yields `None`, a value above `max`,
    /// a negative duration, or when the length cap is reached.
    pub fn build(min: Duration, max: Duration, strategy: &dyn DelayStrategy) -> Self {
        let mut delays = vec![min];

        for index in 1..MAX_SCHEDULE_LEN {
            match strategy.next_delay(&delays, index, min, max) {
                Some(next) if next >= Duration::zero() && next <= max => delays.push(next),
                _ => break,
            }
        }

        Self { delays }
    }

    /// The delay at `index`, clamped to the last entry.
    pub fn get(&self, index: usize) -> Duration {
        self.delays[index.min(self.delays.len() - 1)]
    }

    /// Number of entries in the schedule. Always at least one.
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    /// A schedule is never empty; this exists for completeness.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The full schedule as a slice.
    pub fn as_slice(&self) -> &[Duration] {
        &self.delays
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(values: &[i64]) -> Vec<Duration> {
        values.iter().map(|&v| Duration::milliseconds(v)).collect()
    }

    #[test]
    fn test_default_strategy_schedule() {
        let schedule = DelaySchedule::build(
            Duration::milliseconds(1000),
            Duration::milliseconds(8000),
            &FibonacciDelay,
        );

        assert_eq!(
            schedule.as_slice(),
            millis(&[1000, 1000, 2000, 3000, 5000, 8000]).as_slice()
        );
    }

    #[test]
    fn test_constant_strategy_hits_length_cap() {
        struct SameDelay;
        impl DelayStrategy for SameDelay {
            fn next_delay(
                &self,
                so_far: &[Duration],
                _index: usize,
                _min: Duration,
                _max: Duration,
            ) -> Option<Duration> {
                so_far.last().copied()
            }
        }

        let schedule = DelaySchedule::build(
            Duration::milliseconds(1000),
            Duration::milliseconds(8000),
            &SameDelay,
        );

        assert_eq!(schedule.len(), 100);
        assert!(schedule
            .as_slice()
            .iter()
            .all(|&d| d == Duration::milliseconds(1000)));
    }

    #[test]
    fn test_doubling_strategy_schedule() {
        struct DoubleDelay;
        impl DelayStrategy for DoubleDelay {
            fn next_delay(
                &self,
                so_far: &[Duration],
                _index: usize,
                _min: Duration,
                _max: Duration,
            ) -> Option<Duration> {
                so_far.last().map(|&d| d * 2)
            }
        }

        let schedule = DelaySchedule::build(
            Duration::milliseconds(1000),
            Duration::milliseconds(8000),
            &DoubleDelay,
        );

        assert_eq!(
            schedule.as_slice(),
            millis(&[1000, 2000, 4000, 8000]).as_slice()
        );
    }

    #[test]
    fn test_schedule_is_non_decreasing() {
        let schedule = DelaySchedule::build(
            Duration::milliseconds(500),
            Duration::hours(24),
            &FibonacciDelay,
        );

        for pair in schedule.as_slice().windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert!(*schedule.as_slice().last().unwrap() <= Duration::hours(24));
        assert!(schedule.len() <= 100);
    }

    #[test]
    fn test_strategy_returning_none_stops_build() {
        struct StopImmediately;
        impl DelayStrategy for StopImmediately {
            fn next_delay(
                &self,
                _so_far: &[Duration],
                _index: usize,
                _min: Duration,
                _max: Duration,
            ) -> Option<Duration> {
                None
            }
        }

        let schedule = DelaySchedule::build(
            Duration::milliseconds(1000),
            Duration::milliseconds(8000),
            &StopImmediately,
        );

        assert_eq!(schedule.as_slice(), millis(&[1000]).as_slice());
    }

    #[test]
    fn test_negative_delay_stops_build() {
        struct NegativeDelay;
        impl DelayStrategy for NegativeDelay {
            fn next_delay(
                &self,
                _so_far: &[Duration],
                _index: usize,
                _min: Duration,
                _max: Duration,
            ) -> Option<Duration> {
                Some(Duration::milliseconds(-1))
            }
        }

        let schedule = DelaySchedule::build(
            Duration::milliseconds(1000),
            Duration::milliseconds(8000),
            &NegativeDelay,
        );

        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn test_get_clamps_past_the_end() {
        let schedule = DelaySchedule::build(
            Duration::milliseconds(1000),
            Duration::milliseconds(8000),
            &FibonacciDelay,
        );

        assert_eq!(schedule.get(0), Duration::milliseconds(1000));
        assert_eq!(schedule.get(5), Duration::milliseconds(8000));
        assert_eq!(schedule.get(6), Duration::milliseconds(8000));
        assert_eq!(schedule.get(1000), Duration::milliseconds(8000));
    }
}
