//! Rate limiting logic and state management.

mod key;
mod limiter;
mod machine;
mod policy;
mod record;
mod schedule;

pub use key::NamespacedKey;
pub use limiter::{Limiter, LimiterOptions};
pub use policy::{CooldownReset, ResetStrategy};
pub use record::{Outcome, RateRecord};
pub use schedule::{DelaySchedule, DelayStrategy, FibonacciDelay};
