//! Error types for the limiter.

use thiserror::Error;

use crate::store::StoreError;

/// Failures surfaced by limiter operations.
///
/// A denied request is not an error; it is carried as
/// [`crate::ratelimit::Outcome::Denied`]. This type covers real failures
/// only.
#[derive(Error, Debug)]
pub enum LimiterError {
    /// Construction-time misconfiguration: zero quota, non-positive
    /// window, inverted wait bounds, unparseable settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// A read or write against the storage adapter failed; the decision
    /// was aborted and no record mutation should be assumed committed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for limiter operations.
pub type Result<T> = std::result::Result<T, LimiterError>;
