//! Storage adapter contract.
//!
//! The limiter is stateless with respect to storage technology: it only
//! requires an async get/set capability, expressed by the [`Store`] trait.
//! Adapters own the records and their retention; the limiter never deletes.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::ratelimit::RateRecord;

/// A read or write failure against a storage adapter.
///
/// Constructed by adapters; carried to the caller of
/// [`crate::ratelimit::Limiter::evaluate`] without retries or fallback.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct StoreError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// A store error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// A store error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Trait for rate record storage adapters.
///
/// Implementations may be in-memory, a database or a distributed cache;
/// the limiter makes one `get` and one `set` per evaluation and assumes
/// nothing about transactions or locking. Without an adapter-side atomic
/// read-modify-write, concurrent evaluations for the same key can race
/// (see [`crate::ratelimit::Limiter::evaluate`]).
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the record for a namespaced key, if one exists.
    async fn get(&self, key: &str) -> Result<Option<RateRecord>, StoreError>;

    /// Persist the record for a namespaced key, replacing any previous one.
    async fn set(&self, key: &str, record: &RateRecord) -> Result<(), StoreError>;
}
