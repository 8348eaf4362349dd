//! HTTP-facing helpers.
//!
//! The limiter core knows nothing about any web framework; this module
//! holds the pieces a host needs to wire it into one: the conventional
//! rate-limit response headers, the seams the host implements
//! ([`KeyResolver`], [`LimitHandler`]) and [`Gate`], the
//! framework-independent middleware core.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::ratelimit::{Limiter, Outcome, RateRecord};

/// Header carrying the per-window quota.
pub const LIMIT_HEADER: &str = "X-RateLimit-Limit";
/// Header carrying the admissions left in the current window.
pub const REMAINING_HEADER: &str = "X-RateLimit-Remaining";
/// Header carrying the next reset instant (window restart, or ban end
/// when denied), as epoch milliseconds.
pub const RESET_HEADER: &str = "X-RateLimit-Reset";

/// The rate-limit header values for one evaluation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// Quota per window
    pub limit: u32,
    /// Admissions left
    pub remaining: u32,
    /// When the client may expect the state to change
    pub reset: DateTime<Utc>,
}

impl RateLimitHeaders {
    /// Map an outcome to header values.
    ///
    /// Admitted outcomes expose the window restart; denied outcomes
    /// expose the ban end.
    pub fn for_outcome(limit: u32, outcome: &Outcome) -> Self {
        let record = outcome.record();
        let reset = match outcome {
            Outcome::Admitted(_) => record.next_count_restart,
            Outcome::Denied(_) => record.banned_until.unwrap_or(record.next_count_restart),
        };

        Self {
            limit,
            remaining: record.remain,
            reset,
        }
    }

    /// Render as `(header name, value)` pairs, the reset instant as
    /// epoch milliseconds.
    pub fn to_pairs(&self) -> [(&'static str, String); 3] {
        [
            (LIMIT_HEADER, self.limit.to_string()),
            (REMAINING_HEADER, self.remaining.to_string()),
            (RESET_HEADER, self.reset.timestamp_millis().to_string()),
        ]
    }
}

/// Derives the rate-limit key from a host request.
///
/// Supplied by the host: typically the client address, an API token or a
/// tenant id.
#[async_trait]
pub trait KeyResolver<R>: Send + Sync {
    /// Yield the rate-limit key for this request.
    async fn resolve_key(&self, request: &R) -> Result<String>;
}

/// Invoked when a request is denied.
///
/// Supplied by the host; receives the denial record so it can shape the
/// response (status code, retry hints, audit log).
#[async_trait]
pub trait LimitHandler<R>: Send + Sync {
    /// React to a denial for this request.
    async fn on_denied(&self, request: &R, record: &RateRecord);
}

/// What [`Gate::check`] hands back to the host.
#[derive(Debug, Clone)]
pub struct GateResult {
    /// The admission decision with its record
    pub outcome: Outcome,
    /// Ready-made header values for the response
    pub headers: RateLimitHeaders,
}

/// Framework-independent middleware core.
///
/// Resolves the key, evaluates it, notifies the [`LimitHandler`] on a
/// denial and returns the outcome together with the response headers.
/// A concrete middleware for any web framework reduces to calling
/// [`Gate::check`] and translating the result.
pub struct Gate<R> {
    limiter: Limiter,
    resolver: Box<dyn KeyResolver<R>>,
    handler: Box<dyn LimitHandler<R>>,
}

impl<R: Send + Sync> Gate<R> {
    /// Assemble a gate from a limiter and the host-side seams.
    pub fn new(
        limiter: Limiter,
        resolver: Box<dyn KeyResolver<R>>,
        handler: Box<dyn LimitHandler<R>>,
    ) -> Self {
        Self {
            limiter,
            resolver,
            handler,
        }
    }

    /// The wrapped limiter.
    pub fn limiter(&self) -> &Limiter {
        &self.limiter
    }

    /// Run one request through the limiter.
    ///
    /// Resolver and store failures surface as errors; a denial is a
    /// normal result, delivered to the handler before returning.
    pub async fn check(&self, request: &R) -> Result<GateResult> {
        let key = self.resolver.resolve_key(request).await?;
        let outcome = self.limiter.evaluate(&key).await?;
        let headers = RateLimitHeaders::for_outcome(self.limiter.tries(), &outcome);

        if let Outcome::Denied(record) = &outcome {
            self.handler.on_denied(request, record).await;
        }

        Ok(GateResult { outcome, headers })
    }
}
