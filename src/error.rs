//! Error types used by the fallible broadcaster and subscription APIs.
//!
//! This module defines two enums:
//!
//! - [`BroadcastError`] — why a `try_subscribe`/`try_publish` call was refused.
//! - [`TryRecvError`] — why a non-blocking receive returned no value.
//!
//! The plain operations (`subscribe`, `publish`, `close`, `recv`) never return
//! these; they model refusal as `None` or a silent no-op.

use thiserror::Error;

/// # Errors produced by the broadcaster.
///
/// Both variants are terminal for the call that produced them; nothing is retried
/// internally.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastError {
    /// The broadcaster was closed; no further subscriptions or publications are accepted.
    #[error("broadcaster is closed")]
    Closed,

    /// The configured subscriber limit has been reached.
    #[error("subscriber limit {limit} reached")]
    LimitReached {
        /// The configured maximum number of live subscribers.
        limit: usize,
    },
}

impl BroadcastError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fanout::BroadcastError;
    ///
    /// assert_eq!(BroadcastError::Closed.as_label(), "broadcaster_closed");
    /// assert_eq!(
    ///     BroadcastError::LimitReached { limit: 4 }.as_label(),
    ///     "subscriber_limit_reached"
    /// );
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BroadcastError::Closed => "broadcaster_closed",
            BroadcastError::LimitReached { .. } => "subscriber_limit_reached",
        }
    }

    /// Returns `true` if the broadcaster will never accept the operation again.
    ///
    /// A limit refusal may succeed later once departed subscribers are pruned.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BroadcastError::Closed)
    }
}

/// # Errors produced by [`Subscription::try_recv`](crate::Subscription::try_recv).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryRecvError {
    /// No value is waiting right now; the stream is still open.
    #[error("no value available")]
    Empty,

    /// End-of-stream: the broadcaster was closed.
    #[error("subscription closed")]
    Closed,
}
