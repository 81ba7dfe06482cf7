//! # Events emitted by a broadcaster.
//!
//! The [`EventKind`] enum classifies events into two groups:
//! - **Registry events**: a subscriber was added, refused or found gone
//! - **Delivery events**: a value was broadcast, the broadcaster closed
//!
//! The [`Event`] struct carries metadata such as the broadcaster name, the
//! subscriber id and delivery counts.
//!
//! ## Ordering guarantees
//! Each event has a process-wide sequence number (`seq`) that increases monotonically.
//! Observers run on separate workers, so use `seq` to restore the emission order.
//!
//! ## Example
//! ```rust
//! use fanout::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::Published)
//!     .with_broadcaster("prices")
//!     .with_count(3);
//!
//! assert_eq!(ev.kind, EventKind::Published);
//! assert_eq!(ev.broadcaster.as_deref(), Some("prices"));
//! assert_eq!(ev.count, Some(3));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of broadcaster events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Registry events ===
    /// A new subscriber was registered.
    ///
    /// Sets:
    /// - `broadcaster`: broadcaster name
    /// - `subscriber`: subscriber id
    /// - `count`: registered subscribers after the insert
    Subscribed,

    /// A subscribe call was refused.
    ///
    /// Sets:
    /// - `broadcaster`: broadcaster name
    /// - `reason`: error label (e.g. `subscriber_limit_reached`)
    SubscribeRejected,

    /// A subscriber dropped its handle; it is skipped from now on.
    ///
    /// Emitted once per subscriber.
    ///
    /// Sets:
    /// - `broadcaster`: broadcaster name
    /// - `subscriber`: subscriber id
    SubscriberDeparted,

    // === Delivery events ===
    /// A value was handed to every registered subscriber.
    ///
    /// Sets:
    /// - `broadcaster`: broadcaster name
    /// - `count`: subscribers that accepted the value
    Published,

    /// End-of-stream was signaled to every subscriber.
    ///
    /// The last event an observer receives.
    ///
    /// Sets:
    /// - `broadcaster`: broadcaster name
    /// - `count`: subscribers that were signaled
    Closed,
}

impl EventKind {
    /// Returns a short stable label (kebab-case) for log lines.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::Subscribed => "subscribed",
            EventKind::SubscribeRejected => "subscribe-rejected",
            EventKind::SubscriberDeparted => "subscriber-departed",
            EventKind::Published => "published",
            EventKind::Closed => "closed",
        }
    }
}

/// Broadcaster event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the emitting broadcaster.
    pub broadcaster: Option<Arc<str>>,
    /// Subscriber id, if the event concerns one subscriber.
    pub subscriber: Option<u64>,
    /// Subscriber count (registered, accepted or signaled, per kind).
    pub count: Option<usize>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            broadcaster: None,
            subscriber: None,
            count: None,
            reason: None,
        }
    }

    /// Attaches the broadcaster name.
    #[inline]
    pub fn with_broadcaster(mut self, name: impl Into<Arc<str>>) -> Self {
        self.broadcaster = Some(name.into());
        self
    }

    /// Attaches a subscriber id.
    #[inline]
    pub fn with_subscriber(mut self, id: u64) -> Self {
        self.subscriber = Some(id);
        self
    }

    /// Attaches a subscriber count.
    #[inline]
    pub fn with_count(mut self, n: usize) -> Self {
        self.count = Some(n);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Returns `true` for the last event a broadcaster emits ([`EventKind::Closed`]).
    ///
    /// Observers can use it to flush buffered state.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, EventKind::Closed)
    }
}
