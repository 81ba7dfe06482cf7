//! # LogWriter — event logger
//!
//! A minimal observer that writes every [`Event`] as a structured `tracing`
//! line. Use it for demos and debugging; install a `tracing` subscriber to see
//! the output.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO fanout: subscribed broadcaster="demo" subscriber=0 registered=1
//! INFO fanout: published broadcaster="demo" accepted=2
//! INFO fanout: closed broadcaster="demo" signaled=2
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::observers::Observe;

/// Event writer observer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Observe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let broadcaster = e.broadcaster.as_deref().unwrap_or("unknown");
        match e.kind {
            EventKind::Subscribed => {
                tracing::info!(
                    target: "fanout",
                    broadcaster,
                    subscriber = e.subscriber,
                    registered = e.count,
                    "subscribed"
                );
            }
            EventKind::SubscribeRejected => {
                tracing::info!(
                    target: "fanout",
                    broadcaster,
                    reason = e.reason.as_deref(),
                    "subscribe-rejected"
                );
            }
            EventKind::SubscriberDeparted => {
                tracing::info!(
                    target: "fanout",
                    broadcaster,
                    subscriber = e.subscriber,
                    "subscriber-departed"
                );
            }
            EventKind::Published => {
                tracing::info!(target: "fanout", broadcaster, accepted = e.count, "published");
            }
            EventKind::Closed => {
                tracing::info!(target: "fanout", broadcaster, signaled = e.count, "closed");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
