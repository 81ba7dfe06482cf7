//! # Rendezvous endpoint: the broadcaster-owned sending half of a subscription.
//!
//! Each subscription is backed by a capacity-1 `mpsc` channel whose items carry
//! a oneshot acknowledgement. [`Endpoint::deliver`] resolves only after the
//! consumer has taken the value out, which makes the handoff zero-capacity from
//! the publisher's point of view.
//!
//! ```text
//! Broadcaster ── Endpoint::deliver(v) ──► [slot: Delivery{v, ack}] ──► Subscription::recv()
//!       ▲                                                                   │
//!       └──────────────────────────── ack ◄─────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Only the broadcaster holds an [`Endpoint`]; the sender is never cloned.
//! - Dropping the [`Endpoint`] is the end-of-stream signal, so it can happen once.
//! - A dropped [`Subscription`] turns every later delivery into [`Handoff::Departed`].
//! - A value counts as delivered only when the ack reaches a publisher that is
//!   still waiting. If `deliver` is dropped first, the consumer discards the
//!   value left in the slot.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, oneshot};

use super::subscription::Subscription;

/// A value in flight together with its acknowledgement.
pub(crate) struct Delivery<T> {
    value: T,
    ack: oneshot::Sender<()>,
}

impl<T> Delivery<T> {
    /// Acknowledges receipt to the publisher and yields the value.
    ///
    /// Returns `None` if the publisher stopped waiting (its future was dropped):
    /// an abandoned handoff is discarded, never delivered.
    #[inline]
    pub(crate) fn accept(self) -> Option<T> {
        self.ack.send(()).ok().map(|()| self.value)
    }
}

/// Outcome of a single handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handoff {
    /// The consumer took the value.
    Accepted,
    /// The consumer dropped its subscription.
    Departed,
}

/// Broadcaster-side half of a subscription.
pub(crate) struct Endpoint<T> {
    id: u64,
    tx: mpsc::Sender<Delivery<T>>,
    departed: AtomicBool,
}

impl<T> Endpoint<T> {
    /// Creates a connected endpoint/subscription pair.
    pub(crate) fn pair(id: u64) -> (Self, Subscription<T>) {
        let (tx, rx) = mpsc::channel(1);
        let endpoint = Self {
            id,
            tx,
            departed: AtomicBool::new(false),
        };
        (endpoint, Subscription::new(id, rx))
    }

    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Hands `value` to the consumer and waits until it has been received.
    ///
    /// Has no timeout: a consumer that never calls `recv` stalls the caller.
    pub(crate) async fn deliver(&self, value: T) -> Handoff {
        let (ack, acked) = oneshot::channel();
        if self.tx.send(Delivery { value, ack }).await.is_err() {
            return Handoff::Departed;
        }
        // The ack sender is dropped unread if the subscription goes away with
        // the value still in the slot.
        match acked.await {
            Ok(()) => Handoff::Accepted,
            Err(_) => Handoff::Departed,
        }
    }

    /// Returns `true` once the consumer side is gone.
    #[inline]
    pub(crate) fn is_departed(&self) -> bool {
        self.departed.load(Ordering::Acquire) || self.tx.is_closed()
    }

    /// Records departure; returns `true` only for the first caller.
    #[inline]
    pub(crate) fn mark_departed(&self) -> bool {
        !self.departed.swap(true, Ordering::AcqRel)
    }
}
