//! # Subscriber-facing receive handle.
//!
//! A [`Subscription`] yields every value published while it is registered, in
//! publish order, and then end-of-stream once the broadcaster is closed. It can
//! be drained with [`Subscription::recv`] or consumed as a [`Stream`].
//!
//! Receiving acknowledges the value, which is what releases the publisher.
//! Values whose publisher gave up before the handoff completed are skipped.

use std::fmt;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use super::endpoint::Delivery;
use crate::error::TryRecvError;

/// Receive-only handle returned by [`Broadcaster::subscribe`](crate::Broadcaster::subscribe).
///
/// Dropping it detaches the subscriber: the broadcaster skips it on later
/// publishes and prunes it on the next subscribe.
pub struct Subscription<T> {
    id: u64,
    rx: mpsc::Receiver<Delivery<T>>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(id: u64, rx: mpsc::Receiver<Delivery<T>>) -> Self {
        Self { id, rx }
    }

    /// Returns the subscriber id (assigned in registration order, starting at 0).
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Waits for the next value.
    ///
    /// Returns `None` once the broadcaster has been closed, and keeps returning
    /// `None` on later calls.
    ///
    /// Cancel safe: if the future is dropped before completion, no value is lost.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            let delivery = self.rx.recv().await?;
            if let Some(value) = delivery.accept() {
                return Some(value);
            }
        }
    }

    /// Takes a value if a publisher is currently waiting on this subscriber.
    pub fn try_recv(&mut self) -> Result<T, TryRecvError> {
        loop {
            match self.rx.try_recv() {
                Ok(delivery) => {
                    if let Some(value) = delivery.accept() {
                        return Ok(value);
                    }
                }
                Err(mpsc::error::TryRecvError::Empty) => return Err(TryRecvError::Empty),
                Err(mpsc::error::TryRecvError::Disconnected) => return Err(TryRecvError::Closed),
            }
        }
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        loop {
            match ready!(self.rx.poll_recv(cx)) {
                Some(delivery) => {
                    if let Some(value) = delivery.accept() {
                        return Poll::Ready(Some(value));
                    }
                }
                None => return Poll::Ready(None),
            }
        }
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
