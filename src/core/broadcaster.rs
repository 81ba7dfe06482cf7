//! # Broadcaster: subscriber registry plus rendezvous fan-out.
//!
//! [`Broadcaster`] owns one [`Endpoint`] per subscription and a closed flag,
//! both behind a single `tokio::sync::RwLock`.
//!
//! ## Locking
//! ```text
//! subscribe() ── write ──► prune departed, push endpoint
//! publish(v)  ── read ───► for ep in endpoints: ep.deliver(v.clone()).await
//! close()     ── write ──► drain endpoints (drop = end-of-stream), closed = true
//! ```
//!
//! ## Rules
//! - `publish` holds the read guard for its whole delivery loop, so a subscriber
//!   registered mid-publish never sees a partial broadcast, and `close` cannot
//!   start while a delivery is in flight.
//! - `close` returns only after every in-flight `publish` has finished or been
//!   dropped; no value is delivered after `close` resolves.
//! - A dropped `publish` future withdraws the value it was handing over; the
//!   subscriber discards it from its slot instead of receiving it later.
//! - Each endpoint is dropped exactly once, by the first `close`.
//! - Consumers must not call `subscribe`/`close` while a publish is waiting on
//!   them: the write lock queues behind the publisher's read guard.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use super::builder::BroadcasterBuilder;
use super::config::Config;
use super::endpoint::{Endpoint, Handoff};
use super::subscription::Subscription;
use crate::error::BroadcastError;
use crate::events::{Event, EventKind};
use crate::observers::ObserverSet;

/// State guarded by the broadcaster's lock.
struct State<T> {
    endpoints: Vec<Endpoint<T>>,
    closed: bool,
    observers: Option<ObserverSet>,
}

impl<T> State<T> {
    fn emit(&self, event: impl FnOnce() -> Event) {
        if let Some(set) = &self.observers {
            set.emit(event());
        }
    }
}

/// Single-publisher, many-subscriber broadcast primitive.
///
/// Every subscriber receives each value published while it is registered, in
/// publish order, then end-of-stream once the broadcaster is closed.
///
/// ### Properties
/// - **Rendezvous delivery**: `publish` resolves only after every subscriber took the value.
/// - **Close once**: repeated `close` calls are no-ops.
/// - **Value-level refusal**: after close, `subscribe` yields `None` and `publish` does nothing.
///
/// ### Example
/// ```rust
/// use fanout::Broadcaster;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let b = Broadcaster::<u32>::new();
/// let mut sub = b.subscribe().await.expect("open");
///
/// let reader = tokio::spawn(async move {
///     let mut got = Vec::new();
///     while let Some(v) = sub.recv().await {
///         got.push(v);
///     }
///     got
/// });
///
/// b.publish(1).await;
/// b.publish(2).await;
/// b.close().await;
///
/// assert_eq!(reader.await.unwrap(), vec![1, 2]);
/// assert!(b.subscribe().await.is_none());
/// # }
/// ```
pub struct Broadcaster<T> {
    name: Arc<str>,
    limit: Option<usize>,
    next_id: AtomicU64,
    state: RwLock<State<T>>,
}

impl<T> Broadcaster<T>
where
    T: Clone + Send + 'static,
{
    /// Creates an open broadcaster with the default configuration and no observers.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an open broadcaster with the given configuration and no observers.
    pub fn with_config(cfg: Config) -> Self {
        Self::new_internal(cfg, None)
    }

    /// Returns a builder for attaching observers.
    pub fn builder(cfg: Config) -> BroadcasterBuilder<T> {
        BroadcasterBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, observers: Option<ObserverSet>) -> Self {
        Self {
            limit: cfg.subscriber_limit(),
            name: Arc::from(cfg.name),
            next_id: AtomicU64::new(0),
            state: RwLock::new(State {
                endpoints: Vec::new(),
                closed: false,
                observers,
            }),
        }
    }

    /// Returns the configured broadcaster name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a new subscriber.
    ///
    /// Returns `None` if the broadcaster is closed.
    ///
    /// With [`Config::max_subscribers`] set, `None` is also returned while the
    /// broadcaster is still open and the limit is reached, so `None` alone does
    /// not mean "closed". Use [`try_subscribe`](Self::try_subscribe) to tell
    /// [`BroadcastError::Closed`] from [`BroadcastError::LimitReached`].
    pub async fn subscribe(&self) -> Option<Subscription<T>> {
        self.try_subscribe().await.ok()
    }

    /// Registers a new subscriber, reporting why registration was refused.
    ///
    /// Departed subscribers are pruned first, so they never count toward the limit.
    pub async fn try_subscribe(&self) -> Result<Subscription<T>, BroadcastError> {
        let mut state = self.state.write().await;

        if state.closed {
            tracing::debug!(broadcaster = %self.name, "subscribe after close refused");
            return Err(BroadcastError::Closed);
        }

        self.prune_departed(&mut state);

        if let Some(limit) = self.limit {
            if state.endpoints.len() >= limit {
                let err = BroadcastError::LimitReached { limit };
                state.emit(|| {
                    Event::new(EventKind::SubscribeRejected)
                        .with_broadcaster(self.name.clone())
                        .with_reason(err.as_label())
                });
                return Err(err);
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (endpoint, subscription) = Endpoint::pair(id);
        state.endpoints.push(endpoint);

        let registered = state.endpoints.len();
        state.emit(|| {
            Event::new(EventKind::Subscribed)
                .with_broadcaster(self.name.clone())
                .with_subscriber(id)
                .with_count(registered)
        });
        tracing::trace!(broadcaster = %self.name, subscriber = id, "subscribed");

        Ok(subscription)
    }

    /// Broadcasts `value` to every registered subscriber.
    ///
    /// A no-op once the broadcaster is closed.
    ///
    /// # Cancel safety
    /// Not atomic under cancellation. If the future is dropped (for example by
    /// `tokio::time::timeout` or `select!`), subscribers that already took the
    /// value keep it, the subscriber currently being handed the value never
    /// receives it, and later subscribers are not visited.
    pub async fn publish(&self, value: T) {
        let _ = self.try_publish(value).await;
    }

    /// Broadcasts `value`, returning how many subscribers accepted it.
    ///
    /// Subscribers are visited in registration order; each handoff completes
    /// before the next begins. Departed subscribers are skipped.
    ///
    /// # Cancel safety
    /// Same as [`publish`](Self::publish): dropping the future stops the
    /// broadcast where it is and withdraws the pending handoff.
    pub async fn try_publish(&self, value: T) -> Result<usize, BroadcastError> {
        let state = self.state.read().await;

        if state.closed {
            tracing::trace!(broadcaster = %self.name, "publish after close ignored");
            return Err(BroadcastError::Closed);
        }

        let mut accepted = 0;
        for ep in &state.endpoints {
            if ep.is_departed() {
                self.note_departed(&state, ep);
                continue;
            }
            match ep.deliver(value.clone()).await {
                Handoff::Accepted => accepted += 1,
                Handoff::Departed => self.note_departed(&state, ep),
            }
        }

        state.emit(|| {
            Event::new(EventKind::Published)
                .with_broadcaster(self.name.clone())
                .with_count(accepted)
        });
        Ok(accepted)
    }

    /// Signals end-of-stream to every subscriber and refuses further use.
    ///
    /// Idempotent. Waits for in-flight publishes to finish first. The first
    /// call also drains the observer workers.
    pub async fn close(&self) {
        let observers = {
            let mut state = self.state.write().await;
            if state.closed {
                return;
            }

            let signaled = state
                .endpoints
                .iter()
                .filter(|ep| !ep.is_departed())
                .count();
            // Dropping the senders is the end-of-stream signal.
            state.endpoints.clear();
            state.closed = true;

            state.emit(|| {
                Event::new(EventKind::Closed)
                    .with_broadcaster(self.name.clone())
                    .with_count(signaled)
            });
            tracing::debug!(broadcaster = %self.name, signaled, "closed");

            state.observers.take()
        };

        if let Some(set) = observers {
            set.shutdown().await;
        }
    }

    /// Returns `true` once [`close`](Self::close) has run.
    pub async fn is_closed(&self) -> bool {
        self.state.read().await.closed
    }

    /// Returns the number of registered subscribers that have not been seen to depart.
    pub async fn subscriber_count(&self) -> usize {
        let state = self.state.read().await;
        state.endpoints.iter().filter(|ep| !ep.is_departed()).count()
    }

    fn prune_departed(&self, state: &mut State<T>) {
        let mut gone = Vec::new();
        state.endpoints.retain(|ep| {
            if ep.is_departed() {
                if ep.mark_departed() {
                    gone.push(ep.id());
                }
                false
            } else {
                true
            }
        });
        for id in gone {
            self.departed_event(state, id);
        }
    }

    fn note_departed(&self, state: &State<T>, ep: &Endpoint<T>) {
        if ep.mark_departed() {
            self.departed_event(state, ep.id());
        }
    }

    fn departed_event(&self, state: &State<T>, id: u64) {
        tracing::debug!(broadcaster = %self.name, subscriber = id, "subscriber departed");
        state.emit(|| {
            Event::new(EventKind::SubscriberDeparted)
                .with_broadcaster(self.name.clone())
                .with_subscriber(id)
        });
    }
}

impl<T> Default for Broadcaster<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::task::JoinHandle;
    use tokio::time::timeout;

    /// Drains a subscription on its own task.
    fn drain<T: Send + 'static>(mut sub: Subscription<T>) -> JoinHandle<Vec<T>> {
        tokio::spawn(async move {
            let mut got = Vec::new();
            while let Some(v) = sub.recv().await {
                got.push(v);
            }
            got
        })
    }

    async fn join<T>(h: JoinHandle<T>) -> T {
        timeout(Duration::from_secs(2), h)
            .await
            .expect("consumer did not observe end-of-stream")
            .expect("consumer panicked")
    }

    #[tokio::test]
    async fn test_two_subscribers_receive_all_in_order() {
        let b = Broadcaster::<String>::new();
        let s1 = drain(b.subscribe().await.expect("open"));
        let s2 = drain(b.subscribe().await.expect("open"));

        for v in ["one", "two", "three"] {
            b.publish(v.to_string()).await;
        }
        b.close().await;

        let want = vec!["one".to_string(), "two".into(), "three".into()];
        assert_eq!(join(s1).await, want);
        assert_eq!(join(s2).await, want);
    }

    #[tokio::test]
    async fn test_late_subscriber_gets_no_replay() {
        let b = Broadcaster::<i32>::new();
        let s1 = drain(b.subscribe().await.expect("open"));
        b.publish(1).await;
        let s2 = drain(b.subscribe().await.expect("open"));
        b.publish(2).await;
        b.close().await;

        assert_eq!(join(s1).await, vec![1, 2]);
        assert_eq!(join(s2).await, vec![2]);
    }

    #[tokio::test]
    async fn test_use_after_close() {
        let b = Broadcaster::<i32>::new();
        b.close().await;

        assert!(b.is_closed().await);
        assert!(b.subscribe().await.is_none());
        assert_eq!(b.try_subscribe().await.unwrap_err(), BroadcastError::Closed);

        timeout(Duration::from_millis(200), b.publish(5))
            .await
            .expect("publish after close must not block");
        assert_eq!(b.try_publish(5).await, Err(BroadcastError::Closed));
    }

    #[tokio::test]
    async fn test_close_twice_signals_once() {
        let b = Broadcaster::<u8>::new();
        let mut sub = b.subscribe().await.expect("open");
        b.close().await;
        b.close().await;

        assert_eq!(sub.recv().await, None);
        assert_eq!(sub.recv().await, None);
        assert_eq!(b.subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let b = Broadcaster::<u8>::default();
        assert_eq!(b.try_publish(1).await, Ok(0));
        b.close().await;
    }

    #[tokio::test]
    async fn test_publish_waits_for_slow_subscriber() {
        let b = Arc::new(Broadcaster::<u8>::new());
        let mut sub = b.subscribe().await.expect("open");

        let pb = Arc::clone(&b);
        let publish = tokio::spawn(async move { pb.try_publish(9).await });

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!publish.is_finished(), "publish must wait for the consumer");

        assert_eq!(sub.recv().await, Some(9));
        assert_eq!(join(publish).await, Ok(1));
    }

    #[tokio::test]
    async fn test_close_waits_for_in_flight_publish() {
        let b = Arc::new(Broadcaster::<u8>::new());
        let mut sub = b.subscribe().await.expect("open");

        let pb = Arc::clone(&b);
        let publish = tokio::spawn(async move { pb.try_publish(1).await });
        tokio::time::sleep(Duration::from_millis(20)).await;

        let cb = Arc::clone(&b);
        let close = tokio::spawn(async move { cb.close().await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!close.is_finished(), "close must wait for the in-flight publish");

        assert_eq!(sub.recv().await, Some(1));
        assert_eq!(join(publish).await, Ok(1));
        join(close).await;
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_abandoned_publish_not_delivered_after_close() {
        let b = Broadcaster::<u8>::new();
        let mut s1 = b.subscribe().await.expect("open");
        let mut s2 = b.subscribe().await.expect("open");

        let gave_up = timeout(Duration::from_millis(20), b.publish(7)).await;
        assert!(gave_up.is_err(), "nobody is reading, publish must not resolve");

        timeout(Duration::from_secs(1), b.close())
            .await
            .expect("close must not wait on an abandoned publish");

        assert_eq!(s1.recv().await, None);
        assert_eq!(s2.recv().await, None);
    }

    #[tokio::test]
    async fn test_abandoned_publish_does_not_leak_into_next() {
        let b = Broadcaster::<u8>::new();
        let mut sub = b.subscribe().await.expect("open");

        let _ = timeout(Duration::from_millis(20), b.publish(1)).await;

        let reader = tokio::spawn(async move {
            let first = sub.recv().await;
            (sub, first)
        });
        assert_eq!(b.try_publish(2).await, Ok(1));

        let (mut sub, first) = join(reader).await;
        assert_eq!(first, Some(2));
        b.close().await;
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_dropped_subscription_does_not_stall() {
        let b = Broadcaster::<u8>::new();
        let gone = b.subscribe().await.expect("open");
        let keep = drain(b.subscribe().await.expect("open"));
        drop(gone);

        let accepted = timeout(Duration::from_secs(1), b.try_publish(3))
            .await
            .expect("departed subscriber stalled publish");
        assert_eq!(accepted, Ok(1));
        assert_eq!(b.subscriber_count().await, 1);

        b.close().await;
        assert_eq!(join(keep).await, vec![3]);
    }

    #[tokio::test]
    async fn test_subscriber_limit_and_pruning() {
        let b = Broadcaster::<u8>::with_config(Config {
            max_subscribers: 1,
            ..Config::named("limited")
        });
        assert_eq!(b.name(), "limited");

        let first = b.subscribe().await.expect("open");
        assert_eq!(
            b.try_subscribe().await.unwrap_err(),
            BroadcastError::LimitReached { limit: 1 }
        );

        drop(first);
        let second = b.subscribe().await.expect("departed slot is reclaimed");
        assert_eq!(second.id(), 1);
        b.close().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_subscribe_during_publishing() {
        let b = Arc::new(Broadcaster::<u32>::new());
        let early = drain(b.subscribe().await.expect("open"));

        let pb = Arc::clone(&b);
        let publisher = tokio::spawn(async move {
            for v in 0..200u32 {
                pb.publish(v).await;
            }
        });

        let mut late = Vec::new();
        for _ in 0..8 {
            if let Some(sub) = b.subscribe().await {
                late.push(drain(sub));
            }
            tokio::task::yield_now().await;
        }

        join(publisher).await;
        b.close().await;

        assert_eq!(join(early).await, (0..200).collect::<Vec<_>>());
        for h in late {
            let got = join(h).await;
            // A late subscriber sees a gap-free suffix of the published sequence.
            if let Some(&first) = got.first() {
                assert_eq!(got, (first..200).collect::<Vec<_>>());
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_publishers_keep_per_publisher_order() {
        const PUBLISHERS: u32 = 4;
        const PER_PUBLISHER: u32 = 100;

        let b = Arc::new(Broadcaster::<(u32, u32)>::new());
        let mut consumers = Vec::new();
        for _ in 0..3 {
            consumers.push(drain(b.subscribe().await.expect("open")));
        }

        let publishers: Vec<_> = (0..PUBLISHERS)
            .map(|p| {
                let pb = Arc::clone(&b);
                tokio::spawn(async move {
                    for i in 0..PER_PUBLISHER {
                        assert_eq!(pb.try_publish((p, i)).await, Ok(3));
                    }
                })
            })
            .collect();
        for h in publishers {
            join(h).await;
        }
        b.close().await;

        for h in consumers {
            let got = join(h).await;
            assert_eq!(got.len(), (PUBLISHERS * PER_PUBLISHER) as usize);

            for p in 0..PUBLISHERS {
                let seq: Vec<u32> = got.iter().filter(|(q, _)| *q == p).map(|&(_, i)| i).collect();
                assert_eq!(seq, (0..PER_PUBLISHER).collect::<Vec<_>>(), "publisher {p}");
            }

            let mut all = got.clone();
            all.sort_unstable();
            all.dedup();
            assert_eq!(all.len(), got.len(), "duplicate delivery");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_close_during_publishing() {
        let b = Arc::new(Broadcaster::<u32>::new());
        let consumers: Vec<_> = {
            let mut v = Vec::new();
            for _ in 0..3 {
                v.push(drain(b.subscribe().await.expect("open")));
            }
            v
        };

        let pb = Arc::clone(&b);
        let publisher = tokio::spawn(async move {
            let mut sent = 0u32;
            while pb.try_publish(sent).await.is_ok() {
                sent += 1;
            }
            sent
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        b.close().await;
        let sent = join(publisher).await;

        for h in consumers {
            assert_eq!(join(h).await, (0..sent).collect::<Vec<_>>());
        }
    }
}
