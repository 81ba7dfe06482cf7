//! # Non-blocking event fan-out to observers.
//!
//! [`ObserverSet`] hands each event to every observer without ever blocking the
//! broadcaster, which emits while holding its state lock.
//!
//! ```text
//! emit(event)
//!     ├──► [queue 1] ──► worker 1 ──► observer1.on_event()
//!     │    (bounded)         └──────► panic → tracing::error!
//!     └──► [queue N] ──► worker N ──► observerN.on_event()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **Non-blocking**: `emit()` uses `try_send` and returns immediately
//! - **Overflow**: event dropped for that observer only, logged via `tracing::warn!`
//! - **Per-observer FIFO**: each observer sees events in emission order
//! - **Isolation**: a panicking observer keeps receiving later events

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use super::Observe;
use crate::events::Event;

struct ObserverQueue {
    name: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
}

/// Per-observer queues plus their worker tasks.
pub(crate) struct ObserverSet {
    queues: Vec<ObserverQueue>,
    workers: Vec<JoinHandle<()>>,
}

impl ObserverSet {
    /// Spawns one worker per observer on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if `observers` is non-empty and no tokio runtime is running.
    pub(crate) fn spawn(observers: Vec<Arc<dyn Observe>>) -> Self {
        let mut queues = Vec::with_capacity(observers.len());
        let mut workers = Vec::with_capacity(observers.len());

        for obs in observers {
            let name = obs.name();
            let (tx, rx) = mpsc::channel::<Arc<Event>>(obs.queue_capacity().max(1));

            workers.push(tokio::spawn(drive(obs, rx)));
            queues.push(ObserverQueue { name, tx });
        }
        Self { queues, workers }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Queues `event` for every observer.
    pub(crate) fn emit(&self, event: Event) {
        let event = Arc::new(event);

        for q in &self.queues {
            match q.tx.try_send(Arc::clone(&event)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        observer = q.name,
                        kind = event.kind.as_label(),
                        seq = event.seq,
                        "observer queue full, event dropped"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::warn!(
                        observer = q.name,
                        kind = event.kind.as_label(),
                        "observer worker gone, event dropped"
                    );
                }
            }
        }
    }

    /// Closes every queue and waits for the workers to drain them.
    pub(crate) async fn shutdown(self) {
        drop(self.queues);

        for h in self.workers {
            if let Err(err) = h.await {
                tracing::error!(error = %err, "observer worker failed");
            }
        }
    }
}

async fn drive(obs: Arc<dyn Observe>, mut rx: mpsc::Receiver<Arc<Event>>) {
    while let Some(ev) = rx.recv().await {
        let fut = obs.on_event(ev.as_ref());

        if let Err(payload) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            let info = if let Some(msg) = payload.downcast_ref::<&'static str>() {
                (*msg).to_string()
            } else if let Some(msg) = payload.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            };
            tracing::error!(
                observer = obs.name(),
                kind = ev.kind.as_label(),
                panic = %info,
                "observer panicked"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Observe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.kind);
        }
    }

    struct Exploder;

    #[async_trait]
    impl Observe for Exploder {
        async fn on_event(&self, event: &Event) {
            if event.kind == EventKind::Published {
                panic!("boom");
            }
        }

        fn name(&self) -> &'static str {
            "exploder"
        }
    }

    #[tokio::test]
    async fn test_events_reach_every_observer_in_order() {
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let set = ObserverSet::spawn(vec![a.clone(), b.clone()]);
        assert!(!set.is_empty());

        set.emit(Event::new(EventKind::Subscribed));
        set.emit(Event::new(EventKind::Published));
        set.emit(Event::new(EventKind::Closed));
        set.shutdown().await;

        let want = vec![EventKind::Subscribed, EventKind::Published, EventKind::Closed];
        assert_eq!(*a.seen.lock().unwrap(), want);
        assert_eq!(*b.seen.lock().unwrap(), want);
    }

    #[tokio::test]
    async fn test_panicking_observer_is_isolated() {
        let rec = Arc::new(Recorder::default());
        let set = ObserverSet::spawn(vec![Arc::new(Exploder), rec.clone()]);

        set.emit(Event::new(EventKind::Published));
        set.emit(Event::new(EventKind::Closed));
        set.shutdown().await;

        assert_eq!(
            *rec.seen.lock().unwrap(),
            vec![EventKind::Published, EventKind::Closed]
        );
    }

    #[test]
    fn test_empty_set_needs_no_runtime() {
        let set = ObserverSet::spawn(Vec::new());
        assert!(set.is_empty());
        set.emit(Event::new(EventKind::Published));
    }
}
