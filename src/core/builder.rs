use std::marker::PhantomData;
use std::sync::Arc;

use super::{broadcaster::Broadcaster, config::Config};
use crate::observers::{Observe, ObserverSet};

/// Builder for constructing a [`Broadcaster`] with observers attached.
pub struct BroadcasterBuilder<T> {
    cfg: Config,
    observers: Vec<Arc<dyn Observe>>,
    _values: PhantomData<fn(T)>,
}

impl<T> BroadcasterBuilder<T>
where
    T: Clone + Send + 'static,
{
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            observers: Vec::new(),
            _values: PhantomData,
        }
    }

    /// Sets event observers.
    ///
    /// Observers receive registry and delivery events through dedicated
    /// workers with bounded queues.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observe>>) -> Self {
        self.observers = observers;
        self
    }

    /// Adds a single observer.
    pub fn observe(mut self, observer: Arc<dyn Observe>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Builds the broadcaster.
    ///
    /// # Panics
    /// Panics if observers were added and this is called outside a tokio runtime.
    pub fn build(self) -> Broadcaster<T> {
        let observers = Some(ObserverSet::spawn(self.observers)).filter(|set| !set.is_empty());
        Broadcaster::new_internal(self.cfg, observers)
    }
}
