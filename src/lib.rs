//! # fanout
//!
//! **fanout** is an in-process publish/subscribe broadcaster for Rust.
//!
//! A single [`Broadcaster<T>`](Broadcaster) hands every published value to each
//! registered [`Subscription`], in order, until it is closed. Delivery is a
//! rendezvous: `publish` resolves only after every subscriber has received the
//! value, so a slow subscriber applies backpressure to the publisher.
//!
//! ## Architecture
//! ```text
//!                        ┌───────────────────────────────────────────┐
//!   subscribe() ───────► │  Broadcaster<T>                           │
//!   publish(v)  ───────► │  RwLock<State>                            │
//!   close()     ───────► │   - endpoints: Vec<Endpoint<T>>           │
//!                        │   - closed: bool                          │
//!                        │   - observers: Option<ObserverSet>        │
//!                        └──────┬──────────────┬──────────────┬──────┘
//!                               │ deliver(v)   │ deliver(v)   │ emit(Event)
//!                               ▼              ▼              ▼
//!                        ┌────────────┐ ┌────────────┐  ┌─────────────┐
//!                        │ slot + ack │ │ slot + ack │  │ ObserverSet │
//!                        └─────┬──────┘ └─────┬──────┘  └──────┬──────┘
//!                              ▼              ▼                ▼
//!                        Subscription   Subscription     Observe::on_event
//!                          .recv()        .recv()        (LogWriter, ...)
//! ```
//!
//! ### Lifecycle
//! ```text
//! Broadcaster::new() ── open
//!   ├─► subscribe()  → Some(Subscription)      receives values published from now on
//!   ├─► publish(v)   → waits until each subscriber took v, in registration order
//!   └─► close()      → drops every endpoint (end-of-stream), closed = true
//!
//! closed
//!   ├─► subscribe()  → None
//!   ├─► publish(v)   → no-op
//!   └─► close()      → no-op
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Broadcast**     | Register subscribers, fan out values, close once.            | [`Broadcaster`], [`Subscription`]           |
//! | **Observers**     | Watch registry and delivery events (logging, metrics).       | [`Observe`], [`Event`], [`EventKind`]       |
//! | **Errors**        | Reasons behind refused `try_*` calls.                        | [`BroadcastError`], [`TryRecvError`]        |
//! | **Configuration** | Name and subscriber limit.                                   | [`Config`], [`BroadcasterBuilder`]          |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] observer that writes events via `tracing`.
//!
//! ## Example
//! ```rust
//! use fanout::Broadcaster;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let prices = Broadcaster::<String>::new();
//!
//!     let mut sub = prices.subscribe().await.expect("broadcaster is open");
//!     let consumer = tokio::spawn(async move {
//!         while let Some(v) = sub.recv().await {
//!             println!("got {v}");
//!         }
//!         println!("end of stream");
//!     });
//!
//!     prices.publish("one".to_string()).await;
//!     prices.publish("two".to_string()).await;
//!     prices.close().await;
//!
//!     consumer.await.unwrap();
//! }
//! ```
mod core;
mod error;
mod events;
mod observers;

// ---- Public re-exports ----

pub use crate::core::{Broadcaster, BroadcasterBuilder, Config, Subscription};
pub use error::{BroadcastError, TryRecvError};
pub use events::{Event, EventKind};
pub use observers::Observe;

// Optional: expose a simple built-in logger observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
