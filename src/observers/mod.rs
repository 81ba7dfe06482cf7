//! # Event observers for a broadcaster.
//!
//! This module provides the [`Observe`] trait and the fan-out machinery that
//! feeds it. Observers see registry and delivery [`Event`](crate::Event)s; they
//! never see the broadcast values themselves.
//!
//! ## Architecture
//! ```text
//! Broadcaster ── emit(Event) ──► ObserverSet
//!                                   ├──► [queue] ──► worker ──► observer1.on_event()
//!                                   └──► [queue] ──► worker ──► observerN.on_event()
//!                                                         │
//!                                                    ┌────┴────┬─────────┐
//!                                                    ▼         ▼         ▼
//!                                                LogWriter  Metrics   Custom
//! ```
//!
//! ## Implementing custom observers
//! ```no_run
//! use fanout::{Observe, Event, EventKind};
//! use async_trait::async_trait;
//!
//! struct DepartureCounter;
//!
//! #[async_trait]
//! impl Observe for DepartureCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::SubscriberDeparted {
//!             // bump a counter
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod observer;
mod set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observer::Observe;
pub(crate) use set::ObserverSet;
