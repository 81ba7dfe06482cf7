//! Broadcaster events: what observers are told about.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publisher**: [`Broadcaster`](crate::Broadcaster) on subscribe, publish and close.
//! - **Consumers**: [`Observe`](crate::Observe) implementations, via the observer set.

mod event;

pub use event::{Event, EventKind};
