//! Broadcast core: registry, delivery and shutdown.
//!
//! The public API from this module is [`Broadcaster`], its [`Subscription`]
//! handles, [`Config`] and [`BroadcasterBuilder`].
//!
//! Internal modules:
//! - [`broadcaster`]: subscriber registry, fan-out loop and close;
//! - [`endpoint`]: zero-capacity handoff owned by the broadcaster;
//! - [`subscription`]: receive side handed to subscribers;
//! - [`builder`]: observer wiring;
//! - [`config`]: broadcaster settings.

mod broadcaster;
mod builder;
mod config;
mod endpoint;
mod subscription;

pub use broadcaster::Broadcaster;
pub use builder::BroadcasterBuilder;
pub use config::Config;
pub use subscription::Subscription;
