//! # Broadcaster configuration.
//!
//! Provides [`Config`] settings for a single [`Broadcaster`](crate::Broadcaster).
//!
//! ## Sentinel values
//! - `max_subscribers = 0` → unlimited

/// Configuration for a broadcaster.
///
/// ## Field semantics
/// - `name`: label attached to every emitted event and log line
/// - `max_subscribers`: live subscriber limit (`0` = unlimited)
///
/// ## Notes
/// All fields are public. Prefer the helper accessors over checking the `0`
/// sentinel directly.
#[derive(Clone, Debug)]
pub struct Config {
    /// Name of the broadcaster, used in events and logs.
    pub name: String,

    /// Maximum number of live subscribers.
    ///
    /// - `0` = unlimited
    /// - `n > 0` = `subscribe` returns `None` while `n` subscribers are registered
    ///
    /// Subscriptions dropped by their consumer stop counting once they are pruned.
    pub max_subscribers: usize,
}

impl Config {
    /// Creates a configuration with the given name and default limits.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the subscriber limit as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → at most `n` live subscribers
    #[inline]
    pub fn subscriber_limit(&self) -> Option<usize> {
        if self.max_subscribers == 0 {
            None
        } else {
            Some(self.max_subscribers)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `name = "broadcaster"`
    /// - `max_subscribers = 0` (unlimited)
    fn default() -> Self {
        Self {
            name: "broadcaster".to_string(),
            max_subscribers: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_means_unlimited() {
        assert_eq!(Config::default().subscriber_limit(), None);
    }

    #[test]
    fn test_named_keeps_defaults() {
        let cfg = Config {
            max_subscribers: 3,
            ..Config::named("prices")
        };
        assert_eq!(cfg.name, "prices");
        assert_eq!(cfg.subscriber_limit(), Some(3));
    }
}
