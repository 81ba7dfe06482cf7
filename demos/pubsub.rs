//! # Example: pubsub
//!
//! Two subscribers, three values, one close.
//!
//! Demonstrates how to:
//! - Build a [`Broadcaster`] with the built-in [`LogWriter`] observer.
//! - Drain each [`Subscription`](fanout::Subscription) until end-of-stream.
//! - Wait for every consumer after `close` so no delivery is cut short.
//!
//! ## Flow
//! ```text
//! Broadcaster::builder(cfg).build()
//!     ├─► subscribe() ×2 ──► spawn consumer loops
//!     ├─► publish("one" | "two" | "three")
//!     ├─► close()        ──► consumers see end-of-stream and exit
//!     └─► join consumers ──► "completed"
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example pubsub --features logging
//! ```

use std::sync::Arc;

use fanout::{Broadcaster, Config, LogWriter};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let ps = Broadcaster::<String>::builder(Config::named("demo"))
        .observe(Arc::new(LogWriter::new()))
        .build();

    let mut consumers = Vec::new();
    for n in 1..=2 {
        let mut sub = ps.subscribe().await.ok_or("broadcaster closed")?;
        consumers.push(tokio::spawn(async move {
            while let Some(value) = sub.recv().await {
                info!(subscriber = n, %value, "received");
            }
            info!(subscriber = n, "exiting");
        }));
    }

    for value in ["one", "two", "three"] {
        ps.publish(value.to_string()).await;
    }

    ps.close().await;

    for h in consumers {
        h.await?;
    }

    info!("completed");
    Ok(())
}
