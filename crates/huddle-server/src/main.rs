//! # Huddle Server
//!
//! Chat-room bot: polls Telegram for messages, seats users in rooms and
//! relays room chatter between members.
//!
//! ## Usage
//!
//! ```bash
//! # Run with a token from the environment
//! HUDDLE_TELEGRAM_TOKEN=123:abc huddle
//!
//! # Run with a custom config
//! HUDDLE_CONFIG=/path/to/huddle.toml huddle
//!
//! # Bind the health endpoint elsewhere
//! HUDDLE_PORT=8081 HUDDLE_HOST=0.0.0.0 huddle
//! ```

mod config;
mod engine;
mod http;
mod metrics;

use anyhow::Result;
use huddle_core::{Hub, Router};
use huddle_feed::TelegramFeed;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "huddle=info,huddle_core=info,huddle_feed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::load()?;
    config.validate()?;

    info!("Starting Huddle {}", env!("CARGO_PKG_VERSION"));
    info!(?config, "Configuration loaded");

    // Initialize metrics
    if config.metrics.enabled {
        metrics::init_metrics();
        if let Err(e) = metrics::start_metrics_server(config.metrics.port) {
            error!("Failed to start metrics server: {}", e);
        }
    }

    let feed = TelegramFeed::new(config.telegram.feed_config())?;
    let hub = Hub::with_defaults(config.rooms.defaults());
    let router = config.replies.seed.map_or_else(Router::new, Router::seeded);
    info!(
        lobby = ?router.lobby_table().tokens(),
        room = ?router.room_table().tokens(),
        "Commands registered"
    );
    let engine = engine::Engine::new(Arc::new(feed), hub, router);

    if config.health.enabled {
        let addr = config.bind_addr()?;
        let stats = engine.subscribe_stats();
        tokio::spawn(async move {
            if let Err(e) = http::serve(addr, stats).await {
                error!("Health endpoint failed: {}", e);
            }
        });
    }

    engine
        .run(config.poll.interval(), async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("Huddle stopped");
    Ok(())
}
