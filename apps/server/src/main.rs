mod catalog;
mod config;
mod error;
mod extract;
mod handlers;
mod models;
mod rate_limit;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use catalog::Catalog;
use config::Config;
use rate_limit::{RateLimitConfig, RateLimiter, Tier};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    pub started_at: Instant,
}

/// Rate limit cleanup interval (seconds).
const RATE_LIMIT_CLEANUP_SECS: u64 = 300;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // ── Tracing ──
    let env_filter = EnvFilter::from_default_env().add_directive("info".parse()?);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    if config.webapp_url.is_none() {
        tracing::warn!("WEBAPP_URL not set, CORS allows any origin");
    }
    let cors = routes::cors_layer(config.webapp_url.as_deref())?;
    let addr = config.server_address();

    tracing::info!(
        utc_offset = %config.utc_offset,
        buffer_minutes = config.slot_buffer.minutes(),
        opening = %config.opening_time,
        closing = %config.closing_time,
        "loaded config"
    );

    let state = Arc::new(AppState {
        catalog: Catalog::standard(config.hourly_rate),
        config,
        started_at: Instant::now(),
    });

    // ── Rate limiter ──
    let rate_limiter = RateLimiter::new([
        (
            Tier::Public,
            RateLimitConfig {
                max_requests: 60,
                window: Duration::from_secs(60),
            },
        ),
        (
            Tier::Quote,
            RateLimitConfig {
                max_requests: 30,
                window: Duration::from_secs(60),
            },
        ),
    ]);

    // ── Background task: cleanup stale rate limit entries ──
    let cleanup_limiter = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(RATE_LIMIT_CLEANUP_SECS));
        loop {
            interval.tick().await;
            cleanup_limiter.cleanup();
        }
    });

    let app = routes::router(state, rate_limiter, cors);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Cleanbook server starting on {}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
