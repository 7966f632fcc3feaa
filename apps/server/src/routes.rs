use axum::{
    http::{header::InvalidHeaderValue, HeaderValue},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{
    handlers,
    rate_limit::{rate_limit, RateLimiter, Tier},
    AppState,
};

/// Vite dev server, always allowed alongside the configured frontend.
const DEV_ORIGIN: &str = "http://localhost:5173";

/// Whitelist the frontend origin when configured, otherwise allow any.
pub fn cors_layer(webapp_url: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    let cors = match webapp_url {
        Some(url) => {
            let origins = vec![url.parse::<HeaderValue>()?, HeaderValue::from_static(DEV_ORIGIN)];
            CorsLayer::new().allow_origin(AllowOrigin::list(origins))
        }
        None => CorsLayer::new().allow_origin(Any),
    };
    Ok(cors.allow_methods(Any).allow_headers(Any))
}

/// Route groups, each behind its own rate-limit tier.
pub fn router(state: Arc<AppState>, limiter: RateLimiter, cors: CorsLayer) -> Router {
    // 1. No limit: health checks
    let no_limit_routes = Router::new().route("/api/health", get(handlers::health::health));

    // 2. Public: catalog and scheduling
    let public_routes = Router::new()
        .route("/api/catalog", get(handlers::catalog::catalog))
        .route("/api/schedule/dates", post(handlers::schedule::resolve))
        .route(
            "/api/available-times",
            get(handlers::schedule::available_times),
        )
        .layer(from_fn_with_state(limiter.guard(Tier::Public), rate_limit));

    // 3. Quote: pricing and booking previews
    let quote_routes = Router::new()
        .route("/api/quotes/recurring", post(handlers::quotes::recurring))
        .route("/api/quotes/instant", post(handlers::quotes::instant))
        .route("/api/quotes/package", post(handlers::quotes::package))
        .route(
            "/api/quotes/subscription",
            post(handlers::quotes::subscription),
        )
        .route("/api/bookings/preview", post(handlers::booking::preview))
        .layer(from_fn_with_state(limiter.guard(Tier::Quote), rate_limit));

    Router::new()
        .merge(no_limit_routes)
        .merge(public_routes)
        .merge(quote_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
