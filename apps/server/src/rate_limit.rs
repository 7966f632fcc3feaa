use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::ApiResponse;

// ── Configuration ──

/// Route groups with their own request budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Catalog, date resolution and slot boards.
    Public,
    /// Pricing and booking previews.
    Quote,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Public => f.write_str("public"),
            Tier::Quote => f.write_str("quote"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum requests allowed within the sliding window.
    pub max_requests: u32,
    pub window: Duration,
}

// ── Limiter ──

/// In-memory per-IP sliding-window limiter shared by all route groups.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limits: Arc<HashMap<Tier, RateLimitConfig>>,
    hits: Arc<DashMap<(Tier, IpAddr), Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new<I>(limits: I) -> Self
    where
        I: IntoIterator<Item = (Tier, RateLimitConfig)>,
    {
        Self {
            limits: Arc::new(limits.into_iter().collect()),
            hits: Arc::new(DashMap::new()),
        }
    }

    /// `Ok(())` when allowed, `Err(retry_after_secs)` when over budget.
    /// Tiers without a configured limit are not limited.
    pub fn check(&self, tier: Tier, ip: IpAddr) -> Result<(), u64> {
        let Some(config) = self.limits.get(&tier) else {
            return Ok(());
        };
        let now = Instant::now();

        let mut entry = self.hits.entry((tier, ip)).or_default();
        entry.retain(|t| now.duration_since(*t) < config.window);

        if entry.len() >= config.max_requests as usize {
            let retry_after = entry
                .first()
                .map(|oldest| (*oldest + config.window).saturating_duration_since(now))
                .unwrap_or(config.window)
                .as_secs()
                .max(1);
            return Err(retry_after);
        }

        entry.push(now);
        Ok(())
    }

    /// Drop timestamps older than twice their tier's window.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.hits.retain(|(tier, _), timestamps| {
            let cutoff = self
                .limits
                .get(tier)
                .map_or(Duration::ZERO, |config| config.window * 2);
            timestamps.retain(|t| now.duration_since(*t) < cutoff);
            !timestamps.is_empty()
        });
    }

    /// Middleware state binding this limiter to one tier.
    pub fn guard(&self, tier: Tier) -> TierGuard {
        TierGuard {
            limiter: self.clone(),
            tier,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TierGuard {
    limiter: RateLimiter,
    tier: Tier,
}

// ── IP extraction ──

/// Client IP from X-Forwarded-For (reverse proxy) or the socket address.
pub fn extract_client_ip(req: &Request) -> IpAddr {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    forwarded
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn too_many_requests(retry_after: u64) -> Response {
    let body = ApiResponse::<()>::error(format!(
        "Too many requests. Try again in {} seconds",
        retry_after
    ));
    (
        StatusCode::TOO_MANY_REQUESTS,
        [("Retry-After", retry_after.to_string())],
        Json(body),
    )
        .into_response()
}

// ── Middleware ──

pub async fn rate_limit(
    State(guard): State<TierGuard>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let ip = extract_client_ip(&req);
    guard.limiter.check(guard.tier, ip).map_err(|retry_after| {
        tracing::warn!(tier = %guard.tier, %ip, retry_after, "rate limited");
        too_many_requests(retry_after)
    })?;
    Ok(next.run(req).await)
}

// ── Tests ──
