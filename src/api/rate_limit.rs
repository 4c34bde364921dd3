//! Request Rate Limiting
//!
//! Fixed-window request counter per client IP, applied to every route.
//! Clients are keyed by the peer address from `ConnectInfo`; requests
//! without one (in-process callers) share a single bucket.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::handlers::AppState;
use crate::config::Config;
use crate::error::{AppError, Result};

/// Body message of a rejected request
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, try again later.";

/// Bucket key for requests with no peer address
const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u64,
}

#[derive(Debug)]
struct Clients {
    windows: HashMap<String, Window>,
    last_cleanup: Instant,
}

/// Per-client fixed-window limiter.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u64,
    window: Duration,
    clients: RwLock<Clients>,
}

impl RateLimiter {
    /// Allows `max_requests` per client every `window_secs` seconds.
    pub fn new(max_requests: u64, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs.max(1)),
            clients: RwLock::new(Clients {
                windows: HashMap::new(),
                last_cleanup: Instant::now(),
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rate_limit_max, config.rate_limit_window)
    }

    /// Counts one request for `client`. Returns false once the client has
    /// used up its current window; rejected requests are not counted.
    pub async fn check_and_record(&self, client: &str) -> bool {
        let now = Instant::now();
        let mut clients = self.clients.write().await;

        // finished windows carry no state worth keeping
        if now.duration_since(clients.last_cleanup) >= self.window {
            let window = self.window;
            clients
                .windows
                .retain(|_, w| now.duration_since(w.started) < window);
            clients.last_cleanup = now;
        }

        let entry = clients
            .windows
            .entry(client.to_string())
            .or_insert(Window {
                started: now,
                count: 0,
            });

        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.max_requests {
            return false;
        }
        entry.count += 1;
        true
    }

    /// Number of clients with a live window.
    pub async fn tracked_clients(&self) -> usize {
        self.clients.read().await.windows.len()
    }
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Middleware rejecting requests over the per-IP budget with 429.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let client = client_key(&request);

    if !state.rate_limiter.check_and_record(&client).await {
        warn!(client = %client, "rate limit exceeded");
        return Err(AppError::TooManyRequests(RATE_LIMIT_MESSAGE.to_string()));
    }
    debug!(client = %client, "request admitted");

    Ok(next.run(request).await)
}
