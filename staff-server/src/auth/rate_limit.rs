//! Application-layer rate limiting for the login route

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

struct IpEntry {
    count: u32,
    window_start: Instant,
}

/// Fixed-window counter per client IP
#[derive(Clone)]
pub struct RateLimiter {
    entries: Arc<DashMap<String, IpEntry>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            max_requests,
            window,
        }
    }

    /// `max_requests` per minute
    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub fn check(&self, ip: &str) -> bool {
        let now = Instant::now();
        let mut entry = self.entries.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) >= self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= self.max_requests
    }

    /// Drop entries whose window has expired
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.entries
            .retain(|_, entry| now.duration_since(entry.window_start) < self.window);
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("tracked_ips", &self.entries.len())
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .finish()
    }
}

/// Client IP used as the limiter key
///
/// The TCP peer address by default. `X-Forwarded-For` is a client-controlled
/// header and is only honoured when `trust_proxy_headers` is set.
fn extract_ip(request: &Request, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers
        && let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Rate limit middleware for login
pub async fn login_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_ip(&request, state.config.trust_proxy_headers);
    if !state.login_limiter.check(&ip) {
        security_log!("WARN", "login_rate_limited", ip = ip.as_str());
        return Err(AppError::new(ErrorCode::RateLimited));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_per_ip() {
        let limiter = RateLimiter::per_minute(2);
        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.2"));
    }

    fn request_from(peer: &str, forwarded: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/api/auth/login");
        if let Some(value) = forwarded {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut request = builder.body(axum::body::Body::empty()).unwrap();
        let addr: std::net::SocketAddr = peer.parse().unwrap();
        request
            .extensions_mut()
            .insert(axum::extract::ConnectInfo(addr));
        request
    }

    #[test]
    fn test_forwarded_header_ignored_by_default() {
        let request = request_from("203.0.113.7:51000", Some("1.1.1.1"));
        assert_eq!(extract_ip(&request, false), "203.0.113.7");
    }

    #[test]
    fn test_forwarded_header_when_trusted() {
        let request = request_from("10.0.0.2:51000", Some("198.51.100.4, 10.0.0.1"));
        assert_eq!(extract_ip(&request, true), "198.51.100.4");

        let request = request_from("10.0.0.2:51000", None);
        assert_eq!(extract_ip(&request, true), "10.0.0.2");
    }

    #[tokio::test]
    async fn test_rotating_forwarded_header_still_limited() {
        let limiter = RateLimiter::per_minute(5);
        let allowed = (1..=6)
            .map(|n| request_from("203.0.113.7:51000", Some(&format!("1.1.1.{n}"))))
            .filter(|request| limiter.check(&extract_ip(request, false)))
            .count();
        assert_eq!(allowed, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.check("10.0.0.1"));

        tokio::time::advance(Duration::from_secs(61)).await;
        limiter.cleanup();
        assert!(limiter.entries.is_empty());
    }
}
