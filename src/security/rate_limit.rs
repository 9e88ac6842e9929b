//! Rate Limiting Module
//!
//! Sliding-window request limiting keyed by account or client address.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use axum::extract::ConnectInfo;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::config::config::SecurityConfig;
use crate::security::auth::Claims;

/// Checks between sweeps of idle clients
const PURGE_EVERY: u64 = 1024;

/// Rate limit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum requests per minute
    pub requests_per_minute: u32,
    /// Maximum requests per hour
    pub requests_per_hour: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            requests_per_hour: 1000,
        }
    }
}

/// Rate limit result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RateLimitResult {
    /// Limiting disabled
    Allowed,
    /// Request is rate limited
    Limited {
        /// Seconds until retry is allowed
        retry_after: u64,
        /// Rate limit info
        limit: RateLimitInfo,
    },
    /// Request allowed and counted
    AllowedWithInfo {
        /// Remaining requests
        remaining: u32,
        /// Rate limit info
        limit: RateLimitInfo,
    },
}

/// Rate limit information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitInfo {
    /// Limit for the current window
    pub limit: u32,
    /// Remaining requests in current window
    pub remaining: u32,
    /// Window reset time
    pub reset_at: DateTime<Utc>,
    /// Window type
    pub window: String,
}

/// Client identifier for rate limiting
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum RateLimitClient {
    /// Authenticated account
    Account(String),
    /// IP address based client
    Ip(String),
    /// Nothing identifying on the request
    Anonymous,
}

impl RateLimitClient {
    /// Key used in the request history map
    pub fn key(&self) -> String {
        match self {
            RateLimitClient::Account(id) => format!("account:{}", id),
            RateLimitClient::Ip(ip) => format!("ip:{}", ip),
            RateLimitClient::Anonymous => "anonymous".to_string(),
        }
    }

    /// Extract client identifier from request
    pub fn from_request<B>(req: &axum::http::Request<B>, claims: Option<&Claims>) -> Self {
        if let Some(claims) = claims {
            return RateLimitClient::Account(claims.sub.clone());
        }

        if let Some(ip) = req
            .headers()
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
        {
            let ip = ip.trim();
            if !ip.is_empty() {
                return RateLimitClient::Ip(ip.to_string());
            }
        }

        if let Some(ip) = req.headers().get("X-Real-IP").and_then(|v| v.to_str().ok()) {
            return RateLimitClient::Ip(ip.to_string());
        }

        if let Some(ConnectInfo(peer)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
            return RateLimitClient::Ip(peer.ip().to_string());
        }

        RateLimitClient::Anonymous
    }
}

/// In-memory rate limiter using sliding window
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    /// Request history (client -> timestamps)
    request_history: Arc<RwLock<HashMap<String, Vec<DateTime<Utc>>>>>,
    checks: Arc<AtomicU64>,
    enabled: bool,
}

impl RateLimiter {
    /// Create new rate limiter
    pub fn new(config: RateLimitConfig, enabled: bool) -> Self {
        Self {
            config,
            request_history: Arc::new(RwLock::new(HashMap::new())),
            checks: Arc::new(AtomicU64::new(0)),
            enabled,
        }
    }

    /// Create from security settings
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            RateLimitConfig {
                requests_per_minute: config.requests_per_minute,
                requests_per_hour: config.requests_per_hour,
            },
            config.rate_limit_enabled,
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Check rate limit for a client and record the request when allowed
    pub async fn check_rate_limit(&self, client: &RateLimitClient) -> RateLimitResult {
        if !self.enabled {
            return RateLimitResult::Allowed;
        }

        if self.checks.fetch_add(1, Ordering::Relaxed) % PURGE_EVERY == PURGE_EVERY - 1 {
            self.purge_expired().await;
        }

        let key = client.key();
        let now = Utc::now();
        let minute_cutoff = now - Duration::minutes(1);
        let hour_cutoff = now - Duration::hours(1);

        let mut history = self.request_history.write().await;
        let entries = history.entry(key).or_default();
        entries.retain(|t| *t > hour_cutoff);

        let minute_count = entries.iter().filter(|t| **t > minute_cutoff).count();
        let hour_count = entries.len();

        if minute_count >= self.config.requests_per_minute as usize {
            return RateLimitResult::Limited {
                retry_after: 60,
                limit: RateLimitInfo {
                    limit: self.config.requests_per_minute,
                    remaining: 0,
                    reset_at: now + Duration::minutes(1),
                    window: "minute".to_string(),
                },
            };
        }

        if hour_count >= self.config.requests_per_hour as usize {
            return RateLimitResult::Limited {
                retry_after: 3600,
                limit: RateLimitInfo {
                    limit: self.config.requests_per_hour,
                    remaining: 0,
                    reset_at: now + Duration::hours(1),
                    window: "hour".to_string(),
                },
            };
        }

        entries.push(now);

        let remaining = self
            .config
            .requests_per_minute
            .saturating_sub(minute_count as u32 + 1);

        RateLimitResult::AllowedWithInfo {
            remaining,
            limit: RateLimitInfo {
                limit: self.config.requests_per_minute,
                remaining,
                reset_at: now + Duration::minutes(1),
                window: "minute".to_string(),
            },
        }
    }

    /// Drop clients with no request inside the hour window
    pub async fn purge_expired(&self) {
        let hour_cutoff = Utc::now() - Duration::hours(1);
        self.request_history.write().await.retain(|_, entries| {
            entries.retain(|t| *t > hour_cutoff);
            !entries.is_empty()
        });
    }

    /// Number of clients currently tracked
    pub async fn tracked_clients(&self) -> usize {
        self.request_history.read().await.len()
    }

    /// Clear all rate limit data
    pub async fn clear_all(&self) {
        self.request_history.write().await.clear();
    }
}
