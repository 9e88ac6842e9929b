//! Security Middleware Module
//!
//! Axum middleware for authentication, rate limiting and security headers.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::api::app_state::AppState;
use crate::error::{AppError, ErrorResponse};
use crate::security::auth::{Claims, Credentials};
use crate::security::rate_limit::{RateLimitClient, RateLimitInfo, RateLimitResult};

/// Extension trait for adding claims to request extensions
pub trait RequestClaimsExt {
    fn set_claims(&mut self, claims: Claims);
}

impl RequestClaimsExt for Request<Body> {
    fn set_claims(&mut self, claims: Claims) {
        self.extensions_mut().insert(claims);
    }
}

/// Authentication middleware
///
/// Validates the bearer token and stores its [`Claims`] in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let credentials = extract_credentials(&req);
    let claims = state.authenticator.authenticate(&credentials).await?;

    debug!(account_id = %claims.sub, "request authenticated");
    req.set_claims(claims);

    Ok(next.run(req).await)
}

/// Extract credentials from request headers
fn extract_credentials(req: &Request<Body>) -> Credentials {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    Credentials::from_authorization_header(auth_header)
}

/// Rate limiting middleware
///
/// Runs ahead of authentication, so a valid bearer token is decoded here to key
/// the bucket by account. Requests without one fall back to the client address.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let claims = match extract_credentials(&req).jwt_token {
        Some(token) => state.authenticator.validate_token(&token).await.ok(),
        None => None,
    };
    let client = RateLimitClient::from_request(&req, claims.as_ref());

    match state.rate_limiter.check_rate_limit(&client).await {
        RateLimitResult::Allowed => next.run(req).await,
        RateLimitResult::AllowedWithInfo { remaining, limit } => {
            let response = next.run(req).await;
            add_rate_limit_headers(response, remaining, &limit)
        }
        RateLimitResult::Limited { retry_after, limit } => {
            warn!(client = %client.key(), window = %limit.window, "rate limit exceeded");
            let mut response = AppError::RateLimited.into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
            add_rate_limit_headers(response, 0, &limit)
        }
    }
}

/// Add rate limit headers to response
fn add_rate_limit_headers(mut response: Response, remaining: u32, limit: &RateLimitInfo) -> Response {
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(limit.limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(remaining));
    headers.insert(
        "X-RateLimit-Reset",
        HeaderValue::from(limit.reset_at.timestamp()),
    );
    response
}

/// Security headers middleware
pub async fn security_headers_middleware(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "Strict-Transport-Security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );

    response
}

/// Fallback for unmatched routes
pub async fn not_found_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        axum::Json(ErrorResponse::new("NOT_FOUND", "Route not found")),
    )
        .into_response()
}
