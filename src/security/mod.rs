//! Security Module
//!
//! Security features for the Ziora API:
//! - Authentication (JWT)
//! - Password hashing and policy
//! - Tier-based model access
//! - Rate Limiting
//! - Request Validation
//! - Security Middleware

pub mod access_gate;
pub mod auth;
pub mod middleware;
pub mod password;
pub mod rate_limit;
pub mod validation;


pub use access_gate::{AccessDecision, AccessGate, DenyReason};
pub use auth::{Authenticator, Claims, Credentials, JwtAuth, JwtTokenGenerator};
pub use password::{PasswordHasher, validate_password};
pub use rate_limit::{RateLimitConfig, RateLimitResult, RateLimiter};
pub use validation::{RequestValidator, ValidationError};
