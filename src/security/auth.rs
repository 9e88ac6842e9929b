//! Authentication Module
//!
//! JWT (JSON Web Token) issuance and validation for account sessions.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::config::SecurityConfig;
use crate::error::{AppError, Result};

/// Credentials for authentication
#[derive(Debug, Clone)]
pub struct Credentials {
    /// JWT token (if provided)
    pub jwt_token: Option<String>,
}

impl Credentials {
    /// Create new credentials
    pub fn new(jwt_token: Option<String>) -> Self {
        Self { jwt_token }
    }

    /// Try to extract credentials from Authorization header
    pub fn from_authorization_header(auth_header: Option<&str>) -> Self {
        match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) if !token.trim().is_empty() => Self::new(Some(token.trim().to_string())),
            _ => Self::new(None),
        }
    }
}

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token not before timestamp
    pub nbf: usize,
    /// Issued at timestamp
    pub iat: usize,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Unique token ID
    pub jti: String,
}

impl Claims {
    /// Create new claims
    pub fn new(sub: String, expiry_seconds: u64, issuer: String, audience: String) -> Self {
        let now = Utc::now();
        let iat = now.timestamp() as usize;
        let exp = iat + expiry_seconds as usize;

        Self {
            sub,
            exp,
            nbf: iat,
            iat,
            iss: issuer,
            aud: audience,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Account the token was issued to
    pub fn account_id(&self) -> &str {
        &self.sub
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp as i64, 0).single()
    }

    /// Check if claims are expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() as usize > self.exp
    }
}

/// Authentication trait for token validation
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate credentials and return claims
    async fn authenticate(&self, credentials: &Credentials) -> Result<Claims> {
        let token = credentials
            .jwt_token
            .as_deref()
            .ok_or_else(|| AppError::Authentication("No token, authorization denied".to_string()))?;
        self.validate_token(token).await
    }
    /// Validate a token and return claims
    async fn validate_token(&self, token: &str) -> Result<Claims>;
    /// Get the authenticator type
    fn authenticator_type(&self) -> &'static str;
}

/// JWT based authentication
#[derive(Clone)]
pub struct JwtAuth {
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
}

impl std::fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuth")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl JwtAuth {
    /// Create new JWT authenticator
    pub fn new(secret: &str, issuer: &str, audience: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
        }
    }

    /// Create from security settings
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(&config.jwt_secret, &config.jwt_issuer, &config.jwt_audience)
    }
}

#[async_trait]
impl Authenticator for JwtAuth {
    async fn validate_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.clone()]);
        validation.set_audience(&[self.audience.clone()]);
        validation.validate_nbf = true;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| AppError::Authentication(format!("Token is not valid: {}", e)))
    }

    fn authenticator_type(&self) -> &'static str {
        "JWT"
    }
}

/// JWT token generation helper
#[derive(Clone)]
pub struct JwtTokenGenerator {
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
    expiry_seconds: u64,
}

impl JwtTokenGenerator {
    /// Create new token generator
    pub fn new(secret: &str, issuer: &str, audience: &str, expiry_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            expiry_seconds,
        }
    }

    /// Create from security settings
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            &config.jwt_issuer,
            &config.jwt_audience,
            config.jwt_expiry_seconds,
        )
    }

    /// Generate a new JWT token for an account
    pub fn generate_token(&self, account_id: &str) -> Result<String> {
        let claims = Claims::new(
            account_id.to_string(),
            self.expiry_seconds,
            self.issuer.clone(),
            self.audience.clone(),
        );

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }
}
