//! Password hashing and strength policy

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, Result};

static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("static regex"));
static LOWERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").expect("static regex"));
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("static regex"));
static SPECIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("static regex"));

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Check a password against the strength policy.
///
/// Returns every violated rule, empty when the password is acceptable.
pub fn validate_password(password: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }
    if !UPPERCASE.is_match(password) {
        errors.push("Password must contain at least one uppercase letter".to_string());
    }
    if !LOWERCASE.is_match(password) {
        errors.push("Password must contain at least one lowercase letter".to_string());
    }
    if !DIGIT.is_match(password) {
        errors.push("Password must contain at least one number".to_string());
    }
    if !SPECIAL.is_match(password) {
        errors.push("Password must contain at least one special character".to_string());
    }

    errors
}

/// bcrypt hasher; hashing runs on the blocking pool
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password; a malformed stored hash counts as a mismatch
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
