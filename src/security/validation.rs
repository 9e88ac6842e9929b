//! Request Validation Module
//!
//! Field-level validation and input sanitization for account, chat and payment requests.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

use crate::error::AppError;

static MODEL_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+/[A-Za-z0-9._:-]+$").expect("static regex")
});

/// Validation error types
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: String },

    #[error("Field '{field}' is too long (max: {max}, got: {got})")]
    TooLong {
        field: String,
        max: usize,
        got: usize,
    },

    #[error("Field '{field}' is too short (min: {min}, got: {got})")]
    TooShort {
        field: String,
        min: usize,
        got: usize,
    },

    #[error("Field '{field}' is not a valid email: {value}")]
    InvalidEmail { field: String, value: String },

    #[error("Field '{field}' is not a valid model identifier: {value}")]
    InvalidModelId { field: String, value: String },

    #[error("{message}")]
    Custom { field: String, message: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field } => field.as_str(),
            Self::TooLong { field, .. } => field.as_str(),
            Self::TooShort { field, .. } => field.as_str(),
            Self::InvalidEmail { field, .. } => field.as_str(),
            Self::InvalidModelId { field, .. } => field.as_str(),
            Self::Custom { field, .. } => field.as_str(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Validation result type
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Request validator implementation
#[derive(Debug, Clone)]
pub struct RequestValidator {
    /// Maximum allowed message length in characters
    max_message_length: usize,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestValidator {
    /// Create new validator
    pub fn new() -> Self {
        Self {
            max_message_length: 100_000,
        }
    }

    /// Set maximum message length
    pub fn with_max_message_length(mut self, length: usize) -> Self {
        self.max_message_length = length;
        self
    }

    /// Validate field length
    pub fn validate_length(
        &self,
        field: &str,
        value: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> ValidationResult<()> {
        let length = value.chars().count();

        if let Some(min_len) = min {
            if length < min_len {
                return Err(ValidationError::TooShort {
                    field: field.to_string(),
                    min: min_len,
                    got: length,
                });
            }
        }

        if let Some(max_len) = max {
            if length > max_len {
                return Err(ValidationError::TooLong {
                    field: field.to_string(),
                    max: max_len,
                    got: length,
                });
            }
        }

        Ok(())
    }

    /// Reject empty or whitespace-only values
    pub fn validate_required(&self, field: &str, value: &str) -> ValidationResult<()> {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: field.to_string(),
            });
        }
        Ok(())
    }

    /// Validate email format
    pub fn validate_email(&self, field: &str, value: &str) -> ValidationResult<()> {
        if value.validate_email() {
            Ok(())
        } else {
            Err(ValidationError::InvalidEmail {
                field: field.to_string(),
                value: value.to_string(),
            })
        }
    }

    /// Validate `vendor/model[:variant]` shape
    pub fn validate_model_id(&self, field: &str, value: &str) -> ValidationResult<()> {
        self.validate_required(field, value)?;
        if MODEL_ID.is_match(value) {
            Ok(())
        } else {
            Err(ValidationError::InvalidModelId {
                field: field.to_string(),
                value: value.to_string(),
            })
        }
    }

    /// Message bodies must carry non-whitespace text and stay under the size cap
    pub fn validate_message_content(&self, field: &str, value: &str) -> ValidationResult<()> {
        self.validate_required(field, value)?;
        self.validate_length(field, value, None, Some(self.max_message_length))
    }

    /// Sanitize string input
    pub fn sanitize_string(input: &str) -> String {
        // Remove null bytes and control characters
        input
            .trim()
            .chars()
            .filter(|c| !c.is_ascii_control() || c.is_whitespace())
            .collect()
    }
}

/// Common validation helpers
pub mod validators {
    use super::*;

    /// Validate display name
    pub fn validate_name(name: &str) -> ValidationResult<()> {
        let validator = RequestValidator::new();
        validator.validate_required("name", name)?;
        validator.validate_length("name", name, Some(1), Some(100))
    }

    /// Validate username
    pub fn validate_username(username: &str) -> ValidationResult<()> {
        let validator = RequestValidator::new();
        validator.validate_required("username", username)?;
        validator.validate_length("username", username, Some(3), Some(50))?;
        if username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            Ok(())
        } else {
            Err(ValidationError::Custom {
                field: "username".to_string(),
                message: "Username may only contain letters, digits, '.', '_' and '-'"
                    .to_string(),
            })
        }
    }
}
