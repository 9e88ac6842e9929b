use crate::observability::AppMetrics;
use crate::security::access_gate::AccessGate;
use crate::security::auth::Authenticator;
use crate::security::rate_limit::RateLimiter;
use crate::services::account::AccountService;
use crate::services::chat::ChatService;
use crate::services::payment::PaymentService;
use std::sync::Arc;

/// Application state containing all shared services and security components
#[derive(Clone)]
pub struct AppState {
    /// Account registration, login and profile
    pub account_service: Arc<dyn AccountService>,
    /// Conversations and the send-message pipeline
    pub chat_service: Arc<dyn ChatService>,
    /// Orders, payment verification and history
    pub payment_service: Arc<dyn PaymentService>,
    /// Tier gate over the model catalog
    pub access_gate: Arc<AccessGate>,
    /// Authenticator for JWT validation
    pub authenticator: Arc<dyn Authenticator>,
    /// Rate limiter for request throttling
    pub rate_limiter: Arc<RateLimiter>,
    /// Request and pipeline counters
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("account_service", &"Arc<dyn AccountService>")
            .field("chat_service", &"Arc<dyn ChatService>")
            .field("payment_service", &"Arc<dyn PaymentService>")
            .field("access_gate", &self.access_gate)
            .field("authenticator", &"Arc<dyn Authenticator>")
            .field("rate_limiter", &self.rate_limiter)
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        account_service: Box<dyn AccountService>,
        chat_service: Box<dyn ChatService>,
        payment_service: Box<dyn PaymentService>,
        access_gate: Arc<AccessGate>,
        authenticator: Box<dyn Authenticator>,
        rate_limiter: RateLimiter,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            account_service: Arc::from(account_service),
            chat_service: Arc::from(chat_service),
            payment_service: Arc::from(payment_service),
            access_gate,
            authenticator: Arc::from(authenticator),
            rate_limiter: Arc::new(rate_limiter),
            metrics,
        }
    }
}
