//! Tier-based model access control
//!
//! Decides whether an account at a given subscription tier may invoke a model.
//! The catalog is injected at construction; the gate never reads ambient state.

use std::sync::Arc;

use crate::models::catalog::{ModelCatalog, ModelCatalogEntry};
use crate::models::tier::Tier;

/// Why a request was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// Model is not in the catalog
    UnknownModel,
    /// Caller's tier is below the model's minimum
    InsufficientTier { required: Tier },
}

/// Outcome of an access check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Model access gate backed by a static catalog
#[derive(Debug, Clone)]
pub struct AccessGate {
    catalog: Arc<ModelCatalog>,
}

impl AccessGate {
    /// Create a gate over the given catalog
    pub fn new(catalog: Arc<ModelCatalog>) -> Self {
        Self { catalog }
    }

    /// Check access and report the reason on denial.
    ///
    /// Models missing from the catalog are always denied.
    pub fn check(&self, tier: Tier, model_id: &str) -> AccessDecision {
        match self.catalog.get(model_id) {
            None => AccessDecision::Deny(DenyReason::UnknownModel),
            Some(entry) if tier >= entry.minimum_tier => AccessDecision::Allow,
            Some(entry) => AccessDecision::Deny(DenyReason::InsufficientTier {
                required: entry.minimum_tier,
            }),
        }
    }

    /// Boolean form of [`AccessGate::check`]
    pub fn is_authorized(&self, tier: Tier, model_id: &str) -> bool {
        self.check(tier, model_id).is_allowed()
    }

    /// Catalog entries the tier may invoke, in catalog order
    pub fn available_models(&self, tier: Tier) -> Vec<&ModelCatalogEntry> {
        self.catalog
            .entries()
            .iter()
            .filter(|entry| self.is_authorized(tier, &entry.model_id))
            .collect()
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }
}
