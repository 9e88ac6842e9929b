//! 模型目录 DTO

use serde::{Deserialize, Serialize};

use crate::models::catalog::ModelCatalogEntry;
use crate::models::tier::Tier;

/// 单个模型
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelResponse {
    pub model_id: String,
    pub display_name: String,
    pub description: String,
    pub minimum_tier: Tier,
}

impl From<&ModelCatalogEntry> for ModelResponse {
    fn from(entry: &ModelCatalogEntry) -> Self {
        Self {
            model_id: entry.model_id.clone(),
            display_name: entry.display_name.clone(),
            description: entry.description.clone(),
            minimum_tier: entry.minimum_tier,
        }
    }
}

/// 某一等级起可用的模型
#[derive(Debug, Serialize, Deserialize)]
pub struct TierModels {
    pub tier: Tier,
    pub models: Vec<ModelResponse>,
}

/// 完整目录，按最低等级分组
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelCatalogResponse {
    pub tiers: Vec<TierModels>,
}

/// 调用者可用的模型
#[derive(Debug, Serialize, Deserialize)]
pub struct AvailableModelsResponse {
    pub tier: Tier,
    pub models: Vec<ModelResponse>,
}
