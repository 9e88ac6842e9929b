use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::tier::Tier;

/// 模型目录条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCatalogEntry {
    /// 上游模型标识（不透明字符串）
    pub model_id: String,
    /// 最低订阅等级
    pub minimum_tier: Tier,
    /// 展示名称
    #[serde(default)]
    pub display_name: String,
    /// 描述
    #[serde(default)]
    pub description: String,
}

impl ModelCatalogEntry {
    pub fn new(model_id: &str, minimum_tier: Tier, display_name: &str, description: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            minimum_tier,
            display_name: display_name.to_string(),
            description: description.to_string(),
        }
    }
}

/// 模型目录重复定义
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("model {0} is listed more than once in the catalog")]
pub struct DuplicateModelError(pub String);

/// 模型目录
///
/// 进程启动时加载一次的静态配置，运行期只读。前端列表与后端鉴权都从这里取数据。
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    entries: Vec<ModelCatalogEntry>,
    index: HashMap<String, usize>,
}

impl ModelCatalog {
    /// 由条目列表构建目录，模型标识必须唯一
    pub fn new(entries: Vec<ModelCatalogEntry>) -> Result<Self, DuplicateModelError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.model_id.clone(), i).is_some() {
                return Err(DuplicateModelError(entry.model_id.clone()));
            }
        }
        Ok(Self { entries, index })
    }

    /// 按模型标识查找
    pub fn get(&self, model_id: &str) -> Option<&ModelCatalogEntry> {
        self.index.get(model_id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.index.contains_key(model_id)
    }

    pub fn entries(&self) -> &[ModelCatalogEntry] {
        &self.entries
    }

    /// 最低等级恰为 `tier` 的条目
    pub fn entries_for_tier(&self, tier: Tier) -> impl Iterator<Item = &ModelCatalogEntry> {
        self.entries.iter().filter(move |e| e.minimum_tier == tier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 内置默认目录
pub fn default_catalog_entries() -> Vec<ModelCatalogEntry> {
    vec![
        ModelCatalogEntry::new(
            "x-ai/grok-4-fast:free",
            Tier::Starter,
            "xAI: Grok 4 Fast",
            "Fast multimodal model with a large context window",
        ),
        ModelCatalogEntry::new(
            "nvidia/nemotron-nano-9b-v2:free",
            Tier::Starter,
            "NVIDIA: Nemotron Nano 9B V2",
            "Compact reasoning model for general chat",
        ),
        ModelCatalogEntry::new(
            "deepseek/deepseek-chat-v3.1:free",
            Tier::Starter,
            "DeepSeek: DeepSeek V3.1",
            "Hybrid reasoning model for chat and code",
        ),
        ModelCatalogEntry::new(
            "openai/gpt-oss-20b:free",
            Tier::Starter,
            "OpenAI: gpt-oss-20b",
            "Open-weight model tuned for low latency",
        ),
        ModelCatalogEntry::new(
            "google/gemma-3n-e2b-it:free",
            Tier::Professional,
            "Google: Gemma 3n 2B",
            "Efficient instruction-tuned model",
        ),
        ModelCatalogEntry::new(
            "meta-llama/llama-3.3-8b-instruct:free",
            Tier::Professional,
            "Meta: Llama 3.3 8B Instruct",
            "Instruction-tuned Llama for multilingual dialogue",
        ),
        ModelCatalogEntry::new(
            "cognitivecomputations/dolphin3.0-mistral-24b:free",
            Tier::Professional,
            "Dolphin3.0 Mistral 24B",
            "General purpose instruct model for coding and agents",
        ),
        ModelCatalogEntry::new(
            "moonshotai/kimi-dev-72b:free",
            Tier::Professional,
            "MoonshotAI: Kimi Dev 72B",
            "Software engineering focused model",
        ),
        ModelCatalogEntry::new(
            "enterprise/model-1",
            Tier::Enterprise,
            "Enterprise Exclusive Model 1",
            "Advanced capabilities with priority processing",
        ),
        ModelCatalogEntry::new(
            "enterprise/model-2",
            Tier::Enterprise,
            "Enterprise Exclusive Model 2",
            "Specialized enterprise features and dedicated resources",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = ModelCatalog::new(default_catalog_entries()).unwrap();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.entries_for_tier(Tier::Starter).count(), 4);
        assert_eq!(catalog.entries_for_tier(Tier::Professional).count(), 4);
        assert_eq!(catalog.entries_for_tier(Tier::Enterprise).count(), 2);
    }

    #[test]
    fn test_duplicate_model_rejected() {
        let entries = vec![
            ModelCatalogEntry::new("a/b", Tier::Starter, "", ""),
            ModelCatalogEntry::new("a/b", Tier::Enterprise, "", ""),
        ];
        let err = ModelCatalog::new(entries).unwrap_err();
        assert_eq!(err, DuplicateModelError("a/b".to_string()));
    }

    #[test]
    fn test_lookup() {
        let catalog = ModelCatalog::new(default_catalog_entries()).unwrap();
        let entry = catalog.get("moonshotai/kimi-dev-72b:free").unwrap();
        assert_eq!(entry.minimum_tier, Tier::Professional);
        assert!(catalog.get("moonshotai/kimi-dev-72b").is_none());
    }
}
