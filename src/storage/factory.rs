//! 存储工厂模块
//!
//! 根据配置创建相应的存储实例。

use crate::config::config::DatabaseConfig;
use crate::error::{AppError, Result};
use crate::storage::memory::in_memory_repositories;
use crate::storage::repository::Repositories;

#[cfg(feature = "surrealdb")]
use crate::storage::surrealdb::SurrealPool;

/// 内存存储的 URL 前缀
pub const MEMORY_SCHEME: &str = "mem://";

/// 存储实例枚举
#[derive(Debug, Clone)]
pub enum StorageInstance {
    Memory,
    #[cfg(feature = "surrealdb")]
    SurrealDB(SurrealPool),
}

impl StorageInstance {
    pub fn kind(&self) -> &'static str {
        match self {
            StorageInstance::Memory => "memory",
            #[cfg(feature = "surrealdb")]
            StorageInstance::SurrealDB(_) => "surrealdb",
        }
    }
}

/// 存储工厂
pub struct StorageFactory;

impl StorageFactory {
    /// 根据配置创建存储实例与仓储
    ///
    /// `mem://` 使用进程内存储，其余 URL 交给 SurrealDB。
    pub async fn create(config: &DatabaseConfig) -> Result<(StorageInstance, Repositories)> {
        if config.url.starts_with(MEMORY_SCHEME) {
            return Ok((StorageInstance::Memory, in_memory_repositories()));
        }
        Self::create_remote(config).await
    }

    #[cfg(feature = "surrealdb")]
    async fn create_remote(config: &DatabaseConfig) -> Result<(StorageInstance, Repositories)> {
        let pool = SurrealPool::new(config).await?;
        let repositories = pool.repositories();
        Ok((StorageInstance::SurrealDB(pool), repositories))
    }

    #[cfg(not(feature = "surrealdb"))]
    async fn create_remote(config: &DatabaseConfig) -> Result<(StorageInstance, Repositories)> {
        Err(AppError::Config(format!(
            "Database URL {} requires the 'surrealdb' feature",
            config.url
        )))
    }

    /// 检查存储是否可用
    pub async fn health_check(storage: &StorageInstance) -> Result<()> {
        match storage {
            StorageInstance::Memory => Ok(()),
            #[cfg(feature = "surrealdb")]
            StorageInstance::SurrealDB(pool) => pool
                .health()
                .await
                .map_err(|e| AppError::Database(e.to_string())),
        }
    }
}
