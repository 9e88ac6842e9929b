use crate::config::config::AppConfig;
use crate::models::catalog::ModelCatalog;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "ZIORA_";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 合并顺序（后者覆盖前者）：
    /// 1. 开发环境默认值
    /// 2. ./config.toml
    /// 3. `ZIORA_` 前缀环境变量，嵌套键以 `__` 分隔
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        Self::figment(path).extract()
    }

    fn figment(path: PathBuf) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::development()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.database.url.is_empty() {
            return Err(ConfigValidationError::MissingDatabaseUrl);
        }

        if config.security.jwt_secret.is_empty() {
            return Err(ConfigValidationError::MissingJwtSecret);
        }

        if config.upstream.base_url.is_empty() {
            return Err(ConfigValidationError::MissingUpstreamUrl);
        }

        ModelCatalog::new(config.chat.catalog.clone())
            .map_err(|e| ConfigValidationError::InvalidCatalog(e.to_string()))?;

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("数据库连接 URL 未配置")]
    MissingDatabaseUrl,

    #[error("JWT 密钥未配置")]
    MissingJwtSecret,

    #[error("上游补全服务地址未配置")]
    MissingUpstreamUrl,

    #[error("模型目录无效: {0}")]
    InvalidCatalog(String),
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::ModelCatalogEntry;
    use crate::models::tier::Tier;

    #[test]
    fn test_development_config_is_valid() {
        assert!(ConfigLoader::validate(&AppConfig::development()).is_ok());
    }

    #[test]
    fn test_production_requires_jwt_secret() {
        let err = ConfigLoader::validate(&AppConfig::production()).unwrap_err();
        assert!(matches!(err, ConfigValidationError::MissingJwtSecret));
    }

    #[test]
    fn test_duplicate_catalog_entry_rejected() {
        let mut config = AppConfig::development();
        config
            .chat
            .catalog
            .push(ModelCatalogEntry::new("enterprise/model-1", Tier::Starter, "", ""));
        let err = ConfigLoader::validate(&config).unwrap_err();
        assert!(matches!(err, ConfigValidationError::InvalidCatalog(_)));
    }

    #[test]
    fn test_load_from_toml_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "ziora.toml",
                r#"
                [server]
                port = 7001

                [upstream]
                timeout_secs = 5
                "#,
            )?;
            jail.set_env("ZIORA_UPSTREAM__API_KEY", "sk-test");

            let config = ConfigLoader::load_from(PathBuf::from("ziora.toml"))?;
            assert_eq!(config.server.port, 7001);
            assert_eq!(config.upstream.timeout_secs, 5);
            assert_eq!(config.upstream.api_key, "sk-test");
            assert_eq!(config.database.url, "mem://");
            assert_eq!(config.chat.catalog.len(), 10);
            Ok(())
        });
    }
}
