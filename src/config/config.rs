use serde::{Deserialize, Serialize};

use crate::models::catalog::{ModelCatalogEntry, default_catalog_entries};

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 连接地址，`mem://` 使用进程内存储
    pub url: String,
    /// 命名空间
    pub namespace: String,
    /// 数据库名称
    pub database: String,
    /// 用户名
    pub username: String,
    /// 密码
    pub password: String,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 请求超时（秒）
    pub request_timeout: u64,
    /// 最大请求体大小（字节）
    pub max_request_size: usize,
}

/// 安全配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SecurityConfig {
    /// JWT 签名密钥
    pub jwt_secret: String,
    /// JWT 签发者
    pub jwt_issuer: String,
    /// JWT 受众
    pub jwt_audience: String,
    /// JWT 有效期（秒）
    pub jwt_expiry_seconds: u64,
    /// bcrypt 代价因子
    pub bcrypt_cost: u32,
    /// Rate limiting 启用
    pub rate_limit_enabled: bool,
    /// 每分钟请求数上限
    pub requests_per_minute: u32,
    /// 每小时请求数上限
    pub requests_per_hour: u32,
    /// CORS 允许的来源
    pub cors_allowed_origins: Vec<String>,
}

/// 上游补全服务配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// API 基础地址
    pub base_url: String,
    /// API 密钥
    pub api_key: String,
    /// 请求来源（HTTP-Referer）
    pub referer: String,
    /// 应用标题（X-Title）
    pub title: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

/// 支付网关配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PaymentConfig {
    /// 网关 API 基础地址
    pub base_url: String,
    /// 商户 key id
    pub key_id: String,
    /// 商户 key secret（同时用于签名校验）
    pub key_secret: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化（JSON）日志
    pub structured: bool,
}

/// 对话配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// 模型目录
    pub catalog: Vec<ModelCatalogEntry>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog_entries(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 服务器配置
    pub server: ServerConfig,
    /// 安全配置
    pub security: SecurityConfig,
    /// 上游补全服务配置
    pub upstream: UpstreamConfig,
    /// 支付网关配置
    pub payment: PaymentConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 对话配置
    pub chat: ChatConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            database: DatabaseConfig {
                url: "mem://".into(),
                namespace: "ziora".into(),
                database: "chat".into(),
                username: "root".into(),
                password: "root".into(),
            },
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 5000,
                request_timeout: 60,
                max_request_size: 1024 * 1024,
            },
            security: SecurityConfig {
                jwt_secret: "dev-secret-change-in-production-min-32-chars".into(),
                jwt_issuer: "ziora".into(),
                jwt_audience: "ziora-api".into(),
                jwt_expiry_seconds: 30 * 24 * 3600,
                bcrypt_cost: 10,
                rate_limit_enabled: false,
                requests_per_minute: 60,
                requests_per_hour: 1000,
                cors_allowed_origins: vec!["http://localhost:5173".into()],
            },
            upstream: UpstreamConfig {
                base_url: "https://openrouter.ai/api/v1".into(),
                api_key: String::new(),
                referer: "http://localhost:5173".into(),
                title: "ZioraAi".into(),
                timeout_secs: 60,
            },
            payment: PaymentConfig {
                base_url: "https://api.razorpay.com/v1".into(),
                key_id: "rzp_test_your_key_id".into(),
                key_secret: "your_key_secret".into(),
                timeout_secs: 30,
            },
            logging: LoggingConfig {
                level: "debug".into(),
                structured: false,
            },
            chat: ChatConfig::default(),
            app_name: "ziora".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config.logging.structured = true;
        config.security.jwt_secret = String::new();
        config.security.rate_limit_enabled = true;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
