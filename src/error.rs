//! 错误处理模块
//!
//! 定义应用程序的错误类型和错误处理逻辑。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 数据库错误
    #[error("数据库错误: {0}")]
    Database(String),

    /// 认证错误
    #[error("认证失败: {0}")]
    Authentication(String),

    /// 授权错误（会话成员校验等）
    #[error("未授权访问: {0}")]
    Authorization(String),

    /// 模型不在目录中或订阅等级不足
    #[error("{0}")]
    AccessDenied(String),

    /// 资源不存在
    #[error("资源不存在: {0}")]
    NotFound(String),

    /// 参数验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),

    /// 资源冲突（重复注册等）
    #[error("资源冲突: {0}")]
    Conflict(String),

    /// 上游补全服务故障
    #[error("上游模型服务故障: {0}")]
    UpstreamFault(String),

    /// 支付网关错误
    #[error("支付网关错误: {0}")]
    PaymentGateway(String),

    /// 速率限制
    #[error("请求过于频繁，请稍后再试")]
    RateLimited,

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::UpstreamFault(e.to_string())
    }
}

#[cfg(feature = "surrealdb")]
impl From<surrealdb::Error> for AppError {
    fn from(e: surrealdb::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

/// Axum response implementation for AppError
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = (&self).into();
        let body = Json(ErrorResponse::new(&code, &self.to_string()));
        (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response()
    }
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,
    /// 错误消息
    pub message: String,
    /// 详细信息
    pub details: Option<String>,
    /// 请求 ID
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// 创建新错误响应
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            request_id: None,
        }
    }

    /// 添加详细信息
    pub fn with_details(mut self, details: &str) -> Self {
        self.details = Some(details.to_string());
        self
    }

    /// 添加请求 ID
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

/// HTTP 状态码映射
impl From<&AppError> for (u16, String) {
    fn from(err: &AppError) -> (u16, String) {
        match err {
            AppError::NotFound(_) => (404, "NOT_FOUND".to_string()),
            AppError::Authentication(_) => (401, "UNAUTHORIZED".to_string()),
            AppError::Authorization(_) => (403, "FORBIDDEN".to_string()),
            AppError::AccessDenied(_) => (403, "ACCESS_DENIED".to_string()),
            AppError::Validation(_) => (400, "BAD_REQUEST".to_string()),
            AppError::Conflict(_) => (400, "CONFLICT".to_string()),
            AppError::RateLimited => (429, "RATE_LIMITED".to_string()),
            AppError::UpstreamFault(_) => (502, "UPSTREAM_FAULT".to_string()),
            AppError::PaymentGateway(_) => (502, "PAYMENT_GATEWAY_ERROR".to_string()),
            AppError::Database(_) => (500, "INTERNAL_ERROR".to_string()),
            _ => (500, "INTERNAL_ERROR".to_string()),
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_for_send_message_failures() {
        let denied = AppError::AccessDenied(
            "Access denied. Enterprise subscription required for model enterprise/model-1".into(),
        );
        let (status, code): (u16, String) = (&denied).into();
        assert_eq!(status, 403);
        assert_eq!(code, "ACCESS_DENIED");

        let (status, _): (u16, String) = (&AppError::UpstreamFault("boom".into())).into();
        assert_eq!(status, 502);

        let (status, _): (u16, String) = (&AppError::NotFound("chat".into())).into();
        assert_eq!(status, 404);

        let (status, _): (u16, String) = (&AppError::Validation("empty".into())).into();
        assert_eq!(status, 400);
    }

    #[test]
    fn test_error_response_builder() {
        let resp = ErrorResponse::new("NOT_FOUND", "missing")
            .with_details("chat 42")
            .with_request_id("req-1");
        assert_eq!(resp.details.as_deref(), Some("chat 42"));
        assert_eq!(resp.request_id.as_deref(), Some("req-1"));
    }
}
